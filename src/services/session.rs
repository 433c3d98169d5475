//! Question-answering session over one document at a time.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::aggregator::ResponseAggregator;
use super::chunker::{Chunker, ChunkingStrategy};
use super::prompt::{Prompt, PromptAssembler};
use super::retriever::{Retriever, DEFAULT_TOP_K};
use super::traits::{EmbeddingClient, GenerationClient};
use super::vector_store::{RebuildOutcome, VectorStore};
use crate::error::{RagError, Result};
use crate::models::{Document, QueryState, RetrievalResult};

/// Models and retrieval settings for a session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub embedding_model: String,
    pub language_model: String,
    pub top_k: usize,
    pub chunking: ChunkingStrategy,
}

impl SessionConfig {
    pub fn new(embedding_model: impl Into<String>, language_model: impl Into<String>) -> Self {
        Self {
            embedding_model: embedding_model.into(),
            language_model: language_model.into(),
            top_k: DEFAULT_TOP_K,
            chunking: ChunkingStrategy::default(),
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_chunking(mut self, chunking: ChunkingStrategy) -> Self {
        self.chunking = chunking;
        self
    }
}

/// Result of a completed round trip.
#[derive(Debug, Clone)]
pub struct Answer {
    pub retrieved: RetrievalResult,
    pub prompt: Prompt,
    pub text: String,
}

/// Owns the vector store and drives ingestion and question round trips.
///
/// Created empty; every new document replaces the store wholesale. Both
/// operations take `&mut self`, so a rebuild can never overlap a query.
pub struct RagSession {
    store: VectorStore,
    embedder: Arc<dyn EmbeddingClient>,
    generator: Arc<dyn GenerationClient>,
    retriever: Retriever,
    assembler: PromptAssembler,
    chunker: Box<dyn Chunker>,
    config: SessionConfig,
    state: QueryState,
}

impl RagSession {
    pub fn new(
        embedder: Arc<dyn EmbeddingClient>,
        generator: Arc<dyn GenerationClient>,
        config: SessionConfig,
    ) -> Self {
        let retriever = Retriever::new(embedder.clone(), config.embedding_model.clone());
        Self {
            store: VectorStore::new(),
            embedder,
            generator,
            retriever,
            assembler: PromptAssembler::new(),
            chunker: config.chunking.chunker(),
            config,
            state: QueryState::Idle,
        }
    }

    pub fn with_assembler(mut self, assembler: PromptAssembler) -> Self {
        self.assembler = assembler;
        self
    }

    pub fn store(&self) -> &VectorStore {
        &self.store
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// State reached by the most recent round trip.
    pub fn state(&self) -> QueryState {
        self.state
    }

    /// Index `document`, unless it is the one already indexed.
    pub async fn load_document(&mut self, document: &Document) -> Result<RebuildOutcome> {
        if self
            .store
            .is_current(&document.name, &self.config.embedding_model)
        {
            return Ok(RebuildOutcome::Unchanged);
        }

        let chunks = self.chunker.chunk(&document.content);
        debug!(
            document = %document.name,
            chunker = self.chunker.name(),
            chunks = chunks.len(),
            "Chunked document"
        );

        self.store
            .rebuild(
                &document.name,
                chunks,
                self.embedder.as_ref(),
                &self.config.embedding_model,
            )
            .await
    }

    /// Answer `query` from the indexed document.
    ///
    /// `on_progress` sees the accumulated answer after every fragment.
    /// Without a loaded document the model is still asked, with an empty
    /// context.
    pub async fn ask<F>(&mut self, query: &str, on_progress: F) -> Result<Answer>
    where
        F: FnMut(&str),
    {
        self.transition(QueryState::Idle);

        let retrieved = self.retrieve(query).await?;

        let prompt = self.assembler.assemble(&retrieved, query);
        self.transition(QueryState::PromptBuilt);

        let text = match self.generate(&prompt, on_progress).await {
            Ok(text) => text,
            Err(error) => return Err(self.fail(error)),
        };
        self.transition(QueryState::Complete);

        info!(
            context_chunks = retrieved.len(),
            answer_len = text.len(),
            "Answer complete"
        );

        Ok(Answer {
            retrieved,
            prompt,
            text,
        })
    }

    async fn retrieve(&mut self, query: &str) -> Result<RetrievalResult> {
        self.transition(QueryState::Embedding);

        let top_k = self.config.top_k;
        if Retriever::skips(&self.store, top_k) {
            self.transition(QueryState::Scoring);
            self.transition(QueryState::Ranked);
            return Ok(RetrievalResult::empty());
        }

        let embedded = self.retriever.embed_query(query, &self.store).await;
        let query_embedding = match embedded {
            Ok(embedding) => embedding,
            Err(error) => return Err(self.fail(error)),
        };

        self.transition(QueryState::Scoring);
        let ranked = self.retriever.rank(&query_embedding, &self.store, top_k);
        let retrieved = match ranked {
            Ok(retrieved) => retrieved,
            Err(error) => return Err(self.fail(error)),
        };
        self.transition(QueryState::Ranked);

        Ok(retrieved)
    }

    async fn generate<F>(&mut self, prompt: &Prompt, on_progress: F) -> Result<String>
    where
        F: FnMut(&str),
    {
        self.transition(QueryState::Generating);

        let stream = self
            .generator
            .chat(&self.config.language_model, &prompt.system, &prompt.user)
            .await
            .map_err(|source| RagError::generation(source, String::new()))?;

        ResponseAggregator::new().collect(stream, on_progress).await
    }

    fn transition(&mut self, next: QueryState) {
        if !self.state.can_transition_to(next) {
            warn!(from = %self.state, to = %next, "Unexpected query state transition");
        }
        debug!(from = %self.state, to = %next, "Query state");
        self.state = next;
    }

    fn fail(&mut self, error: RagError) -> RagError {
        warn!(
            state = %self.state,
            category = error.category(),
            error = %error,
            "Query round trip failed"
        );
        self.transition(QueryState::Failed);
        error
    }
}
