//! Query-time retrieval: embed the question, rank the stored chunks.

use std::sync::Arc;

use tracing::debug;

use super::traits::EmbeddingClient;
use super::vector_store::SimilarityIndex;
use crate::error::{RagError, Result};
use crate::models::{Embedding, RetrievalResult};

/// Number of chunks handed to the prompt unless configured otherwise.
pub const DEFAULT_TOP_K: usize = 3;

pub struct Retriever {
    embedder: Arc<dyn EmbeddingClient>,
    model: String,
}

impl Retriever {
    pub fn new(embedder: Arc<dyn EmbeddingClient>, model: impl Into<String>) -> Self {
        Self {
            embedder,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Whether a search of `index` for `k` chunks is known to be empty.
    pub fn skips(index: &dyn SimilarityIndex, k: usize) -> bool {
        index.is_empty() || k == 0
    }

    /// Embed `query` with the retriever's model and check it can be
    /// compared with the records of `index`. Failures are not retried.
    pub async fn embed_query(
        &self,
        query: &str,
        index: &dyn SimilarityIndex,
    ) -> Result<Embedding> {
        let embedding = self
            .embedder
            .embed(&self.model, query)
            .await
            .map_err(RagError::embedding)?;

        if embedding.norm() == 0.0 {
            return Err(RagError::EmptyVector);
        }
        if let Some(expected) = index.dimensions() {
            if expected != embedding.dimensions() {
                return Err(RagError::DimensionMismatch {
                    expected,
                    actual: embedding.dimensions(),
                });
            }
        }

        Ok(embedding)
    }

    /// Top `k` chunks of `index` for an already embedded query.
    pub fn rank(
        &self,
        query_embedding: &Embedding,
        index: &dyn SimilarityIndex,
        k: usize,
    ) -> Result<RetrievalResult> {
        let result = index.search(query_embedding, k)?;

        debug!(
            candidates = index.len(),
            returned = result.len(),
            top_score = result.entries().first().map(|e| e.score),
            "Retrieved context"
        );
        for entry in result.entries() {
            debug!(score = entry.score, chunk = %entry.chunk, "Ranked chunk");
        }

        Ok(result)
    }

    /// Top `k` chunks of `index` for `query`.
    ///
    /// An empty index or `k == 0` returns an empty result without calling
    /// the embedding service.
    pub async fn retrieve(
        &self,
        query: &str,
        index: &dyn SimilarityIndex,
        k: usize,
    ) -> Result<RetrievalResult> {
        if Self::skips(index, k) {
            return Ok(RetrievalResult::empty());
        }

        let query_embedding = self.embed_query(query, index).await?;
        self.rank(&query_embedding, index, k)
    }
}
