//! In-memory vector store scoped to a single document.

use tracing::{debug, info, warn};

use super::similarity::cosine_similarity;
use super::traits::EmbeddingClient;
use crate::error::{RagError, Result};
use crate::models::{Chunk, Embedding, RetrievalResult, ScoredChunk};

/// A chunk and the embedding produced from exactly its text.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorRecord {
    pub chunk: Chunk,
    pub embedding: Embedding,
}

/// What a call to [`VectorStore::rebuild`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RebuildOutcome {
    /// Document and embedding model were already indexed; nothing embedded.
    Unchanged,
    /// Prior records were discarded and `records` new ones inserted.
    Rebuilt { records: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct IndexedDocument {
    document_id: String,
    model: String,
}

/// Similarity-ranked lookup over embedded chunks.
///
/// [`VectorStore`] answers with a linear scan; an approximate index can
/// stand in behind the same trait.
pub trait SimilarityIndex: Send + Sync {
    /// Top `k` chunks by descending similarity to `query`, ties in
    /// insertion order.
    fn search(&self, query: &Embedding, k: usize) -> Result<RetrievalResult>;

    fn len(&self) -> usize;

    /// Dimensionality shared by every indexed embedding, if any.
    fn dimensions(&self) -> Option<usize>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Ordered `(chunk, embedding)` records for one document.
///
/// Every record shares one dimensionality and has a non-zero norm. Only
/// ever fully rebuilt. A failed rebuild leaves the store empty with no
/// document identity, so a retry with the same document embeds again.
#[derive(Debug, Default)]
pub struct VectorStore {
    records: Vec<VectorRecord>,
    indexed: Option<IndexedDocument>,
}

impl VectorStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Identity of the indexed document, if any.
    pub fn document_id(&self) -> Option<&str> {
        self.indexed.as_ref().map(|doc| doc.document_id.as_str())
    }

    /// Model that produced the stored embeddings, if any.
    pub fn embedding_model(&self) -> Option<&str> {
        self.indexed.as_ref().map(|doc| doc.model.as_str())
    }

    pub fn records(&self) -> &[VectorRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Dimensionality shared by every record.
    pub fn dimensions(&self) -> Option<usize> {
        self.records.first().map(|r| r.embedding.dimensions())
    }

    /// Whether `document_id` embedded with `model` is what the store holds.
    pub fn is_current(&self, document_id: &str, model: &str) -> bool {
        self.indexed
            .as_ref()
            .is_some_and(|doc| doc.document_id == document_id && doc.model == model)
    }

    /// Drop every record and the document identity.
    pub fn clear(&mut self) {
        self.records.clear();
        self.indexed = None;
    }

    /// Replace the store's contents with `chunks` from `document_id`.
    ///
    /// A no-op when the same document was already indexed with the same
    /// model. Otherwise the old records are discarded before the first
    /// embedding call and chunks are embedded one by one, in order.
    pub async fn rebuild(
        &mut self,
        document_id: &str,
        chunks: Vec<Chunk>,
        embedder: &dyn EmbeddingClient,
        model: &str,
    ) -> Result<RebuildOutcome> {
        if self.is_current(document_id, model) {
            debug!(document = document_id, "Document already indexed, skipping rebuild");
            return Ok(RebuildOutcome::Unchanged);
        }

        self.clear();
        info!(
            document = document_id,
            model = model,
            chunks = chunks.len(),
            "Rebuilding vector store"
        );

        if let Err(error) = self.embed_all(chunks, embedder, model).await {
            warn!(
                document = document_id,
                embedded = self.records.len(),
                error = %error,
                "Rebuild failed, rolling vector store back to empty"
            );
            self.clear();
            return Err(error);
        }

        self.indexed = Some(IndexedDocument {
            document_id: document_id.to_string(),
            model: model.to_string(),
        });

        Ok(RebuildOutcome::Rebuilt {
            records: self.records.len(),
        })
    }

    async fn embed_all(
        &mut self,
        chunks: Vec<Chunk>,
        embedder: &dyn EmbeddingClient,
        model: &str,
    ) -> Result<()> {
        self.records.reserve(chunks.len());

        for chunk in chunks {
            let embedding = embedder
                .embed(model, chunk.as_str())
                .await
                .map_err(RagError::embedding)?;

            if embedding.norm() == 0.0 {
                return Err(RagError::EmptyVector);
            }
            if let Some(first) = self.records.first() {
                first.embedding.ensure_same_dimensions(&embedding)?;
            }

            self.records.push(VectorRecord { chunk, embedding });
        }

        Ok(())
    }
}

impl SimilarityIndex for VectorStore {
    fn search(&self, query: &Embedding, k: usize) -> Result<RetrievalResult> {
        let scored = self
            .records
            .iter()
            .map(|record| {
                cosine_similarity(query, &record.embedding).map(|score| ScoredChunk {
                    chunk: record.chunk.clone(),
                    score,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(RetrievalResult::rank(scored, k))
    }

    fn len(&self) -> usize {
        self.records.len()
    }

    fn dimensions(&self) -> Option<usize> {
        VectorStore::dimensions(self)
    }
}
