//! Model service trait definitions
//!
//! The pipeline only sees these two traits; the concrete Ollama client and
//! the test fakes implement them.

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;

use crate::error::ServiceError;
use crate::models::Embedding;

/// Incremental answer fragments, in emission order.
///
/// Finite and not restartable: once drained it cannot be replayed.
pub type GenerationStream = Pin<Box<dyn Stream<Item = Result<String, ServiceError>> + Send>>;

/// Maps text to a fixed-length vector.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmbeddingClient: Send + Sync {
    /// Embed `text` with `model`.
    ///
    /// Expected to be deterministic for a fixed model/text pair; retrieval
    /// quality assumes it.
    async fn embed(&self, model: &str, text: &str) -> Result<Embedding, ServiceError>;
}

/// Chat-style language model producing a streamed answer.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Start a chat turn with a system instruction and one user message.
    ///
    /// Errors before the first fragment are returned here; errors after it
    /// arrive as items of the stream.
    async fn chat(
        &self,
        model: &str,
        system_instruction: &str,
        user_message: &str,
    ) -> Result<GenerationStream, ServiceError>;
}
