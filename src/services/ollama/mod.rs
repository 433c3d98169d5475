//! Ollama HTTP client for embeddings and streamed chat.

pub mod client;
pub mod errors;
pub mod models;
pub mod retry;
pub mod stream;

pub use client::{OllamaClient, OllamaConfig, DEFAULT_BASE_URL};
pub use errors::{OllamaError, RetryError};
pub use models::{ChatChunk, ChatMessage, ChatRequest, EmbedRequest, EmbedResponse};
pub use retry::{with_retry, RetryConfig};
pub use stream::fragment_stream;
