#[cfg(feature = "reqwest")]
pub mod cli;
pub mod config;
pub mod env;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;

pub use error::{RagError, Result, ServiceError};
pub use logging::{init_logging, LoggingConfig};
pub use models::{Chunk, Document, Embedding, QueryState, RetrievalResult, ScoredChunk};
pub use services::{Answer, RagSession, SessionConfig};
