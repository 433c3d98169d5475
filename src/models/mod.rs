pub mod chunk;
pub mod document;
pub mod embedding;
pub mod query_state;
pub mod retrieval;

pub use chunk::Chunk;
pub use document::Document;
pub use embedding::Embedding;
pub use query_state::QueryState;
pub use retrieval::{RetrievalResult, ScoredChunk};
