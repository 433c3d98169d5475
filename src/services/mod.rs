pub mod aggregator;
pub mod chunker;
#[cfg(feature = "reqwest")]
pub mod ollama;
pub mod prompt;
pub mod retriever;
pub mod session;
pub mod similarity;
pub mod traits;
pub mod vector_store;

pub use aggregator::ResponseAggregator;
pub use chunker::{Chunker, ChunkingStrategy, LineChunker, ParagraphChunker};
pub use prompt::{Prompt, PromptAssembler, CONTEXT_PLACEHOLDER, DEFAULT_TEMPLATE};
pub use retriever::{Retriever, DEFAULT_TOP_K};
pub use session::{Answer, RagSession, SessionConfig};
pub use similarity::cosine_similarity;
pub use traits::{EmbeddingClient, GenerationClient, GenerationStream};
pub use vector_store::{RebuildOutcome, SimilarityIndex, VectorRecord, VectorStore};
