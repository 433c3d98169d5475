use thiserror::Error;

/// Errors raised by the model services behind [`crate::services::EmbeddingClient`]
/// and [`crate::services::GenerationClient`].
///
/// Provider-agnostic: each concrete client maps its transport errors into
/// these variants.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ServiceError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Network error: {message}")]
    Network { message: String },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Rate limit exceeded: {message}")]
    RateLimit { message: String },

    #[error("Model not found: {model}")]
    ModelNotFound { model: String },

    #[error("Server error: {message}")]
    Server { message: String },

    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },
}

impl ServiceError {
    /// Check if the error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ServiceError::Network { .. }
                | ServiceError::Timeout { .. }
                | ServiceError::RateLimit { .. }
                | ServiceError::Server { .. }
        )
    }

    /// Convert to user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            ServiceError::Configuration { message } => format!("Configuration error: {message}"),
            ServiceError::Network { .. } => {
                "Could not reach the model server. Is Ollama running?".to_string()
            }
            ServiceError::Timeout { timeout_ms } => {
                format!("The model server did not answer within {timeout_ms}ms.")
            }
            ServiceError::RateLimit { .. } => {
                "The model server is busy. Please wait a moment and try again.".to_string()
            }
            ServiceError::ModelNotFound { model } => {
                format!("Model '{model}' is not available. Try `ollama pull {model}`.")
            }
            ServiceError::Server { .. } => {
                "The model server reported an internal error. Please try again.".to_string()
            }
            ServiceError::InvalidResponse { .. } => {
                "Received an invalid response from the model server.".to_string()
            }
        }
    }
}

/// Errors surfaced by the retrieval and generation pipeline.
#[derive(Error, Debug)]
pub enum RagError {
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Empty vector: a zero-norm embedding cannot be compared")]
    EmptyVector,

    #[error("Embedding service error: {source}")]
    EmbeddingService {
        #[source]
        source: ServiceError,
    },

    /// `partial` holds the text aggregated before the failure.
    #[error("Generation service error: {source}")]
    GenerationService {
        #[source]
        source: ServiceError,
        partial: String,
    },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RagError {
    pub fn embedding(source: ServiceError) -> Self {
        Self::EmbeddingService { source }
    }

    pub fn generation(source: ServiceError, partial: impl Into<String>) -> Self {
        Self::GenerationService {
            source,
            partial: partial.into(),
        }
    }

    pub fn invalid_config<S: Into<String>>(message: S) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Text produced before a generation failure, if any.
    pub fn partial_answer(&self) -> Option<&str> {
        match self {
            RagError::GenerationService { partial, .. } if !partial.is_empty() => Some(partial),
            _ => None,
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            RagError::DimensionMismatch { .. } => "dimension_mismatch",
            RagError::EmptyVector => "empty_vector",
            RagError::EmbeddingService { .. } => "embedding_service",
            RagError::GenerationService { .. } => "generation_service",
            RagError::InvalidConfig { .. } => "config",
            RagError::Io(_) => "io",
        }
    }

    /// Convert to user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            RagError::EmbeddingService { source } | RagError::GenerationService { source, .. } => {
                source.user_message()
            }
            other => other.to_string(),
        }
    }
}

/// Result type alias for the pipeline
pub type Result<T> = std::result::Result<T, RagError>;
