//! Environment variable constants used throughout the application
//!
//! Centralizes every environment variable name so the config layer, the
//! logging layer and the Ollama client agree on spelling.

/// Logging configuration
pub mod logging {
    /// Log level configuration (e.g., "debug", "info", "warn", "error")
    pub const LOG_LEVEL: &str = "RAGLINE_LOG_LEVEL";

    /// Log file path for file-based logging
    pub const LOG_FILE: &str = "RAGLINE_LOG_FILE";

    /// Disable colored output (follows the NO_COLOR standard)
    pub const NO_COLOR: &str = "NO_COLOR";
}

/// Model service configuration
pub mod ollama {
    /// Base URL of the Ollama server, same variable the Ollama CLI reads
    pub const HOST: &str = "OLLAMA_HOST";
}

/// Model and retrieval overrides
pub mod models {
    /// Embedding model identifier
    pub const EMBEDDING_MODEL: &str = "RAGLINE_EMBEDDING_MODEL";

    /// Chat model identifier
    pub const LANGUAGE_MODEL: &str = "RAGLINE_LANGUAGE_MODEL";

    /// Number of chunks handed to the prompt
    pub const TOP_K: &str = "RAGLINE_TOP_K";
}
