use thiserror::Error;

use crate::error::ServiceError;

#[derive(Debug, Error)]
pub enum OllamaError {
    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Network error: {source}")]
    NetworkError { source: reqwest::Error },

    #[error("Model not found: {message}")]
    ModelNotFound { message: String },

    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("Server busy: {message}")]
    ServerBusy { message: String },

    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    #[error("Parse error: {message}")]
    ParseError { message: String },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },
}

impl OllamaError {
    pub fn is_retryable(&self) -> bool {
        match self {
            OllamaError::Timeout { .. } => true,
            OllamaError::NetworkError { .. } => true,
            OllamaError::ServerBusy { .. } => true,
            OllamaError::ServerError { status, .. } => *status >= 500,
            _ => false,
        }
    }

    pub fn from_reqwest_error(error: reqwest::Error, timeout_ms: u64) -> Self {
        if error.is_timeout() {
            OllamaError::Timeout { timeout_ms }
        } else if error.is_decode() {
            OllamaError::ParseError {
                message: error.to_string(),
            }
        } else {
            OllamaError::NetworkError { source: error }
        }
    }

    /// Ollama reports failures as `{"error": "..."}` bodies.
    pub fn from_status_and_body(status: reqwest::StatusCode, body: &str) -> Self {
        let status_code = status.as_u16();

        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|value| value.get("error")?.as_str().map(str::to_string))
            .unwrap_or_else(|| body.to_string());

        match status_code {
            404 => OllamaError::ModelNotFound { message },
            400 | 422 => OllamaError::InvalidRequest { message },
            429 | 503 => OllamaError::ServerBusy { message },
            500..=599 => OllamaError::ServerError {
                status: status_code,
                message,
            },
            _ => OllamaError::InvalidRequest {
                message: format!("HTTP {status_code}: {message}"),
            },
        }
    }
}

impl From<OllamaError> for ServiceError {
    fn from(err: OllamaError) -> Self {
        match err {
            OllamaError::Timeout { timeout_ms } => ServiceError::Timeout { timeout_ms },
            OllamaError::NetworkError { source } => ServiceError::Network {
                message: source.to_string(),
            },
            OllamaError::ModelNotFound { message } => ServiceError::ModelNotFound {
                model: model_from_message(&message).unwrap_or(message),
            },
            OllamaError::InvalidRequest { message } => ServiceError::InvalidResponse { message },
            OllamaError::ServerBusy { message } => ServiceError::RateLimit { message },
            OllamaError::ServerError { message, .. } => ServiceError::Server { message },
            OllamaError::ParseError { message } => ServiceError::InvalidResponse { message },
            OllamaError::ConfigurationError { message } => ServiceError::Configuration { message },
        }
    }
}

/// Pull the quoted model name out of `model "x" not found, try pulling it first`.
fn model_from_message(message: &str) -> Option<String> {
    let start = message.find(|c: char| c == '"' || c == '\'')?;
    let quote = message[start..].chars().next()?;
    let rest = &message[start + 1..];
    let end = rest.find(quote)?;
    Some(rest[..end].to_string())
}

#[derive(Debug, Error)]
pub enum RetryError {
    #[error("Maximum retry attempts exceeded: {last}")]
    MaxAttemptsExceeded { last: OllamaError },

    #[error("Retry timeout exceeded")]
    TimeoutExceeded,

    #[error("Non-retryable error: {source}")]
    NonRetryable { source: OllamaError },
}

impl RetryError {
    pub fn into_inner(self, timeout_ms: u64) -> OllamaError {
        match self {
            RetryError::MaxAttemptsExceeded { last } => last,
            RetryError::NonRetryable { source } => source,
            RetryError::TimeoutExceeded => OllamaError::Timeout { timeout_ms },
        }
    }
}
