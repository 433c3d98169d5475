use std::io;
use std::time::Duration;

use async_trait::async_trait;
use futures::TryStreamExt;
use reqwest::{Client, Response};
use tokio::time::timeout;

use super::errors::OllamaError;
use super::models::{ChatRequest, EmbedRequest, EmbedResponse};
use super::retry::{with_retry, RetryConfig};
use super::stream::fragment_stream;
use crate::env::ollama as env_vars;
use crate::error::ServiceError;
use crate::models::Embedding;
use crate::services::traits::{EmbeddingClient, GenerationClient, GenerationStream};

pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

#[derive(Debug, Clone)]
pub struct OllamaConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub max_retries: usize,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        let base_url = std::env::var(env_vars::HOST)
            .ok()
            .filter(|host| !host.trim().is_empty())
            .map(|host| normalize_base_url(&host))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Self {
            base_url,
            timeout: Duration::from_secs(120),
            max_retries: 3,
        }
    }
}

impl OllamaConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: normalize_base_url(base_url),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn validate(&self) -> Result<(), OllamaError> {
        if self.base_url.is_empty() {
            return Err(OllamaError::ConfigurationError {
                message: "Base URL cannot be empty".to_string(),
            });
        }

        if self.timeout.is_zero() {
            return Err(OllamaError::ConfigurationError {
                message: "Timeout must be greater than zero".to_string(),
            });
        }

        Ok(())
    }

    fn timeout_ms(&self) -> u64 {
        self.timeout.as_millis() as u64
    }
}

/// Accepts the forms `OLLAMA_HOST` takes: `host:port`, `http://host:port`,
/// with or without a trailing slash.
fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return String::new();
    }
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    }
}

#[derive(Clone)]
pub struct OllamaClient {
    config: OllamaConfig,
    client: Client,
}

impl OllamaClient {
    pub fn new(config: OllamaConfig) -> Result<Self, OllamaError> {
        config.validate()?;

        // No whole-request timeout: it would cut long chat streams short.
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| OllamaError::ConfigurationError {
                message: format!("Failed to create HTTP client: {e}"),
            })?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &OllamaConfig {
        &self.config
    }

    fn retry_config(&self) -> RetryConfig {
        RetryConfig::new(self.config.max_retries).with_total_timeout(self.config.timeout)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/{path}", self.config.base_url)
    }

    pub async fn embed_text(&self, model: &str, text: &str) -> Result<Vec<f32>, OllamaError> {
        let request = EmbedRequest {
            model: model.to_string(),
            input: text.to_string(),
        };

        with_retry(self.retry_config(), || self.embed_once(&request))
            .await
            .map_err(|e| e.into_inner(self.config.timeout_ms()))
    }

    async fn embed_once(&self, request: &EmbedRequest) -> Result<Vec<f32>, OllamaError> {
        let response = self
            .client
            .post(self.url("embed"))
            .timeout(self.config.timeout)
            .json(request)
            .send()
            .await
            .map_err(|e| OllamaError::from_reqwest_error(e, self.config.timeout_ms()))?;

        let response = Self::check_status(response).await?;
        let text = response
            .text()
            .await
            .map_err(|e| OllamaError::from_reqwest_error(e, self.config.timeout_ms()))?;

        let parsed: EmbedResponse =
            serde_json::from_str(&text).map_err(|e| OllamaError::ParseError {
                message: format!("Failed to parse embed response: {e}"),
            })?;

        parsed.into_first().ok_or_else(|| OllamaError::ParseError {
            message: "embed response contained no embeddings".to_string(),
        })
    }

    /// Submit a streaming chat request. Only submission is retried; once the
    /// body starts arriving, failures surface through the stream.
    pub async fn start_chat(&self, request: ChatRequest) -> Result<Response, OllamaError> {
        with_retry(self.retry_config(), || self.chat_once(&request))
            .await
            .map_err(|e| e.into_inner(self.config.timeout_ms()))
    }

    async fn chat_once(&self, request: &ChatRequest) -> Result<Response, OllamaError> {
        let response = timeout(
            self.config.timeout,
            self.client.post(self.url("chat")).json(request).send(),
        )
        .await
        .map_err(|_| OllamaError::Timeout {
            timeout_ms: self.config.timeout_ms(),
        })?
        .map_err(|e| OllamaError::from_reqwest_error(e, self.config.timeout_ms()))?;

        Self::check_status(response).await
    }

    async fn check_status(response: Response) -> Result<Response, OllamaError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error_body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read error response".to_string());

        Err(OllamaError::from_status_and_body(status, &error_body))
    }
}

#[async_trait]
impl EmbeddingClient for OllamaClient {
    async fn embed(&self, model: &str, text: &str) -> Result<Embedding, ServiceError> {
        let values = self.embed_text(model, text).await?;
        Embedding::new(values)
    }
}

#[async_trait]
impl GenerationClient for OllamaClient {
    async fn chat(
        &self,
        model: &str,
        system_instruction: &str,
        user_message: &str,
    ) -> Result<GenerationStream, ServiceError> {
        let request = ChatRequest::new(model, system_instruction, user_message);
        let response = self.start_chat(request).await?;

        let body = response
            .bytes_stream()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e));

        Ok(fragment_stream(body))
    }
}
