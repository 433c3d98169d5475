use backoff::{backoff::Backoff, ExponentialBackoff};
use std::future::Future;
use std::time::{Duration, Instant};

use super::errors::{OllamaError, RetryError};

#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_attempts: usize,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub multiplier: f64,
    pub jitter: bool,
    pub total_timeout: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(5),
            multiplier: 2.0,
            jitter: true,
            total_timeout: Duration::from_secs(120),
        }
    }
}

impl RetryConfig {
    pub fn new(max_attempts: usize) -> Self {
        Self {
            max_attempts,
            ..Default::default()
        }
    }

    pub fn with_total_timeout(mut self, timeout: Duration) -> Self {
        self.total_timeout = timeout;
        self
    }

    fn backoff(&self) -> ExponentialBackoff {
        let mut backoff = ExponentialBackoff {
            initial_interval: self.initial_delay,
            max_interval: self.max_delay,
            multiplier: self.multiplier,
            max_elapsed_time: Some(self.total_timeout),
            ..Default::default()
        };
        if !self.jitter {
            backoff.randomization_factor = 0.0;
        }
        backoff
    }
}

/// Run `operation` until it succeeds, fails with a non-retryable error, or
/// the attempt or time budget runs out. `max_attempts` counts the first try.
pub async fn with_retry<F, Fut, T>(config: RetryConfig, mut operation: F) -> Result<T, RetryError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, OllamaError>>,
{
    let mut backoff = config.backoff();
    let start = Instant::now();
    let max_attempts = config.max_attempts.max(1);
    let mut attempts = 0;

    loop {
        attempts += 1;

        let error = match operation().await {
            Ok(value) => return Ok(value),
            Err(error) => error,
        };

        if !error.is_retryable() {
            return Err(RetryError::NonRetryable { source: error });
        }
        if attempts >= max_attempts {
            return Err(RetryError::MaxAttemptsExceeded { last: error });
        }

        let delay = backoff.next_backoff().unwrap_or(config.max_delay);
        if start.elapsed() + delay > config.total_timeout {
            return Err(RetryError::TimeoutExceeded);
        }

        tracing::warn!(
            attempt = attempts,
            error = %error,
            delay_ms = delay.as_millis() as u64,
            "Ollama request failed with retryable error, retrying"
        );
        tokio::time::sleep(delay).await;
    }
}
