//! Deterministic stand-ins for the embedding and chat services.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use futures::stream;
use ragline::error::ServiceError;
use ragline::models::Embedding;
use ragline::services::{EmbeddingClient, GenerationClient, GenerationStream};

pub const CAPITALS: &str = "Paris is the capital of France.\n\
Berlin is the capital of Germany.\n\
The Eiffel Tower is in Paris.\n";

const VOCABULARY: &[&str] = &[
    "paris", "france", "berlin", "germany", "capital", "eiffel", "tower", "cat", "dog",
];

/// Bag-of-words embedder over a fixed vocabulary. A small constant bias
/// component keeps every vector non-zero.
#[derive(Default)]
pub struct KeywordEmbedder {
    calls: AtomicUsize,
    fail_containing: Option<String>,
    texts: Mutex<Vec<String>>,
}

impl KeywordEmbedder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail with a network error for any text containing `needle`.
    pub fn failing_on(needle: &str) -> Self {
        Self {
            fail_containing: Some(needle.to_string()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn texts(&self) -> Vec<String> {
        self.texts.lock().unwrap().clone()
    }

    pub fn vector(text: &str) -> Vec<f32> {
        let lower = text.to_lowercase();
        let words: Vec<&str> = lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();

        let mut values: Vec<f32> = VOCABULARY
            .iter()
            .map(|term| words.iter().filter(|w| *w == term).count() as f32)
            .collect();
        values.push(0.1);
        values
    }
}

#[async_trait]
impl EmbeddingClient for KeywordEmbedder {
    async fn embed(&self, _model: &str, text: &str) -> Result<Embedding, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.texts.lock().unwrap().push(text.to_string());

        if let Some(needle) = &self.fail_containing {
            if text.contains(needle.as_str()) {
                return Err(ServiceError::Network {
                    message: "connection refused".to_string(),
                });
            }
        }

        Embedding::new(Self::vector(text))
    }
}

/// Returns the same vector for every text.
pub struct ConstantEmbedder(pub Vec<f32>);

#[async_trait]
impl EmbeddingClient for ConstantEmbedder {
    async fn embed(&self, _model: &str, _text: &str) -> Result<Embedding, ServiceError> {
        Embedding::new(self.0.clone())
    }
}

/// One recorded `chat` call.
#[derive(Debug, Clone)]
pub struct ChatCall {
    pub model: String,
    pub system: String,
    pub user: String,
}

/// Replays scripted fragments, optionally ending with an error, and
/// records every request.
#[derive(Default)]
pub struct ScriptedGenerator {
    fragments: Vec<String>,
    stream_error: Option<ServiceError>,
    start_error: Option<ServiceError>,
    calls: Mutex<Vec<ChatCall>>,
}

impl ScriptedGenerator {
    pub fn new(fragments: &[&str]) -> Self {
        Self {
            fragments: fragments.iter().map(|f| f.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn failing_after(fragments: &[&str], error: ServiceError) -> Self {
        Self {
            stream_error: Some(error),
            ..Self::new(fragments)
        }
    }

    pub fn refusing(error: ServiceError) -> Self {
        Self {
            start_error: Some(error),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<ChatCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last_call(&self) -> ChatCall {
        self.calls().pop().expect("no chat call recorded")
    }
}

#[async_trait]
impl GenerationClient for ScriptedGenerator {
    async fn chat(
        &self,
        model: &str,
        system_instruction: &str,
        user_message: &str,
    ) -> Result<GenerationStream, ServiceError> {
        self.calls.lock().unwrap().push(ChatCall {
            model: model.to_string(),
            system: system_instruction.to_string(),
            user: user_message.to_string(),
        });

        if let Some(error) = &self.start_error {
            return Err(error.clone());
        }

        let mut items: Vec<Result<String, ServiceError>> =
            self.fragments.iter().cloned().map(Ok).collect();
        if let Some(error) = &self.stream_error {
            items.push(Err(error.clone()));
        }
        Ok(Box::pin(stream::iter(items)))
    }
}
