#[path = "../common/mod.rs"]
mod common;

use std::sync::Arc;

use async_trait::async_trait;
use common::{ConstantEmbedder, KeywordEmbedder, ScriptedGenerator, CAPITALS};
use ragline::error::{RagError, ServiceError};
use ragline::models::{Document, Embedding, QueryState};
use ragline::services::{EmbeddingClient, RagSession, SessionConfig};

fn config() -> SessionConfig {
    SessionConfig::new("embed", "chat")
}

#[tokio::test]
async fn test_query_embedding_failure_fails_round_trip() {
    let embedder = Arc::new(KeywordEmbedder::failing_on("?"));
    let generator = Arc::new(ScriptedGenerator::new(&["unused"]));
    let mut session = RagSession::new(embedder, generator.clone(), config());
    session
        .load_document(&Document::new("capitals.txt", CAPITALS))
        .await
        .unwrap();

    let error = session
        .ask("What is the capital of France?", |_| {})
        .await
        .unwrap_err();

    match &error {
        RagError::EmbeddingService { source } => assert!(source.is_retryable()),
        other => panic!("expected EmbeddingService, got {other:?}"),
    }
    assert_eq!(session.state(), QueryState::Failed);
    assert!(generator.calls().is_empty());
    assert!(error.user_message().contains("Ollama"));

    // A later question starts a fresh round trip.
    let answer = session.ask("capital of France", |_| {}).await.unwrap();
    assert_eq!(answer.text, "unused");
    assert_eq!(session.state(), QueryState::Complete);
}

#[tokio::test]
async fn test_stream_failure_keeps_partial_answer() {
    let embedder = Arc::new(KeywordEmbedder::new());
    let generator = Arc::new(ScriptedGenerator::failing_after(
        &["The ", "cat "],
        ServiceError::Network {
            message: "connection reset".to_string(),
        },
    ));
    let mut session = RagSession::new(embedder, generator, config());

    let mut last = String::new();
    let error = session
        .ask("What did the cat do?", |partial| last = partial.to_string())
        .await
        .unwrap_err();

    assert_eq!(last, "The cat ");
    assert_eq!(error.partial_answer(), Some("The cat "));
    assert_eq!(error.category(), "generation_service");
    assert_eq!(session.state(), QueryState::Failed);
}

#[tokio::test]
async fn test_generation_refused_before_first_fragment() {
    let embedder = Arc::new(KeywordEmbedder::new());
    let generator = Arc::new(ScriptedGenerator::refusing(ServiceError::ModelNotFound {
        model: "chat".to_string(),
    }));
    let mut session = RagSession::new(embedder, generator, config());

    let error = session.ask("Hello", |_| {}).await.unwrap_err();

    match &error {
        RagError::GenerationService { source, partial } => {
            assert_eq!(
                source,
                &ServiceError::ModelNotFound {
                    model: "chat".to_string()
                }
            );
            assert!(partial.is_empty());
        }
        other => panic!("expected GenerationService, got {other:?}"),
    }
    assert_eq!(error.partial_answer(), None);
    assert!(error.user_message().contains("ollama pull chat"));
    assert_eq!(session.state(), QueryState::Failed);
}

#[tokio::test]
async fn test_zero_vector_rejected_at_index_time() {
    let embedder = Arc::new(ConstantEmbedder(vec![0.0, 0.0, 0.0]));
    let generator = Arc::new(ScriptedGenerator::new(&["ok"]));
    let mut session = RagSession::new(embedder, generator, config());

    let error = session
        .load_document(&Document::new("capitals.txt", CAPITALS))
        .await
        .unwrap_err();

    assert!(matches!(error, RagError::EmptyVector));
    assert!(session.store().is_empty());
}

/// Three components for statements, two for questions.
struct QuestionWidthEmbedder;

#[async_trait]
impl EmbeddingClient for QuestionWidthEmbedder {
    async fn embed(&self, _model: &str, text: &str) -> Result<Embedding, ServiceError> {
        if text.ends_with('?') {
            Embedding::new(vec![1.0, 1.0])
        } else {
            Embedding::new(vec![1.0, 0.5, 0.25])
        }
    }
}

#[tokio::test]
async fn test_query_dimension_mismatch() {
    let generator = Arc::new(ScriptedGenerator::new(&["ok"]));
    let mut session = RagSession::new(Arc::new(QuestionWidthEmbedder), generator.clone(), config());
    session
        .load_document(&Document::new("capitals.txt", CAPITALS))
        .await
        .unwrap();

    let error = session.ask("Where is Paris?", |_| {}).await.unwrap_err();

    assert!(matches!(
        error,
        RagError::DimensionMismatch {
            expected: 3,
            actual: 2
        }
    ));
    assert_eq!(session.state(), QueryState::Failed);
    assert!(generator.calls().is_empty());
}

#[tokio::test]
async fn test_mixed_widths_abort_rebuild() {
    let generator = Arc::new(ScriptedGenerator::new(&["ok"]));
    let mut session = RagSession::new(Arc::new(QuestionWidthEmbedder), generator, config());

    let error = session
        .load_document(&Document::new("faq.txt", "Paris is in France.\nIs Berlin in Germany?\n"))
        .await
        .unwrap_err();

    assert!(matches!(
        error,
        RagError::DimensionMismatch {
            expected: 3,
            actual: 2
        }
    ));
    assert!(session.store().is_empty());
    assert_eq!(session.store().document_id(), None);
}

#[test]
fn test_invalid_template_is_config_error() {
    let error = ragline::services::PromptAssembler::with_template("no slot").unwrap_err();
    assert_eq!(error.category(), "config");
}
