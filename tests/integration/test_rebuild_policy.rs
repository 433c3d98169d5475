#[path = "../common/mod.rs"]
mod common;

use std::sync::Arc;

use common::{KeywordEmbedder, ScriptedGenerator, CAPITALS};
use ragline::error::RagError;
use ragline::models::{Chunk, Document};
use ragline::services::{
    Chunker, LineChunker, RagSession, RebuildOutcome, SessionConfig, VectorStore,
};

fn chunks(text: &str) -> Vec<Chunk> {
    LineChunker.chunk(text)
}

#[tokio::test]
async fn test_same_document_is_embedded_once() {
    let embedder = Arc::new(KeywordEmbedder::new());
    let generator = Arc::new(ScriptedGenerator::new(&["ok"]));
    let mut session = RagSession::new(
        embedder.clone(),
        generator,
        SessionConfig::new("embed", "chat"),
    );
    let document = Document::new("capitals.txt", CAPITALS);

    session.load_document(&document).await.unwrap();
    assert_eq!(embedder.calls(), 3);

    let outcome = session.load_document(&document).await.unwrap();
    assert_eq!(outcome, RebuildOutcome::Unchanged);
    assert_eq!(embedder.calls(), 3);
}

#[tokio::test]
async fn test_new_document_replaces_every_record() {
    let embedder = Arc::new(KeywordEmbedder::new());
    let generator = Arc::new(ScriptedGenerator::new(&["ok"]));
    let mut session = RagSession::new(
        embedder.clone(),
        generator.clone(),
        SessionConfig::new("embed", "chat"),
    );

    session
        .load_document(&Document::new("capitals.txt", CAPITALS))
        .await
        .unwrap();
    session
        .load_document(&Document::new("pets.txt", "The cat sleeps.\nThe dog barks."))
        .await
        .unwrap();

    let stored: Vec<&str> = session
        .store()
        .records()
        .iter()
        .map(|r| r.chunk.as_str())
        .collect();
    assert_eq!(stored, vec!["The cat sleeps.", "The dog barks."]);
    assert_eq!(session.store().document_id(), Some("pets.txt"));

    let answer = session.ask("capital of France", |_| {}).await.unwrap();
    assert!(answer
        .retrieved
        .chunks()
        .all(|c| !c.as_str().contains("Paris")));
    assert!(!generator.last_call().system.contains("Paris"));
}

#[tokio::test]
async fn test_chunks_embedded_in_document_order() {
    let embedder = KeywordEmbedder::new();
    let mut store = VectorStore::new();

    store
        .rebuild("capitals.txt", chunks(CAPITALS), &embedder, "embed")
        .await
        .unwrap();

    assert_eq!(
        embedder.texts(),
        vec![
            "Paris is the capital of France.",
            "Berlin is the capital of Germany.",
            "The Eiffel Tower is in Paris.",
        ]
    );
    assert_eq!(store.dimensions(), Some(KeywordEmbedder::vector("x").len()));
}

#[tokio::test]
async fn test_model_change_forces_rebuild() {
    let embedder = KeywordEmbedder::new();
    let mut store = VectorStore::new();

    store
        .rebuild("capitals.txt", chunks(CAPITALS), &embedder, "model-a")
        .await
        .unwrap();
    let outcome = store
        .rebuild("capitals.txt", chunks(CAPITALS), &embedder, "model-b")
        .await
        .unwrap();

    assert_eq!(outcome, RebuildOutcome::Rebuilt { records: 3 });
    assert_eq!(embedder.calls(), 6);
    assert_eq!(store.embedding_model(), Some("model-b"));
}

#[tokio::test]
async fn test_failed_rebuild_rolls_back_and_retries() {
    let failing = KeywordEmbedder::failing_on("Germany");
    let mut store = VectorStore::new();

    store
        .rebuild("pets.txt", chunks("The cat sleeps."), &failing, "embed")
        .await
        .unwrap();

    let error = store
        .rebuild("capitals.txt", chunks(CAPITALS), &failing, "embed")
        .await
        .unwrap_err();
    assert!(matches!(error, RagError::EmbeddingService { .. }));
    assert!(store.is_empty());
    assert_eq!(store.document_id(), None);

    let healthy = KeywordEmbedder::new();
    let outcome = store
        .rebuild("capitals.txt", chunks(CAPITALS), &healthy, "embed")
        .await
        .unwrap();
    assert_eq!(outcome, RebuildOutcome::Rebuilt { records: 3 });
    assert_eq!(healthy.calls(), 3);
}
