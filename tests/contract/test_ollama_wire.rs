use std::io;

use bytes::Bytes;
use futures::{stream, StreamExt};
use ragline::error::ServiceError;
use ragline::services::ollama::{
    fragment_stream, ChatChunk, ChatRequest, EmbedRequest, EmbedResponse, OllamaError,
};
use reqwest::StatusCode;

const CHAT_BODY: &str = concat!(
    r#"{"model":"llama3.2","created_at":"2024-06-01T10:00:00Z","message":{"role":"assistant","content":"Paris"},"done":false}"#,
    "\n",
    r#"{"model":"llama3.2","created_at":"2024-06-01T10:00:00Z","message":{"role":"assistant","content":" is"},"done":false}"#,
    "\n",
    r#"{"model":"llama3.2","created_at":"2024-06-01T10:00:00Z","message":{"role":"assistant","content":" the capital."},"done":false}"#,
    "\n",
    r#"{"model":"llama3.2","created_at":"2024-06-01T10:00:01Z","message":{"role":"assistant","content":""},"done":true,"done_reason":"stop","total_duration":123,"eval_count":5}"#,
    "\n",
);

fn chunked(body: &str, size: usize) -> Vec<Result<Bytes, io::Error>> {
    body.as_bytes()
        .chunks(size)
        .map(|part| Ok(Bytes::copy_from_slice(part)))
        .collect()
}

#[tokio::test]
async fn test_chat_body_decodes_for_any_chunking() {
    for size in [1, 7, 64, CHAT_BODY.len()] {
        let fragments: Vec<String> = fragment_stream(stream::iter(chunked(CHAT_BODY, size)))
            .map(|item| item.unwrap())
            .collect()
            .await;
        assert_eq!(fragments, vec!["Paris", " is", " the capital."], "size {size}");
    }
}

#[tokio::test]
async fn test_error_line_ends_stream() {
    let body = "{\"error\":\"an unknown error was encountered while running the model\"}\n";
    let items: Vec<_> = fragment_stream(stream::iter(chunked(body, 16)))
        .collect()
        .await;

    assert_eq!(items.len(), 1);
    assert!(matches!(&items[0], Err(ServiceError::Server { message }) if message.contains("unknown error")));
}

#[test]
fn test_chat_request_matches_api() {
    let request = ChatRequest::new("llama3.2", "system text", "question?");
    let value = serde_json::to_value(&request).unwrap();

    assert_eq!(
        value,
        serde_json::json!({
            "model": "llama3.2",
            "messages": [
                {"role": "system", "content": "system text"},
                {"role": "user", "content": "question?"}
            ],
            "stream": true
        })
    );
}

#[test]
fn test_embed_round_trip_shapes() {
    let request = EmbedRequest {
        model: "bge".to_string(),
        input: "Paris".to_string(),
    };
    assert_eq!(
        serde_json::to_value(&request).unwrap(),
        serde_json::json!({"model": "bge", "input": "Paris"})
    );

    let body = r#"{"model":"bge","embeddings":[[0.5,-0.25]],"total_duration":1,"load_duration":1,"prompt_eval_count":2}"#;
    let response: EmbedResponse = serde_json::from_str(body).unwrap();
    assert_eq!(response.into_first(), Some(vec![0.5, -0.25]));
}

#[test]
fn test_final_chunk_fields() {
    let line = CHAT_BODY.lines().last().unwrap();
    let chunk: ChatChunk = serde_json::from_str(line).unwrap();
    assert!(chunk.done);
    assert_eq!(chunk.content(), "");
    assert_eq!(chunk.eval_count, Some(5));
}

#[test]
fn test_status_errors_map_to_service_errors() {
    let not_found: ServiceError = OllamaError::from_status_and_body(
        StatusCode::NOT_FOUND,
        r#"{"error":"model \"nomic-embed-text\" not found, try pulling it first"}"#,
    )
    .into();
    assert_eq!(
        not_found,
        ServiceError::ModelNotFound {
            model: "nomic-embed-text".to_string()
        }
    );

    let busy: ServiceError =
        OllamaError::from_status_and_body(StatusCode::TOO_MANY_REQUESTS, "slow down").into();
    assert!(matches!(busy, ServiceError::RateLimit { .. }));
    assert!(busy.is_retryable());

    let bad: ServiceError = OllamaError::from_status_and_body(
        StatusCode::BAD_REQUEST,
        r#"{"error":"invalid input type"}"#,
    )
    .into();
    assert!(!bad.is_retryable());
}
