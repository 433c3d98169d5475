//! Decoding of Ollama's NDJSON chat stream into answer fragments.

use std::io;

use bytes::Bytes;
use futures::{stream, Stream, StreamExt};
use tokio_util::codec::{FramedRead, LinesCodec, LinesCodecError};
use tokio_util::io::StreamReader;

use super::models::ChatChunk;
use crate::error::ServiceError;
use crate::services::traits::GenerationStream;

/// Upper bound on one NDJSON line; a longer line ends the stream.
const MAX_LINE_BYTES: usize = 1024 * 1024;

enum Phase<L> {
    Streaming(L),
    Finished,
}

/// Turn a raw `/api/chat` response body into a fragment stream.
///
/// Empty fragments are dropped and the stream ends at the first
/// `"done": true` line. Any failure yields a single error item and ends the
/// stream, including a body that stops before `done`.
pub fn fragment_stream<S, E>(body: S) -> GenerationStream
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: Into<io::Error>,
{
    let lines = FramedRead::new(
        StreamReader::new(Box::pin(body)),
        LinesCodec::new_with_max_length(MAX_LINE_BYTES),
    );

    Box::pin(stream::unfold(Phase::Streaming(lines), |phase| async move {
        let mut lines = match phase {
            Phase::Streaming(lines) => lines,
            Phase::Finished => return None,
        };

        loop {
            let line = match lines.next().await {
                Some(Ok(line)) => line,
                Some(Err(error)) => return Some((Err(codec_error(error)), Phase::Finished)),
                None => {
                    return Some((
                        Err(ServiceError::InvalidResponse {
                            message: "chat stream ended before completion".to_string(),
                        }),
                        Phase::Finished,
                    ))
                }
            };

            if line.trim().is_empty() {
                continue;
            }

            let chunk: ChatChunk = match serde_json::from_str(&line) {
                Ok(chunk) => chunk,
                Err(e) => {
                    return Some((
                        Err(ServiceError::InvalidResponse {
                            message: format!("Failed to parse chat chunk: {e}"),
                        }),
                        Phase::Finished,
                    ))
                }
            };

            if let Some(message) = chunk.error {
                return Some((Err(ServiceError::Server { message }), Phase::Finished));
            }

            let content = chunk.content().to_string();
            let next = if chunk.done {
                tracing::debug!(
                    done_reason = chunk.done_reason.as_deref(),
                    eval_count = chunk.eval_count,
                    "Chat stream done"
                );
                Phase::Finished
            } else {
                Phase::Streaming(lines)
            };

            if !content.is_empty() {
                return Some((Ok(content), next));
            }
            match next {
                Phase::Finished => return None,
                Phase::Streaming(rest) => lines = rest,
            }
        }
    }))
}

fn codec_error(error: LinesCodecError) -> ServiceError {
    match error {
        LinesCodecError::MaxLineLengthExceeded => ServiceError::InvalidResponse {
            message: "chat chunk exceeds maximum line length".to_string(),
        },
        LinesCodecError::Io(e) => ServiceError::Network {
            message: e.to_string(),
        },
    }
}
