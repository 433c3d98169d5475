//! Accumulates a streamed answer.

use futures::StreamExt;
use tracing::{debug, warn};

use super::traits::GenerationStream;
use crate::error::{RagError, Result};

/// Concatenates fragments strictly in arrival order.
#[derive(Debug, Default, Clone)]
pub struct ResponseAggregator {
    text: String,
    fragments: usize,
}

impl ResponseAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one fragment and return the accumulated text so far.
    pub fn push(&mut self, fragment: &str) -> &str {
        self.text.push_str(fragment);
        self.fragments += 1;
        &self.text
    }

    pub fn partial(&self) -> &str {
        &self.text
    }

    pub fn fragments(&self) -> usize {
        self.fragments
    }

    pub fn finish(self) -> String {
        self.text
    }

    /// Drain `stream`, calling `on_progress` with the accumulated text after
    /// every fragment.
    ///
    /// A stream error ends aggregation with `GenerationService`, carrying the
    /// text received before it.
    pub async fn collect<F>(mut self, mut stream: GenerationStream, mut on_progress: F) -> Result<String>
    where
        F: FnMut(&str),
    {
        while let Some(item) = stream.next().await {
            match item {
                Ok(fragment) => on_progress(self.push(&fragment)),
                Err(source) => {
                    warn!(
                        fragments = self.fragments,
                        partial_len = self.text.len(),
                        error = %source,
                        "Generation stream failed"
                    );
                    return Err(RagError::generation(source, self.text));
                }
            }
        }

        debug!(fragments = self.fragments, len = self.text.len(), "Generation stream exhausted");
        Ok(self.text)
    }
}
