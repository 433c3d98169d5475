use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// A retrievable unit of source text.
///
/// Always non-empty and trimmed. Cloning shares the underlying text so a
/// chunk can sit in the store and in any number of retrieval results.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Chunk(Arc<str>);

impl Chunk {
    /// Trim `text` and wrap it, or `None` when nothing is left.
    pub fn new(text: &str) -> Option<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(Arc::from(trimmed)))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<str> for Chunk {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Chunk {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Chunk::new(&value).ok_or_else(|| "chunk text must not be blank".to_string())
    }
}

impl From<Chunk> for String {
    fn from(chunk: Chunk) -> Self {
        chunk.0.to_string()
    }
}
