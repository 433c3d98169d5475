use std::cmp::Ordering;

use serde::Serialize;

use super::chunk::Chunk;

/// A chunk paired with its similarity to the query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredChunk {
    pub chunk: Chunk,
    pub score: f32,
}

/// Ranked retrieval output: highest score first, at most `k` entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RetrievalResult {
    entries: Vec<ScoredChunk>,
}

impl RetrievalResult {
    /// Stable-sort `scored` by descending score and keep the first `k`.
    ///
    /// Equal scores keep their input (document) order. `-0.0` and `0.0`
    /// count as equal.
    pub fn rank(mut scored: Vec<ScoredChunk>, k: usize) -> Self {
        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        scored.truncate(k);
        Self { entries: scored }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[ScoredChunk] {
        &self.entries
    }

    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.entries.iter().map(|entry| &entry.chunk)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for RetrievalResult {
    type Item = ScoredChunk;
    type IntoIter = std::vec::IntoIter<ScoredChunk>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
