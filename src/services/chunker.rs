//! Document chunking policies.

use serde::{Deserialize, Serialize};

use crate::models::Chunk;

/// Splits document text into retrievable chunks, in document order.
pub trait Chunker: Send + Sync {
    fn chunk(&self, document_text: &str) -> Vec<Chunk>;

    fn name(&self) -> &'static str;
}

/// One chunk per non-blank line.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineChunker;

impl Chunker for LineChunker {
    fn chunk(&self, document_text: &str) -> Vec<Chunk> {
        document_text.lines().filter_map(Chunk::new).collect()
    }

    fn name(&self) -> &'static str {
        "line"
    }
}

/// One chunk per blank-line separated paragraph, with inner whitespace
/// (including line breaks) collapsed to single spaces.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParagraphChunker;

impl Chunker for ParagraphChunker {
    fn chunk(&self, document_text: &str) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        let mut current: Vec<&str> = Vec::new();

        for line in document_text.lines() {
            if line.trim().is_empty() {
                chunks.extend(Self::flush(&mut current));
            } else {
                current.push(line);
            }
        }
        chunks.extend(Self::flush(&mut current));

        chunks
    }

    fn name(&self) -> &'static str {
        "paragraph"
    }
}

impl ParagraphChunker {
    fn flush(lines: &mut Vec<&str>) -> Option<Chunk> {
        let joined = lines
            .drain(..)
            .flat_map(str::split_whitespace)
            .collect::<Vec<_>>()
            .join(" ");
        Chunk::new(&joined)
    }
}

/// Chunking policy selectable from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ChunkingStrategy {
    #[default]
    Line,
    Paragraph,
}

impl ChunkingStrategy {
    pub fn chunker(self) -> Box<dyn Chunker> {
        match self {
            ChunkingStrategy::Line => Box::new(LineChunker),
            ChunkingStrategy::Paragraph => Box::new(ParagraphChunker),
        }
    }
}

impl std::str::FromStr for ChunkingStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "line" | "lines" => Ok(ChunkingStrategy::Line),
            "paragraph" | "paragraphs" => Ok(ChunkingStrategy::Paragraph),
            _ => Err(format!(
                "Unknown chunking strategy: {s}. Valid options: line, paragraph"
            )),
        }
    }
}

impl std::fmt::Display for ChunkingStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChunkingStrategy::Line => write!(f, "line"),
            ChunkingStrategy::Paragraph => write!(f, "paragraph"),
        }
    }
}
