use ragline::models::Chunk;
use ragline::services::{Chunker, ChunkingStrategy, LineChunker, ParagraphChunker};

fn texts(chunks: &[Chunk]) -> Vec<&str> {
    chunks.iter().map(Chunk::as_str).collect()
}

#[test]
fn test_blank_lines_dropped_and_order_kept() {
    let chunks = LineChunker.chunk("first\n\n   \nsecond\nthird\n");
    assert_eq!(texts(&chunks), vec!["first", "second", "third"]);
}

#[test]
fn test_crlf_and_indentation_trimmed() {
    let chunks = LineChunker.chunk("  alpha  \r\n\tbeta\r\n\r\ngamma");
    assert_eq!(texts(&chunks), vec!["alpha", "beta", "gamma"]);
}

#[test]
fn test_empty_and_whitespace_documents() {
    assert!(LineChunker.chunk("").is_empty());
    assert!(LineChunker.chunk("\n\n \t \n").is_empty());
    assert!(ParagraphChunker.chunk("  \n\n").is_empty());
}

#[test]
fn test_duplicate_lines_are_separate_chunks() {
    let chunks = LineChunker.chunk("same\nsame");
    assert_eq!(chunks.len(), 2);
}

#[test]
fn test_paragraphs_collapse_whitespace() {
    let text = "Paris is the capital\n  of France.\n\n\nBerlin   is the capital\nof Germany.";
    let chunks = ParagraphChunker.chunk(text);
    assert_eq!(
        texts(&chunks),
        vec![
            "Paris is the capital of France.",
            "Berlin is the capital of Germany."
        ]
    );
}

#[test]
fn test_strategy_selection() {
    let text = "a\nb\n\nc";
    assert_eq!(ChunkingStrategy::Line.chunker().chunk(text).len(), 3);
    assert_eq!(ChunkingStrategy::Paragraph.chunker().chunk(text).len(), 2);
    assert_eq!(ChunkingStrategy::default(), ChunkingStrategy::Line);

    assert_eq!("Paragraph".parse::<ChunkingStrategy>(), Ok(ChunkingStrategy::Paragraph));
    assert!("sentence".parse::<ChunkingStrategy>().is_err());
    assert_eq!(ChunkingStrategy::Paragraph.to_string(), "paragraph");
}
