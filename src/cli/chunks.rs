use anyhow::Result;
use console::style;
use std::path::PathBuf;

use super::read_document;
use crate::config::Config;
use crate::services::ChunkingStrategy;

/// Handle `ragline chunks`: show the chunks a document would be indexed as
pub async fn handle_chunks_command(file: PathBuf, chunker: Option<ChunkingStrategy>) -> Result<()> {
    let strategy = match chunker {
        Some(strategy) => strategy,
        None => Config::load()?.resolve()?.chunking,
    };

    let document = read_document(&file)?;
    let chunks = strategy.chunker().chunk(&document.content);

    println!(
        "{} {} chunks from {} ({} chunker)",
        style("✓").green(),
        chunks.len(),
        style(&document.name).cyan(),
        strategy
    );
    println!();

    let width = chunks.len().to_string().len();
    for (i, chunk) in chunks.iter().enumerate() {
        println!("  {} {}", style(format!("{:>width$}.", i + 1)).dim(), chunk);
    }

    Ok(())
}
