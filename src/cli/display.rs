//! Terminal output shared by the interactive commands.

use std::io;
use std::time::Duration;

use anyhow::anyhow;
use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};

use crate::error::RagError;
use crate::logging::log_error;
use crate::models::{Document, RetrievalResult};
use crate::services::{Answer, RagSession, RebuildOutcome};

const CURSOR: &str = "\u{258C}";

pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Writes a growing answer to stdout, showing a cursor after the text while
/// more is expected.
pub struct StreamPrinter {
    term: Term,
    printed: usize,
    show_cursor: bool,
    cursor_visible: bool,
}

impl StreamPrinter {
    pub fn new() -> Self {
        let term = Term::stdout();
        let show_cursor = term.is_term();
        Self {
            term,
            printed: 0,
            show_cursor,
            cursor_visible: false,
        }
    }

    /// Print whatever `partial` adds beyond what was already shown.
    pub fn update(&mut self, partial: &str) -> io::Result<()> {
        let delta = partial.get(self.printed..).unwrap_or_default();
        self.hide_cursor()?;
        self.term.write_str(delta)?;
        if self.show_cursor {
            self.term.write_str(CURSOR)?;
            self.cursor_visible = true;
        }
        self.printed = partial.len();
        self.term.flush()
    }

    pub fn finish(&mut self) -> io::Result<()> {
        self.hide_cursor()?;
        if self.printed > 0 {
            self.term.write_line("")?;
        }
        self.term.flush()
    }

    fn hide_cursor(&mut self) -> io::Result<()> {
        if self.cursor_visible {
            self.term.clear_chars(1)?;
            self.cursor_visible = false;
        }
        Ok(())
    }
}

impl Default for StreamPrinter {
    fn default() -> Self {
        Self::new()
    }
}

/// Load `document` into the session behind a spinner.
pub async fn index_document(session: &mut RagSession, document: &Document) -> anyhow::Result<()> {
    let pb = spinner(&format!("Indexing {}...", document.name));
    let outcome = session.load_document(document).await;
    pb.finish_and_clear();

    match outcome {
        Ok(RebuildOutcome::Unchanged) => {
            eprintln!(
                "{} {} is already indexed",
                style("•").dim(),
                style(&document.name).cyan()
            );
            Ok(())
        }
        Ok(RebuildOutcome::Rebuilt { records }) => {
            eprintln!(
                "{} Indexed {} chunks from {}",
                style("✓").green(),
                records,
                style(&document.name).cyan()
            );
            Ok(())
        }
        Err(error) => Err(report(error, "index")),
    }
}

/// Ask `question`, streaming the answer to stdout as it arrives.
pub async fn stream_answer(session: &mut RagSession, question: &str) -> anyhow::Result<Answer> {
    let pb = spinner("Thinking...");
    let mut printer = StreamPrinter::new();
    let mut write_error = None;

    let result = session
        .ask(question, |partial| {
            if !pb.is_finished() {
                pb.finish_and_clear();
            }
            if let Err(e) = printer.update(partial) {
                write_error.get_or_insert(e);
            }
        })
        .await;

    pb.finish_and_clear();
    printer.finish()?;
    if let Some(e) = write_error {
        return Err(e.into());
    }

    result.map_err(|error| {
        if error.partial_answer().is_some() {
            eprintln!("{}", style("[answer incomplete]").yellow());
        }
        report(error, "ask")
    })
}

pub fn print_context(retrieved: &RetrievalResult) {
    if retrieved.is_empty() {
        println!("{}", style("No context retrieved.").dim());
        return;
    }

    println!("{}", style("Retrieved context:").bold());
    for entry in retrieved.entries() {
        println!(
            "  {} {}",
            style(format!("({:.2})", entry.score)).dim(),
            entry.chunk
        );
    }
}

fn report(error: RagError, context: &str) -> anyhow::Error {
    log_error(&error, context, error.category());
    anyhow!(error.user_message())
}
