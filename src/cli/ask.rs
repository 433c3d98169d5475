use anyhow::Result;
use std::path::PathBuf;

use super::display::{index_document, print_context, stream_answer};
use super::{open_session, read_document};
use crate::config::Config;

/// Handle `ragline ask`
pub async fn handle_ask_command(
    file: PathBuf,
    question: String,
    top_k: Option<usize>,
    show_context: bool,
) -> Result<()> {
    let mut settings = Config::load()?.resolve()?;
    if let Some(k) = top_k {
        settings.top_k = k;
    }

    let document = read_document(&file)?;
    let mut session = open_session(&settings)?;
    index_document(&mut session, &document).await?;

    let answer = stream_answer(&mut session, &question).await?;
    if show_context {
        println!();
        print_context(&answer.retrieved);
    }

    Ok(())
}
