use anyhow::Result;
use console::style;
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, BufReader};

use super::display::{index_document, print_context, stream_answer};
use super::{open_session, read_document};
use crate::config::Config;

#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Empty,
    Quit,
    Help,
    Load(&'a str),
    Question(&'a str),
    Unknown(&'a str),
}

fn parse_input(line: &str) -> Input<'_> {
    let line = line.trim();
    if line.is_empty() {
        return Input::Empty;
    }
    let Some(command) = line.strip_prefix(':') else {
        return Input::Question(line);
    };

    let (name, arg) = match command.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (command, ""),
    };
    match name {
        "q" | "quit" | "exit" => Input::Quit,
        "h" | "help" => Input::Help,
        "load" if !arg.is_empty() => Input::Load(arg),
        _ => Input::Unknown(line),
    }
}

fn print_help() {
    println!("  {}  ask about the loaded document", style("<question>").cyan());
    println!("  {}  switch to another document", style(":load FILE").cyan());
    println!("  {}       exit", style(":quit").cyan());
}

/// Handle `ragline chat`
pub async fn handle_chat_command(file: PathBuf, show_context: bool) -> Result<()> {
    let settings = Config::load()?.resolve()?;
    let mut session = open_session(&settings)?;

    let document = read_document(&file)?;
    index_document(&mut session, &document).await?;

    println!(
        "{} {}",
        style("Chatting with").bold(),
        style(&settings.language_model).cyan()
    );
    println!("{}", style("Type :help for commands.").dim());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{} ", style(">").green().bold());
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            println!();
            break;
        };

        match parse_input(&line) {
            Input::Empty => continue,
            Input::Quit => break,
            Input::Help => print_help(),
            Input::Unknown(command) => {
                eprintln!("{} Unknown command: {command}", style("✗").red());
            }
            Input::Load(path) => {
                let loaded = match read_document(Path::new(path)) {
                    Ok(document) => index_document(&mut session, &document).await,
                    Err(e) => Err(e),
                };
                if let Err(e) = loaded {
                    eprintln!("{} {e:#}", style("✗").red());
                }
            }
            Input::Question(question) => match stream_answer(&mut session, question).await {
                Ok(answer) => {
                    if show_context {
                        print_context(&answer.retrieved);
                    }
                }
                Err(e) => eprintln!("{} {e}", style("✗").red()),
            },
        }
    }

    Ok(())
}
