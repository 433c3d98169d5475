pub mod ask;
pub mod chat;
pub mod chunks;
pub mod config;
pub mod display;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::runtime::Runtime;

use crate::config::Settings;
use crate::models::Document;
use crate::services::ollama::OllamaClient;
use crate::services::{ChunkingStrategy, RagSession};

#[derive(Parser)]
#[command(name = "ragline")]
#[command(about = "Ask questions about a text file, answered by a local Ollama model")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Answer one question from a document
    ///
    /// Examples:
    ///   ragline ask notes.txt "Where is the Eiffel Tower?"
    ///   ragline ask notes.txt "Who wrote it?" --top-k 5 --show-context
    Ask {
        /// Text file to answer from
        file: PathBuf,
        /// Question to ask
        question: String,
        /// Number of chunks handed to the model
        #[arg(short = 'k', long)]
        top_k: Option<usize>,
        /// Print the retrieved chunks with their similarity scores
        #[arg(short = 'c', long)]
        show_context: bool,
    },

    /// Interactive question loop over a document
    ///
    /// Type a question per line. `:load FILE` switches documents,
    /// `:quit` exits.
    Chat {
        /// Text file to start with
        file: PathBuf,
        /// Print the retrieved chunks after every answer
        #[arg(short = 'c', long)]
        show_context: bool,
    },

    /// Preview how a document is split into chunks
    Chunks {
        /// Text file to chunk
        file: PathBuf,
        /// Chunking strategy (line, paragraph); defaults to the configured one
        #[arg(long)]
        chunker: Option<ChunkingStrategy>,
    },

    /// Manage configuration settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Get a configuration value
    Get {
        /// Configuration key to get
        key: String,
    },
    /// Set a configuration value
    Set {
        /// Configuration key to set
        key: String,
        /// Value to set
        value: String,
    },
    /// Remove a configuration value
    Unset {
        /// Configuration key to remove
        key: String,
    },
    /// List all configuration values
    List,
    /// Show the path to the config file
    Path,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        let rt = Runtime::new()?;

        rt.block_on(async {
            match self.command {
                Commands::Ask {
                    file,
                    question,
                    top_k,
                    show_context,
                } => ask::handle_ask_command(file, question, top_k, show_context).await,
                Commands::Chat { file, show_context } => {
                    chat::handle_chat_command(file, show_context).await
                }
                Commands::Chunks { file, chunker } => {
                    chunks::handle_chunks_command(file, chunker).await
                }
                Commands::Config { command } => match command {
                    ConfigCommands::Get { key } => config::handle_config_get(key).await,
                    ConfigCommands::Set { key, value } => {
                        config::handle_config_set(key, value).await
                    }
                    ConfigCommands::Unset { key } => config::handle_config_unset(key).await,
                    ConfigCommands::List => config::handle_config_list().await,
                    ConfigCommands::Path => config::handle_config_path().await,
                },
            }
        })
    }
}

/// True for commands that own the terminal interactively.
pub fn is_interactive(command: &Commands) -> bool {
    matches!(command, Commands::Chat { .. })
}

pub(crate) fn read_document(path: &Path) -> anyhow::Result<Document> {
    Document::from_path(path)
        .with_context(|| format!("Failed to read document: {}", path.display()))
}

pub(crate) fn open_session(settings: &Settings) -> anyhow::Result<RagSession> {
    let client = Arc::new(
        OllamaClient::new(settings.ollama_config()).context("Failed to create Ollama client")?,
    );
    tracing::debug!(
        base_url = %client.config().base_url,
        embedding_model = %settings.embedding_model,
        language_model = %settings.language_model,
        "Opening session"
    );

    let session = RagSession::new(client.clone(), client, settings.session_config())
        .with_assembler(settings.prompt_assembler()?);
    Ok(session)
}
