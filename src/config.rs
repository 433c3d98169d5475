//! Configuration file management for ragline
//!
//! Values live in ~/.ragline/config.toml. Environment variables override
//! the file, and built-in defaults fill whatever neither sets.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::env::{models as env_models, ollama as env_ollama};
use crate::services::{ChunkingStrategy, PromptAssembler, SessionConfig, DEFAULT_TOP_K};

pub const DEFAULT_EMBEDDING_MODEL: &str = "hf.co/CompendiumLabs/bge-base-en-v1.5-gguf";
pub const DEFAULT_LANGUAGE_MODEL: &str = "hf.co/bartowski/Llama-3.2-1B-Instruct-GGUF";

/// A key accepted by `get`, `set` and `unset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigKey {
    pub name: &'static str,
    pub description: &'static str,
}

pub const KEYS: &[ConfigKey] = &[
    ConfigKey {
        name: "embedding-model",
        description: "Ollama model used to embed chunks and questions",
    },
    ConfigKey {
        name: "language-model",
        description: "Ollama model that writes the answer",
    },
    ConfigKey {
        name: "ollama-host",
        description: "Ollama server address (OLLAMA_HOST overrides)",
    },
    ConfigKey {
        name: "ollama-timeout-secs",
        description: "Per-request timeout in seconds",
    },
    ConfigKey {
        name: "ollama-max-retries",
        description: "Attempts per request on transient failures",
    },
    ConfigKey {
        name: "top-k",
        description: "Number of chunks placed in the prompt",
    },
    ConfigKey {
        name: "chunker",
        description: "Chunking strategy: line or paragraph",
    },
    ConfigKey {
        name: "system-template",
        description: "System prompt template, must contain {context}",
    },
];

/// Configuration structure matching config.toml
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub models: ModelsConfig,
    #[serde(default)]
    pub ollama: OllamaSection,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub prompt: PromptConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ModelsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embedding: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct OllamaSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct RetrievalConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunker: Option<ChunkingStrategy>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct PromptConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_template: Option<String>,
}

impl Config {
    /// Get the config directory (~/.ragline)
    pub fn get_config_dir() -> Result<PathBuf> {
        let home_dir = dirs::home_dir().context("Could not find home directory")?;
        Ok(home_dir.join(".ragline"))
    }

    /// Get the config file path (~/.ragline/config.toml)
    pub fn get_config_path() -> Result<PathBuf> {
        Ok(Self::get_config_dir()?.join("config.toml"))
    }

    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    /// Load configuration from `path`; a missing file is the default config
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = fs::Permissions::from_mode(0o600);
            fs::set_permissions(path, permissions).with_context(|| {
                format!("Failed to set permissions on config file: {}", path.display())
            })?;
        }

        Ok(())
    }

    /// Get a config value by key
    pub fn get(&self, key: &str) -> Option<String> {
        match normalize_key(key).as_str() {
            "embedding-model" => self.models.embedding.clone(),
            "language-model" => self.models.language.clone(),
            "ollama-host" => self.ollama.base_url.clone(),
            "ollama-timeout-secs" => self.ollama.timeout_secs.map(|v| v.to_string()),
            "ollama-max-retries" => self.ollama.max_retries.map(|v| v.to_string()),
            "top-k" => self.retrieval.top_k.map(|v| v.to_string()),
            "chunker" => self.retrieval.chunker.map(|v| v.to_string()),
            "system-template" => self.prompt.system_template.clone(),
            _ => None,
        }
    }

    /// Set a config value by key, validating it first
    pub fn set(&mut self, key: &str, value: String) -> Result<()> {
        match normalize_key(key).as_str() {
            "embedding-model" => self.models.embedding = Some(non_empty(key, value)?),
            "language-model" => self.models.language = Some(non_empty(key, value)?),
            "ollama-host" => self.ollama.base_url = Some(non_empty(key, value)?),
            "ollama-timeout-secs" => {
                let secs: u64 = value
                    .trim()
                    .parse()
                    .with_context(|| format!("Invalid value for {key}: {value}"))?;
                if secs == 0 {
                    anyhow::bail!("{key} must be greater than zero");
                }
                self.ollama.timeout_secs = Some(secs);
            }
            "ollama-max-retries" => {
                self.ollama.max_retries = Some(
                    value
                        .trim()
                        .parse()
                        .with_context(|| format!("Invalid value for {key}: {value}"))?,
                );
            }
            "top-k" => {
                self.retrieval.top_k = Some(
                    value
                        .trim()
                        .parse()
                        .with_context(|| format!("Invalid value for {key}: {value}"))?,
                );
            }
            "chunker" => {
                let strategy: ChunkingStrategy =
                    value.trim().parse().map_err(|e: String| anyhow::anyhow!(e))?;
                self.retrieval.chunker = Some(strategy);
            }
            "system-template" => {
                PromptAssembler::with_template(value.as_str())?;
                self.prompt.system_template = Some(value);
            }
            _ => anyhow::bail!("Unknown config key: {}", key),
        }
        Ok(())
    }

    /// Unset (remove) a config value by key
    pub fn unset(&mut self, key: &str) -> Result<()> {
        match normalize_key(key).as_str() {
            "embedding-model" => self.models.embedding = None,
            "language-model" => self.models.language = None,
            "ollama-host" => self.ollama.base_url = None,
            "ollama-timeout-secs" => self.ollama.timeout_secs = None,
            "ollama-max-retries" => self.ollama.max_retries = None,
            "top-k" => self.retrieval.top_k = None,
            "chunker" => self.retrieval.chunker = None,
            "system-template" => self.prompt.system_template = None,
            _ => anyhow::bail!("Unknown config key: {}", key),
        }
        Ok(())
    }

    /// Look up `key`, accepting the same spellings as `get`.
    pub fn key(key: &str) -> Option<&'static ConfigKey> {
        let normalized = normalize_key(key);
        KEYS.iter().find(|k| k.name == normalized)
    }

    /// Every known key with its value, if set, in key order
    pub fn list(&self) -> Vec<(&'static ConfigKey, Option<String>)> {
        KEYS.iter().map(|key| (key, self.get(key.name))).collect()
    }

    /// Resolve the effective settings from this file and the process
    /// environment.
    pub fn resolve(&self) -> Result<Settings> {
        self.resolve_with(|name| std::env::var(name).ok())
    }

    /// Like [`Config::resolve`], reading overrides through `lookup`.
    pub fn resolve_with<F>(&self, lookup: F) -> Result<Settings>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let top_k = match env(env_models::TOP_K) {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("Invalid {}: {raw}", env_models::TOP_K))?,
            None => self.retrieval.top_k.unwrap_or(DEFAULT_TOP_K),
        };

        Ok(Settings {
            embedding_model: env(env_models::EMBEDDING_MODEL)
                .or_else(|| self.models.embedding.clone())
                .unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string()),
            language_model: env(env_models::LANGUAGE_MODEL)
                .or_else(|| self.models.language.clone())
                .unwrap_or_else(|| DEFAULT_LANGUAGE_MODEL.to_string()),
            ollama_host: env(env_ollama::HOST).or_else(|| self.ollama.base_url.clone()),
            ollama_timeout_secs: self.ollama.timeout_secs,
            ollama_max_retries: self.ollama.max_retries,
            top_k,
            chunking: self.retrieval.chunker.unwrap_or_default(),
            system_template: self.prompt.system_template.clone(),
        })
    }
}

/// Effective settings after applying environment overrides and defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub embedding_model: String,
    pub language_model: String,
    /// `None` leaves the Ollama client on its own default.
    pub ollama_host: Option<String>,
    pub ollama_timeout_secs: Option<u64>,
    pub ollama_max_retries: Option<usize>,
    pub top_k: usize,
    pub chunking: ChunkingStrategy,
    pub system_template: Option<String>,
}

impl Settings {
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig::new(self.embedding_model.clone(), self.language_model.clone())
            .with_top_k(self.top_k)
            .with_chunking(self.chunking)
    }

    pub fn prompt_assembler(&self) -> crate::error::Result<PromptAssembler> {
        match &self.system_template {
            Some(template) => PromptAssembler::with_template(template.as_str()),
            None => Ok(PromptAssembler::new()),
        }
    }

    #[cfg(feature = "reqwest")]
    pub fn ollama_config(&self) -> crate::services::ollama::OllamaConfig {
        use crate::services::ollama::OllamaConfig;
        use std::time::Duration;

        let mut config = match &self.ollama_host {
            Some(host) => OllamaConfig::new(host),
            None => OllamaConfig::default(),
        };
        if let Some(secs) = self.ollama_timeout_secs {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        if let Some(retries) = self.ollama_max_retries {
            config = config.with_max_retries(retries);
        }
        config
    }
}

fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase().replace('_', "-")
}

fn non_empty(key: &str, value: String) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        anyhow::bail!("{key} cannot be empty");
    }
    Ok(trimmed.to_string())
}
