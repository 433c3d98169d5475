use anyhow::{Context, Result};
use std::env;
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer, Registry,
};

use crate::env::logging as env_vars;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Logging configuration for ragline
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: Level,
    /// Whether to log to the terminal (stderr; stdout carries answers)
    pub console: bool,
    /// Optional file path for logging
    pub file_path: Option<PathBuf>,
    /// Whether to use JSON format
    pub json_format: bool,
    /// Whether to use ANSI colors
    pub use_colors: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::WARN,
            console: true,
            file_path: None,
            json_format: false,
            use_colors: true,
        }
    }
}

impl LoggingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Enable/disable terminal logging
    pub fn with_console(mut self, enabled: bool) -> Self {
        self.console = enabled;
        self
    }

    pub fn with_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.file_path = Some(path.into());
        self
    }

    pub fn with_json_format(mut self, enabled: bool) -> Self {
        self.json_format = enabled;
        self
    }

    pub fn with_colors(mut self, enabled: bool) -> Self {
        self.use_colors = enabled;
        self
    }

    /// Create config from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(level_str) = env::var(env_vars::LOG_LEVEL) {
            config.level = parse_level(&level_str).unwrap_or(Level::WARN);
        }

        if let Ok(file_path) = env::var(env_vars::LOG_FILE) {
            if !file_path.trim().is_empty() {
                config.file_path = Some(PathBuf::from(file_path));
            }
        }

        if env::var(env_vars::NO_COLOR).is_ok() {
            config.use_colors = false;
        }

        config
    }
}

fn parse_level(value: &str) -> Option<Level> {
    match value.trim().to_lowercase().as_str() {
        "error" => Some(Level::ERROR),
        "warn" | "warning" => Some(Level::WARN),
        "info" => Some(Level::INFO),
        "debug" => Some(Level::DEBUG),
        "trace" => Some(Level::TRACE),
        _ => None,
    }
}

/// Initialize logging with the given configuration.
///
/// The returned guard flushes the file writer on drop; hold it for the life
/// of the process.
pub fn init_logging(config: LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = LevelFilter::from_level(config.level);
    let mut layers: Vec<BoxedLayer> = Vec::new();
    let mut guard = None;

    if config.console {
        let layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(config.use_colors)
            .with_target(true);
        layers.push(if config.json_format {
            layer.json().with_filter(filter).boxed()
        } else {
            layer.with_filter(filter).boxed()
        });
    }

    if let Some(path) = &config.file_path {
        let directory = path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let file_name = path
            .file_name()
            .with_context(|| format!("Log file path has no file name: {}", path.display()))?;
        std::fs::create_dir_all(directory)
            .with_context(|| format!("Failed to create log directory: {}", directory.display()))?;

        let (writer, worker) =
            tracing_appender::non_blocking(tracing_appender::rolling::never(directory, file_name));
        guard = Some(worker);

        let layer = fmt::layer().with_writer(writer).with_ansi(false);
        layers.push(if config.json_format {
            layer.json().with_filter(filter).boxed()
        } else {
            layer.with_filter(filter).boxed()
        });
    }

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    tracing::debug!(
        level = ?config.level,
        console = config.console,
        file_path = ?config.file_path,
        json_format = config.json_format,
        "Logging initialized"
    );

    Ok(guard)
}

/// Log error with context and category
pub fn log_error<E: std::fmt::Display>(error: &E, context: &str, category: &str) {
    tracing::error!(
        error = %error,
        context = context,
        category = category,
        "Error occurred"
    );
}
