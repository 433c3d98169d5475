use clap::Parser;
use ragline::cli::{is_interactive, Cli};
use ragline::config::Config;
use ragline::logging::{init_logging, LoggingConfig};

fn main() -> anyhow::Result<()> {
    // Load .env file if it exists (ignore errors if missing)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut logging_config = LoggingConfig::from_env();
    if is_interactive(&cli.command) && logging_config.file_path.is_none() {
        // Keep the chat prompt free of log lines; log to ~/.ragline/logs instead
        let log_dir = Config::get_config_dir()?.join("logs");
        logging_config = logging_config.with_console(false).with_file(log_dir.join(format!(
            "ragline-{}.log",
            chrono::Local::now().format("%Y%m%d")
        )));
    }
    let _log_guard = init_logging(logging_config)?;

    cli.run()
}
