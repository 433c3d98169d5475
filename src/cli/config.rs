use anyhow::Result;
use console::style;

use crate::config::{Config, ConfigKey, KEYS};

fn known_key(key: &str) -> Result<&'static ConfigKey> {
    Config::key(key).ok_or_else(|| {
        anyhow::anyhow!("Unknown config key: {key}. Run `ragline config list` to see the keys")
    })
}

/// Handle config get command
pub async fn handle_config_get(key: String) -> Result<()> {
    let entry = known_key(&key)?;
    let config = Config::load()?;

    match config.get(entry.name) {
        Some(value) => {
            println!("{value}");
            Ok(())
        }
        None => anyhow::bail!(
            "Config key '{}' not set ({})",
            entry.name,
            entry.description
        ),
    }
}

/// Handle config set command
pub async fn handle_config_set(key: String, value: String) -> Result<()> {
    let entry = known_key(&key)?;
    let mut config = Config::load()?;

    config.set(entry.name, value)?;
    config.save()?;

    println!(
        "{} {} set: {}",
        style("✓").green(),
        style(entry.name).cyan(),
        entry.description
    );
    println!(
        "  Saved to: {}",
        style(Config::get_config_path()?.display()).dim()
    );

    Ok(())
}

/// Handle config unset command
pub async fn handle_config_unset(key: String) -> Result<()> {
    let entry = known_key(&key)?;
    let mut config = Config::load()?;

    config.unset(entry.name)?;
    config.save()?;

    println!(
        "{} {} removed, the default applies again",
        style("✓").green(),
        style(entry.name).cyan()
    );

    Ok(())
}

/// Handle config list command
///
/// Every key is shown; unset ones fall back to the environment or the
/// built-in default.
pub async fn handle_config_list() -> Result<()> {
    let config = Config::load()?;
    let width = KEYS.iter().map(|k| k.name.len()).max().unwrap_or(0);

    println!("{}", style("Configuration:").bold());
    println!();
    for (key, value) in config.list() {
        let value = match value {
            Some(value) => style(value.escape_debug().to_string()).green(),
            None => style("(unset)".to_string()).dim(),
        };
        println!("  {}  {}", style(format!("{:width$}", key.name)).cyan(), value);
        println!("  {:width$}  {}", "", style(key.description).dim());
    }

    println!();
    println!(
        "  Config file: {}",
        style(Config::get_config_path()?.display()).dim()
    );

    Ok(())
}

/// Handle config path command
pub async fn handle_config_path() -> Result<()> {
    println!("{}", Config::get_config_path()?.display());
    Ok(())
}
