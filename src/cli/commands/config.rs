//! Configuration display command.

use std::path::PathBuf;

use super::exit_with_error;
use crate::config::{self, Config, ConfigError, PublicConfig};
use crate::error::{Error, Result};

/// Print the public configuration; optionally persist the effective settings
pub fn cmd_config(config: &Config, save: bool) -> anyhow::Result<()> {
    let public = PublicConfig::from(&config.server);
    println!("{}", serde_json::to_string_pretty(&public)?);

    if save {
        match save_config(config, config::config_path()) {
            Ok(path) => eprintln!("Saved to {}", path.display()),
            Err(e) => exit_with_error(&e),
        }
    }
    Ok(())
}

/// Write `config` to `path` (the standard location when called from the CLI)
fn save_config(config: &Config, path: Option<PathBuf>) -> Result<PathBuf> {
    let path = path.ok_or(Error::Config(ConfigError::NoConfigDir))?;
    config::save_to(config, &path)?;
    Ok(path)
}
