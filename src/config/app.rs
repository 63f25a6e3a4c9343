//! Application configuration loading from config.toml
//!
//! Every setting has a default, so the bot also runs without a config file. The file
//! location comes from `SMARTKHARCH_CONFIG` and falls back to `./config.toml`.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Default config file location
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Default number of expenses listed by `/expense history`
pub const DEFAULT_HISTORY_LIMIT: usize = 20;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Expense table used to seed an empty database and as the export target
    pub expenses_csv: Option<PathBuf>,
    /// Budget table used to seed an empty database and as the export target
    pub budgets_csv: Option<PathBuf>,
    /// Maximum number of expenses listed by `/expense history`
    pub history_limit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            expenses_csv: None,
            budgets_csv: None,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

/// Loads the application configuration from a TOML file
///
/// # Errors
/// Returns an error if the file cannot be read or the TOML is invalid.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    parse_config(&contents)
}

/// Parses configuration from TOML text.
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    let config: AppConfig = toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })?;

    if config.history_limit == 0 {
        return Err(Error::Config {
            message: "history_limit must be at least 1".to_string(),
        });
    }
    Ok(config)
}

/// Loads the configuration from `SMARTKHARCH_CONFIG` or `./config.toml`.
///
/// A missing file yields the defaults; an unreadable or invalid file is an error.
pub fn load_app_config() -> Result<AppConfig> {
    let path = std::env::var("SMARTKHARCH_CONFIG")
        .map_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);

    if !path.exists() {
        info!(path = %path.display(), "No config file found, using defaults");
        return Ok(AppConfig::default());
    }

    debug!(path = %path.display(), "Loading configuration");
    load_config(&path)
}
