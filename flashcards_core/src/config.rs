//! Configuration file support for the flashcards trainer.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/flashcards/config.toml`.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub log: LogConfig,

    #[serde(default)]
    pub cards: CardsConfig,
}

/// Log file configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_path")]
    pub path: PathBuf,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            path: default_log_path(),
        }
    }
}

/// Startup import / exit export configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct CardsConfig {
    /// Imported once before the first command
    #[serde(default)]
    pub import_from: Option<PathBuf>,

    /// Exported to when the session exits
    #[serde(default)]
    pub export_to: Option<PathBuf>,
}

fn default_log_path() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("flashcards").join("flashcard.log")
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        match Self::default_config_path() {
            Some(config_path) if config_path.exists() => Self::load_from(&config_path),
            _ => {
                tracing::debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|base| base.join("flashcards").join("config.toml"))
    }

    fn validate(&self) -> Result<()> {
        if self.log.path.as_os_str().is_empty() {
            return Err(Error::Config("log.path must not be empty".into()));
        }
        Ok(())
    }
}
