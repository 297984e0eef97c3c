//! Configuration file loading for the bot.
//!
//! Settings come from an optional TOML file with a `[search]` and a `[match]`
//! table. Every field has a default, so a missing file or a partial one is
//! fine.

use serde::{Deserialize, Serialize};
use solo_engine::{MatchConfig, SearchConfig};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur when loading the configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to parse the configuration file as valid TOML.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Settings for the search and the match.
#[derive(Debug, Deserialize, Serialize, Default, Clone, Copy, PartialEq)]
pub struct BotConfig {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default, rename = "match")]
    pub match_config: MatchConfig,
}

impl BotConfig {
    /// Default config file, `solo.toml` in the working directory.
    pub fn default_path() -> PathBuf {
        PathBuf::from("solo.toml")
    }

    /// Loads the file at `path`, or the defaults if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if the file exists but cannot be read,
    /// or [`ConfigError::Parse`] if it is not valid TOML.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}
