//! Runtime configuration loaded from TOML.
//!
//! # Responsibility
//! - Resolve data, log and summary settings with sensible defaults.
//!
//! # Invariants
//! - A missing config file is not an error; defaults apply.
//! - Every field is optional in the file.

use crate::logging::default_log_level;
use crate::summary::SummarySettings;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

const APP_DIR_NAME: &str = "labnote";
const CONFIG_FILE_NAME: &str = "config.toml";
const DATA_FILE_NAME: &str = "labnote.sqlite3";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config `{path}`: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabConfig {
    /// SQLite file holding the key-value store.
    pub data_path: PathBuf,
    /// Absolute directory for rolling log files.
    pub log_dir: PathBuf,
    /// One of `trace|debug|info|warn|error`.
    pub log_level: String,
    pub summary: SummaryConfig,
}

/// Chat-completion endpoint settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    pub endpoint: String,
    pub model: String,
    pub max_input_chars: usize,
    pub min_input_chars: usize,
    pub timeout_secs: u64,
}

impl Default for LabConfig {
    fn default() -> Self {
        let data_dir = default_data_dir();
        Self {
            data_path: data_dir.join(DATA_FILE_NAME),
            log_dir: data_dir.join("logs"),
            log_level: default_log_level().to_string(),
            summary: SummaryConfig::default(),
        }
    }
}

impl Default for SummaryConfig {
    fn default() -> Self {
        let settings = SummarySettings::default();
        Self {
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            model: settings.model,
            max_input_chars: settings.max_input_chars,
            min_input_chars: settings.min_input_chars,
            timeout_secs: 60,
        }
    }
}

impl SummaryConfig {
    pub fn settings(&self) -> SummarySettings {
        SummarySettings {
            model: self.model.clone(),
            max_input_chars: self.max_input_chars,
            min_input_chars: self.min_input_chars,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl LabConfig {
    /// Loads configuration from `path`, falling back to defaults when the
    /// file does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(raw) => toml::from_str(&raw).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Loads from the default location, or defaults when it is unknown.
    pub fn load_default() -> Result<Self, ConfigError> {
        match default_config_path() {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }
}

/// Returns `<config_dir>/labnote/config.toml` when a config dir exists.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR_NAME)
}
