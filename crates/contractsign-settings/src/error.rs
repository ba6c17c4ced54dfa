//! Settings errors.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failure loading, saving or validating a configuration
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Cannot read {}: {reason}", path.display())]
    Read { path: PathBuf, reason: String },

    #[error("Cannot write {}: {reason}", path.display())]
    Write { path: PathBuf, reason: String },

    /// A value is out of range
    #[error("Invalid setting '{key}': {reason}")]
    InvalidSetting { key: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Malformed JSON configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed TOML configuration: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Cannot encode TOML configuration: {0}")]
    TomlWrite(#[from] toml::ser::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl SettingsError {
    pub(crate) fn invalid(key: &str, reason: impl Into<String>) -> Self {
        SettingsError::InvalidSetting {
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn read(path: &Path, err: io::Error) -> Self {
        SettingsError::Read {
            path: path.to_path_buf(),
            reason: err.to_string(),
        }
    }

    pub(crate) fn write(path: &Path, err: io::Error) -> Self {
        SettingsError::Write {
            path: path.to_path_buf(),
            reason: err.to_string(),
        }
    }
}

/// Problems locating or recognising a configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Extension other than `.json` or `.toml`
    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),

    #[error("No configuration directory: {0}")]
    NoConfigDirectory(String),
}

pub type SettingsResult<T> = Result<T, SettingsError>;

pub type ConfigResult<T> = Result<T, ConfigError>;
