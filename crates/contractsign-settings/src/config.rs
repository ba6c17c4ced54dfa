//! Configuration and settings management for ContractSign
//!
//! Provides configuration file handling and validation. Supports JSON and
//! TOML file formats stored in platform-specific directories.
//!
//! Configuration is organized into logical sections:
//! - Capture surface (size, pen)
//! - Preview rendering width
//! - Placement box (size, default inset)
//! - Submission (storage key prefix, recipients, templates, timeout)
//! - Local storage used by the filesystem adapters

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, ConfigResult, SettingsError, SettingsResult};

/// Application directory name under the platform config/data dirs
const APP_DIR: &str = "contractsign";

/// Signature capture surface settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureSettings {
    /// Surface width in pixels
    pub width: u32,
    /// Surface height in pixels
    pub height: u32,
    /// Pen width in pixels
    pub stroke_width: f32,
    /// Straight-alpha RGBA ink colour
    pub ink_color: [u8; 4],
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            width: 600,
            height: 200,
            stroke_width: 3.0,
            ink_color: [17, 24, 39, 255],
        }
    }
}

/// Preview rendering settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewSettings {
    /// Width page 1 is displayed at, in pixels
    pub render_width: f64,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self { render_width: 600.0 }
    }
}

/// Signature box shown while placing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementSettings {
    /// Box width in preview pixels
    pub box_width: f64,
    /// Box height in preview pixels
    pub box_height: f64,
    /// Inset of the default overlay from the bottom-right corner
    pub margin: f64,
}

impl Default for PlacementSettings {
    fn default() -> Self {
        Self {
            box_width: 150.0,
            box_height: 50.0,
            margin: 24.0,
        }
    }
}

/// Submission settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmissionSettings {
    /// Prefix of the storage key for signed documents
    pub key_prefix: String,
    /// Upper bound for the whole confirm sequence; none by default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
    /// Internal mailbox notified after the signer
    pub internal_recipient: String,
    /// Notification template sent to the signer
    pub signer_template: String,
    /// Notification template sent internally
    pub internal_template: String,
}

impl Default for SubmissionSettings {
    fn default() -> Self {
        Self {
            key_prefix: "contracts/signed".to_string(),
            timeout_ms: None,
            internal_recipient: "contracts@example.com".to_string(),
            signer_template: "contract-signed-signer".to_string(),
            internal_template: "contract-signed-internal".to_string(),
        }
    }
}

/// Local storage for the filesystem adapters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Directory signed documents are written under
    pub root: PathBuf,
    /// Base of the public address handed to recipients
    pub public_base_url: String,
    /// JSON file holding contract records
    pub records_file: PathBuf,
    /// Directory of unsigned `<contract-id>.pdf` documents
    pub documents_dir: PathBuf,
}

impl Default for StorageSettings {
    fn default() -> Self {
        let base = dirs::data_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR);
        Self {
            root: base.join("signed"),
            public_base_url: "http://localhost:8080/files".to_string(),
            records_file: base.join("contracts.json"),
            documents_dir: base.join("documents"),
        }
    }
}

/// Complete application configuration
///
/// Aggregates all settings sections and provides file I/O operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Capture surface
    pub capture: CaptureSettings,
    /// Preview rendering
    pub preview: PreviewSettings,
    /// Placement box
    pub placement: PlacementSettings,
    /// Submission
    pub submission: SubmissionSettings,
    /// Local storage
    pub storage: StorageSettings,
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SettingsError::read(path, e))?;

        let config: Self = match Format::of(path)? {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load config from file, or defaults when the file does not exist
    pub fn load_or_default(path: &Path) -> SettingsResult<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            tracing::info!("No configuration at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match Format::of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)
            .map_err(|e| SettingsError::write(path, e))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        // Capture surface
        if self.capture.width == 0 || self.capture.height == 0 {
            return Err(SettingsError::invalid(
                "capture",
                "surface dimensions must be > 0",
            ));
        }
        if !(self.capture.stroke_width.is_finite() && self.capture.stroke_width > 0.0) {
            return Err(SettingsError::invalid("capture.stroke_width", "must be > 0"));
        }

        // Preview
        if !positive(self.preview.render_width) {
            return Err(SettingsError::invalid("preview.render_width", "must be > 0"));
        }

        // Placement box
        if !positive(self.placement.box_width) || !positive(self.placement.box_height) {
            return Err(SettingsError::invalid(
                "placement",
                "box dimensions must be > 0",
            ));
        }
        if !(self.placement.margin.is_finite() && self.placement.margin >= 0.0) {
            return Err(SettingsError::invalid("placement.margin", "must be >= 0"));
        }

        // Submission
        if self.submission.timeout_ms == Some(0) {
            return Err(SettingsError::invalid(
                "submission.timeout_ms",
                "must be > 0 when set",
            ));
        }
        if !self.submission.internal_recipient.contains('@') {
            return Err(SettingsError::invalid(
                "submission.internal_recipient",
                "must be an email address",
            ));
        }
        if self.submission.signer_template.trim().is_empty()
            || self.submission.internal_template.trim().is_empty()
        {
            return Err(SettingsError::invalid(
                "submission",
                "notification templates must not be empty",
            ));
        }

        // Storage
        if self.storage.public_base_url.trim().is_empty() {
            return Err(SettingsError::invalid(
                "storage.public_base_url",
                "must not be empty",
            ));
        }

        Ok(())
    }
}

/// Default location of the configuration file
///
/// `<config dir>/contractsign/config.toml`, falling back to the home directory.
pub fn default_config_path() -> ConfigResult<PathBuf> {
    dirs::config_dir()
        .or_else(dirs::home_dir)
        .map(|dir| dir.join(APP_DIR).join("config.toml"))
        .ok_or_else(|| {
            ConfigError::NoConfigDirectory("no configuration or home directory".to_string())
        })
}

fn positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

enum Format {
    Json,
    Toml,
}

impl Format {
    fn of(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Format::Json),
            Some("toml") => Ok(Format::Toml),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}
