//! ContractSign Settings Crate
//!
//! Handles application configuration: capture surface, preview, placement
//! box, submission and local storage settings.

pub mod config;
pub mod error;

pub use config::{
    default_config_path, CaptureSettings, Config, PlacementSettings, PreviewSettings,
    StorageSettings, SubmissionSettings,
};
pub use error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
