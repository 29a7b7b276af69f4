//! QuadCanvas Settings Crate
//!
//! Loads, validates and saves the canvas configuration.

pub mod config;
pub mod error;

pub use config::{CanvasConfig, HistorySettings, IndexSettings, LogFormat, LoggingSettings};
pub use error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
