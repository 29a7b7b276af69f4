//! Configuration file handling for QuadCanvas
//!
//! Configuration is organized into sections:
//! - Index settings (world rectangle, node capacity, depth ceiling)
//! - History settings (undo depth)
//! - Logging settings (level, output format)
//!
//! Files are JSON or TOML, chosen by extension, and are validated on both
//! load and save.

use std::path::{Path, PathBuf};

use quadcanvas_core::constants::{
    DEFAULT_MAX_DEPTH, DEFAULT_MAX_HISTORY_SIZE, DEFAULT_NODE_CAPACITY, DEFAULT_WORLD_EXTENT,
};
use quadcanvas_core::Bounds;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult, SettingsError, SettingsResult};

const CONFIG_DIR_NAME: &str = "quadcanvas";
const CONFIG_FILE_NAME: &str = "config.toml";
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Spatial index settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexSettings {
    /// Left edge of the indexed world
    pub world_min_x: f64,
    /// Top edge of the indexed world
    pub world_min_y: f64,
    /// Right edge of the indexed world
    pub world_max_x: f64,
    /// Bottom edge of the indexed world
    pub world_max_y: f64,
    /// Entries a node holds before it divides
    pub node_capacity: usize,
    /// Depth below which nodes never divide
    pub max_depth: usize,
}

impl IndexSettings {
    /// The world rectangle as [`Bounds`].
    pub fn world_bounds(&self) -> Bounds {
        Bounds {
            min_x: self.world_min_x,
            min_y: self.world_min_y,
            max_x: self.world_max_x,
            max_y: self.world_max_y,
        }
    }
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self {
            world_min_x: -DEFAULT_WORLD_EXTENT,
            world_min_y: -DEFAULT_WORLD_EXTENT,
            world_max_x: DEFAULT_WORLD_EXTENT,
            world_max_y: DEFAULT_WORLD_EXTENT,
            node_capacity: DEFAULT_NODE_CAPACITY,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Undo/redo settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistorySettings {
    /// Commands kept for undo; older ones are evicted
    pub max_history_size: usize,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            max_history_size: DEFAULT_MAX_HISTORY_SIZE,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable multi-line output
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pretty => write!(f, "pretty"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default level when `RUST_LOG` is not set
    pub level: String,
    /// Output format
    pub format: LogFormat,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Complete QuadCanvas configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CanvasConfig {
    /// Spatial index settings
    pub index: IndexSettings,
    /// Undo/redo settings
    pub history: HistorySettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

#[derive(Clone, Copy)]
enum FileFormat {
    Json,
    Toml,
}

impl FileFormat {
    fn of(path: &Path) -> ConfigResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or("none").to_string(),
            )),
        }
    }
}

impl CanvasConfig {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = FileFormat::of(path)?;
        let content = std::fs::read_to_string(path).map_err(|e| {
            SettingsError::LoadError(format!("{}: {}", path.display(), e))
        })?;

        let config: Self = match format {
            FileFormat::Json => serde_json::from_str(&content)?,
            FileFormat::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Save config to file (JSON or TOML), creating parent directories
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match FileFormat::of(path)? {
            FileFormat::Json => serde_json::to_string_pretty(self)?,
            FileFormat::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| SettingsError::ConfigDirectory(format!("{}: {}", parent.display(), e)))?;
        }
        std::fs::write(path, content)
            .map_err(|e| SettingsError::SaveError(format!("{}: {}", path.display(), e)))?;

        tracing::debug!(path = %path.display(), "configuration saved");
        Ok(())
    }

    /// Platform default location, e.g. `~/.config/quadcanvas/config.toml`
    pub fn default_config_path() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
            .ok_or_else(|| {
                SettingsError::ConfigDirectory("no configuration directory on this platform".to_string())
            })
    }

    /// Load `path` if given, otherwise the default file if it exists,
    /// otherwise the built-in defaults.
    pub fn load_or_default(path: Option<&Path>) -> SettingsResult<Self> {
        if let Some(path) = path {
            return Self::load_from_file(path);
        }
        match Self::default_config_path() {
            Ok(default_path) if default_path.exists() => Self::load_from_file(&default_path),
            _ => Ok(Self::default()),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        let index = &self.index;
        let world = index.world_bounds();
        if !world.is_finite() {
            return Err(ConfigError::InvalidSetting {
                key: "index".to_string(),
                reason: "world bounds must be finite".to_string(),
            });
        }
        if index.world_max_x <= index.world_min_x {
            return Err(ConfigError::InvalidSetting {
                key: "index.world_max_x".to_string(),
                reason: "must be greater than world_min_x".to_string(),
            });
        }
        if index.world_max_y <= index.world_min_y {
            return Err(ConfigError::InvalidSetting {
                key: "index.world_max_y".to_string(),
                reason: "must be greater than world_min_y".to_string(),
            });
        }
        if index.node_capacity == 0 {
            return Err(out_of_range("index.node_capacity", index.node_capacity));
        }
        if index.max_depth == 0 {
            return Err(out_of_range("index.max_depth", index.max_depth));
        }

        if self.history.max_history_size == 0 {
            return Err(out_of_range(
                "history.max_history_size",
                self.history.max_history_size,
            ));
        }

        let level = self.logging.level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::InvalidSetting {
                key: "logging.level".to_string(),
                reason: format!("expected one of {}", LOG_LEVELS.join(", ")),
            });
        }

        Ok(())
    }
}

fn out_of_range(key: &str, value: impl ToString) -> ConfigError {
    ConfigError::ValueOutOfRange {
        key: key.to_string(),
        value: value.to_string(),
    }
}
