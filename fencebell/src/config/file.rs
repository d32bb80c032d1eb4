//! INI-backed configuration file.

use std::fs;
use std::path::{Path, PathBuf};

use ini::Ini;
use thiserror::Error;

use crate::engine::EngineConfig;
use crate::schedule::DEFAULT_WINDOW_MINUTES;

const ALERTS_SECTION: &str = "alerts";
const WINDOW_MINUTES_KEY: &str = "window_minutes";
const ENABLED_KEY: &str = "enabled";

/// Errors from loading or saving the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed configuration file: {0}")]
    Malformed(String),

    #[error("invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("unknown configuration key: {0}")]
    UnknownKey(String),
}

/// Settings in the `[alerts]` section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlertsConfig {
    /// Minutes around each record's arrival time that qualify.
    pub window_minutes: u32,

    /// Whether alerts are delivered at all.
    pub enabled: bool,
}

impl Default for AlertsConfig {
    fn default() -> Self {
        Self {
            window_minutes: DEFAULT_WINDOW_MINUTES,
            enabled: true,
        }
    }
}

/// The configuration file contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConfigFile {
    pub alerts: AlertsConfig,
}

impl ConfigFile {
    /// Load from the default location.
    ///
    /// A missing file yields defaults; an unreadable or invalid file is
    /// an error.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_file_path())
    }

    /// Load from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path).map_err(|error| match error {
            ini::Error::Io(io) => ConfigError::Io(io),
            ini::Error::Parse(parse) => ConfigError::Malformed(parse.to_string()),
        })?;

        let mut config = Self::default();
        if let Some(properties) = ini.section(Some(ALERTS_SECTION)) {
            if let Some(raw) = properties.get(WINDOW_MINUTES_KEY) {
                config.alerts.window_minutes = parse_window_minutes(raw)?;
            }
            if let Some(raw) = properties.get(ENABLED_KEY) {
                config.alerts.enabled = parse_enabled(raw)?;
            }
        }

        Ok(config)
    }

    /// Save to the default location, creating parent directories.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&config_file_path())
    }

    /// Save to an explicit path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut ini = Ini::new();
        ini.with_section(Some(ALERTS_SECTION))
            .set(WINDOW_MINUTES_KEY, self.alerts.window_minutes.to_string())
            .set(ENABLED_KEY, self.alerts.enabled.to_string());
        ini.write_to_file(path)?;

        Ok(())
    }

    /// Engine settings derived from this file.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig::default()
            .with_window_minutes(self.alerts.window_minutes)
            .with_alerts_enabled(self.alerts.enabled)
    }
}

/// Path of the configuration file (`~/.config/fencebell/config.ini`).
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("fencebell")
        .join("config.ini")
}

pub(crate) fn parse_window_minutes(raw: &str) -> Result<u32, ConfigError> {
    raw.trim()
        .parse::<u32>()
        .map_err(|_| ConfigError::InvalidValue {
            key: format!("{}.{}", ALERTS_SECTION, WINDOW_MINUTES_KEY),
            value: raw.to_string(),
            reason: "expected a non-negative whole number of minutes".to_string(),
        })
}

pub(crate) fn parse_enabled(raw: &str) -> Result<bool, ConfigError> {
    match raw.trim() {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(ConfigError::InvalidValue {
            key: format!("{}.{}", ALERTS_SECTION, ENABLED_KEY),
            value: other.to_string(),
            reason: "expected 'true' or 'false'".to_string(),
        }),
    }
}
