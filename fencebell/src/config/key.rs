//! Typed configuration keys for `config get` / `config set`.

use std::str::FromStr;

use super::file::{parse_enabled, parse_window_minutes, ConfigError, ConfigFile};

/// A settable configuration key, addressed as `section.key`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    /// `alerts.window_minutes`
    AlertsWindowMinutes,
    /// `alerts.enabled`
    AlertsEnabled,
}

impl ConfigKey {
    /// All known keys, grouped by section.
    pub fn all() -> &'static [ConfigKey] {
        &[ConfigKey::AlertsWindowMinutes, ConfigKey::AlertsEnabled]
    }

    /// Full dotted name.
    pub fn name(&self) -> &'static str {
        match self {
            ConfigKey::AlertsWindowMinutes => "alerts.window_minutes",
            ConfigKey::AlertsEnabled => "alerts.enabled",
        }
    }

    /// INI section this key lives in.
    pub fn section(&self) -> &'static str {
        match self {
            ConfigKey::AlertsWindowMinutes | ConfigKey::AlertsEnabled => "alerts",
        }
    }

    /// Key name within its section.
    pub fn key_name(&self) -> &'static str {
        match self {
            ConfigKey::AlertsWindowMinutes => "window_minutes",
            ConfigKey::AlertsEnabled => "enabled",
        }
    }

    /// Current value as a display string.
    pub fn get(&self, config: &ConfigFile) -> String {
        match self {
            ConfigKey::AlertsWindowMinutes => config.alerts.window_minutes.to_string(),
            ConfigKey::AlertsEnabled => config.alerts.enabled.to_string(),
        }
    }

    /// Parse and apply a new value.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigError> {
        match self {
            ConfigKey::AlertsWindowMinutes => {
                config.alerts.window_minutes = parse_window_minutes(value)?;
            }
            ConfigKey::AlertsEnabled => {
                config.alerts.enabled = parse_enabled(value)?;
            }
        }
        Ok(())
    }
}

impl FromStr for ConfigKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "alerts.window_minutes" => Ok(ConfigKey::AlertsWindowMinutes),
            "alerts.enabled" => Ok(ConfigKey::AlertsEnabled),
            other => Err(ConfigError::UnknownKey(other.to_string())),
        }
    }
}
