//! CLI error types.

use std::fmt;

use fencebell::config::ConfigError;
use fencebell::geofence::GeofenceError;

/// Errors that can occur while running a CLI command.
#[derive(Debug)]
pub enum CliError {
    /// Configuration error.
    Config(String),

    /// The records feed could not be parsed.
    Records(GeofenceError),

    /// File or stream access failed.
    Io(std::io::Error),

    /// The async runtime could not be created or the engine stopped
    /// unexpectedly.
    Runtime(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(msg) => {
                write!(f, "Configuration error: {}", msg)
            }
            CliError::Records(e) => {
                write!(f, "Invalid records feed: {}", e)
            }
            CliError::Io(e) => {
                write!(f, "I/O error: {}", e)
            }
            CliError::Runtime(msg) => {
                write!(f, "Runtime error: {}", msg)
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(_) => None,
            CliError::Records(e) => Some(e),
            CliError::Io(e) => Some(e),
            CliError::Runtime(_) => None,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<GeofenceError> for CliError {
    fn from(e: GeofenceError) -> Self {
        CliError::Records(e)
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e)
    }
}
