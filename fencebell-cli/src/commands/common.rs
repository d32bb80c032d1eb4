//! Common utilities shared across CLI commands.

use std::fs;
use std::path::Path;

use chrono::NaiveTime;
use fencebell::config::ConfigFile;
use fencebell::engine::EngineConfig;
use fencebell::geofence::{parse_arrival_time, parse_records, GeofenceRecord};

use crate::error::CliError;

/// Load and parse a geofence records feed file.
pub fn load_records(path: &Path) -> Result<Vec<GeofenceRecord>, CliError> {
    let json = fs::read_to_string(path).map_err(|e| {
        CliError::Config(format!("Could not read records file {}: {}", path.display(), e))
    })?;
    let records = parse_records(&json)?;
    Ok(records)
}

/// Resolve engine settings from CLI args and config.
///
/// CLI takes precedence, then config. `--quiet-alerts` always wins over
/// the config's enabled flag.
pub fn resolve_engine_config(
    cli_window: Option<u32>,
    quiet_alerts: bool,
    config: &ConfigFile,
) -> EngineConfig {
    let window_minutes = cli_window.unwrap_or(config.alerts.window_minutes);
    let alerts_enabled = config.alerts.enabled && !quiet_alerts;

    EngineConfig::default()
        .with_window_minutes(window_minutes)
        .with_alerts_enabled(alerts_enabled)
}

/// Parse a wall-clock time argument (`HH:MM:SS` or `HH:MM`).
pub fn parse_clock_time(s: &str) -> Result<NaiveTime, CliError> {
    parse_arrival_time(s)
        .map_err(|_| CliError::Config(format!("Invalid time '{}', expected HH:MM:SS or HH:MM", s)))
}

/// Format a distance for display, switching to kilometers past 1 km.
pub fn format_distance(meters: f64) -> String {
    if meters < 1000.0 {
        format!("{:.0} m", meters)
    } else {
        format!("{:.1} km", meters / 1000.0)
    }
}
