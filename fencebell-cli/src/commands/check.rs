//! Check command - evaluate one position against the records and exit.
//!
//! Useful for dry-running a feed file: shows the distance to every fence,
//! whether its time window is open, and which alerts a fresh engine would
//! fire for this position.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{Local, NaiveTime};
use fencebell::alert::{AlertEvaluator, EvaluatorConfig, NullSink};
use fencebell::config::ConfigFile;
use fencebell::geo::{distance_meters, Coordinate};
use fencebell::geofence::GeofenceRecord;
use fencebell::schedule::{is_within_window, AlertWindow};
use fencebell::store::GeofenceStore;

use super::common::{format_distance, load_records, parse_clock_time, resolve_engine_config};
use crate::error::CliError;

/// Arguments for the check command.
pub struct CheckArgs {
    pub records: PathBuf,
    pub lat: f64,
    pub lon: f64,
    pub at: Option<String>,
    pub window: Option<u32>,
}

/// One evaluated record for display.
struct CheckRow {
    name: String,
    distance_meters: f64,
    in_range: bool,
    window_open: bool,
    would_alert: bool,
}

/// Run the check command.
pub fn run(args: CheckArgs) -> Result<(), CliError> {
    let config = ConfigFile::load().unwrap_or_default();
    let records = load_records(&args.records)?;

    let position = Coordinate::new(args.lat, args.lon)
        .map_err(|e| CliError::Config(format!("Invalid position: {}", e)))?;
    let now = match &args.at {
        Some(s) => parse_clock_time(s)?,
        None => Local::now().time(),
    };
    let window_minutes = resolve_engine_config(args.window, false, &config).window_minutes;

    if records.is_empty() {
        println!("No records in {}", args.records.display());
        return Ok(());
    }

    println!(
        "Checking {} at {} (window {} min)",
        position,
        now.format("%H:%M:%S"),
        window_minutes
    );
    println!();

    let rows = build_rows(&records, position, now, window_minutes);
    let name_width = rows.iter().map(|r| r.name.len()).max().unwrap_or(4);

    for row in &rows {
        let range_label = if row.in_range { "in range" } else { "out of range" };
        let window_label = if row.window_open {
            "window open"
        } else {
            "window closed"
        };
        let marker = if row.would_alert { "  WOULD ALERT" } else { "" };

        println!(
            "  {:<name_width$}  {:>9}  {:<12}  {:<13}{}",
            row.name,
            format_distance(row.distance_meters),
            range_label,
            window_label,
            marker
        );
    }

    println!();
    match rows.iter().filter(|r| r.would_alert).count() {
        0 => println!("No alert would fire."),
        1 => println!("1 alert would fire."),
        n => println!("{} alerts would fire.", n),
    }

    Ok(())
}

/// Evaluate every record once, the way a fresh engine would.
fn build_rows(
    records: &[GeofenceRecord],
    position: Coordinate,
    now: NaiveTime,
    window_minutes: u32,
) -> Vec<CheckRow> {
    let store = GeofenceStore::new();
    store.replace_all(records.to_vec());

    let evaluator_config = EvaluatorConfig {
        window: AlertWindow::from_minutes(window_minutes),
        alerts_enabled: true,
    };
    let mut evaluator = AlertEvaluator::new(store, Arc::new(NullSink), evaluator_config);
    let outcome = evaluator.evaluate_at(position, now);

    records
        .iter()
        .map(|record| {
            let distance = distance_meters(position, record.coordinate());
            CheckRow {
                name: record.name().to_string(),
                distance_meters: distance,
                in_range: distance <= record.radius_meters(),
                window_open: is_within_window(record.arrival_time(), now, window_minutes),
                would_alert: outcome
                    .fired
                    .iter()
                    .any(|event| &event.record_id == record.id()),
            }
        })
        .collect()
}
