//! Run command - watch a position stream and ring arrival alerts.
//!
//! Positions come from stdin by default, one `lat,lon` pair per line, or
//! from a replay file with a fixed delay between samples. Every sample is
//! evaluated against the current wall clock.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Local;
use fencebell::alert::{AlertEvent, AlertSink, SinkError};
use fencebell::config::ConfigFile;
use fencebell::engine::{AlertEngine, EngineCommand};
use fencebell::geo::Coordinate;
use fencebell::position::PositionUpdate;
use tokio::runtime::Runtime;
use tokio::sync::mpsc;
use tracing::warn;

use super::common::{format_distance, load_records, resolve_engine_config};
use crate::error::CliError;

/// Arguments for the run command.
pub struct RunArgs {
    pub records: PathBuf,
    pub replay: Option<PathBuf>,
    pub window: Option<u32>,
    pub quiet_alerts: bool,
    pub interval_ms: u64,
    pub log_file: Option<PathBuf>,
}

/// Sink that rings the terminal bell and prints the alert.
struct TerminalBellSink;

impl AlertSink for TerminalBellSink {
    fn fire(&self, event: &AlertEvent) -> Result<(), SinkError> {
        println!(
            "\x07[{}] Arrived: {} ({} away)",
            Local::now().format("%H:%M:%S"),
            event.record_name,
            format_distance(event.distance_meters),
        );
        Ok(())
    }
}

/// Run the run command.
pub fn run(args: RunArgs) -> Result<(), CliError> {
    let _log_guard = match &args.log_file {
        Some(path) => fencebell::logging::init_with_file(path)?,
        None => fencebell::logging::init(),
    };

    let config = ConfigFile::load().unwrap_or_default();
    let records = load_records(&args.records)?;
    let engine_config = resolve_engine_config(args.window, args.quiet_alerts, &config);

    // Print banner
    println!("Fencebell v{}", fencebell::VERSION);
    println!("================");
    println!();
    println!(
        "Records:  {} ({} loaded)",
        args.records.display(),
        records.len()
    );
    println!(
        "Window:   {} min around each arrival time",
        engine_config.window_minutes
    );
    if engine_config.alerts_enabled {
        println!("Alerts:   enabled");
    } else {
        println!("Alerts:   quiet (transitions tracked, nothing rings)");
    }
    match &args.replay {
        Some(path) => println!(
            "Source:   replay from {} every {} ms",
            path.display(),
            args.interval_ms
        ),
        None => println!("Source:   stdin, one \"lat,lon\" per line"),
    }
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    let runtime = Runtime::new().map_err(|e| CliError::Runtime(e.to_string()))?;

    let engine = AlertEngine::new(Arc::new(TerminalBellSink), engine_config);
    let telemetry = engine.telemetry();

    let (position_tx, position_rx) = mpsc::unbounded_channel();
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let handle = engine.start(runtime.handle(), position_rx, command_rx);

    command_tx
        .send(EngineCommand::ReplaceRecords(records))
        .map_err(|_| CliError::Runtime("Engine stopped before accepting records".to_string()))?;

    // Set up signal handler for graceful shutdown
    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_clone = shutdown.clone();

    ctrlc::set_handler(move || {
        println!();
        println!("Received shutdown signal, stopping...");
        shutdown_clone.store(true, Ordering::SeqCst);
    })
    .map_err(|e| CliError::Config(format!("Failed to set signal handler: {}", e)))?;

    let sent = match &args.replay {
        Some(path) => feed_replay(path, args.interval_ms, &position_tx, &shutdown)?,
        None => feed_stdin(&position_tx, &shutdown)?,
    };

    // Let queued samples drain before stopping
    let deadline = Instant::now() + Duration::from_secs(2);
    while telemetry.snapshot().positions_received < sent && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(10));
    }

    handle.shutdown();
    runtime.block_on(handle.join());

    // Print final session summary
    let snapshot = telemetry.snapshot();
    if snapshot.positions_received > 0 {
        println!();
        println!("Session Summary");
        println!("───────────────");
        println!("  Positions processed: {}", snapshot.positions_received);
        println!("  Alerts fired:        {}", snapshot.alerts_fired);
        if snapshot.sink_failures > 0 {
            println!("  Delivery failures:   {}", snapshot.sink_failures);
        }
        println!("  Record replacements: {}", snapshot.record_replacements);
    }

    println!();
    println!("Stopped.");
    Ok(())
}

/// Feed positions from a replay file, pausing between samples.
///
/// Returns how many samples were sent.
fn feed_replay(
    path: &Path,
    interval_ms: u64,
    position_tx: &mpsc::UnboundedSender<PositionUpdate>,
    shutdown: &AtomicBool,
) -> Result<u64, CliError> {
    let content = std::fs::read_to_string(path)?;
    let interval = Duration::from_millis(interval_ms);
    let mut sent = 0u64;

    for line in content.lines() {
        if shutdown.load(Ordering::SeqCst) {
            break;
        }

        match parse_position_line(line) {
            Ok(Some(coordinate)) => {
                if position_tx
                    .send(PositionUpdate::new(coordinate))
                    .is_err()
                {
                    break;
                }
                sent += 1;
                std::thread::sleep(interval);
            }
            Ok(None) => {}
            Err(reason) => {
                warn!(line = %line, reason = %reason, "Skipping unparseable position line");
            }
        }
    }

    Ok(sent)
}

/// Feed positions from stdin until EOF or shutdown.
///
/// Returns how many samples were sent.
fn feed_stdin(
    position_tx: &mpsc::UnboundedSender<PositionUpdate>,
    shutdown: &AtomicBool,
) -> Result<u64, CliError> {
    use std::io::BufRead;

    let stdin = std::io::stdin();
    let mut sent = 0u64;

    for line in stdin.lock().lines() {
        if shutdown.load(Ordering::SeqCst) {
            break;
        }

        let line = line?;
        match parse_position_line(&line) {
            Ok(Some(coordinate)) => {
                if position_tx
                    .send(PositionUpdate::new(coordinate))
                    .is_err()
                {
                    break;
                }
                sent += 1;
            }
            Ok(None) => {}
            Err(reason) => {
                warn!(line = %line, reason = %reason, "Skipping unparseable position line");
            }
        }
    }

    Ok(sent)
}

/// Parse one `lat,lon` line.
///
/// Blank lines and `#` comments yield `Ok(None)`.
fn parse_position_line(line: &str) -> Result<Option<Coordinate>, String> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let (lat_str, lon_str) = trimmed
        .split_once(',')
        .ok_or_else(|| "expected \"lat,lon\"".to_string())?;

    let lat: f64 = lat_str
        .trim()
        .parse()
        .map_err(|_| format!("bad latitude '{}'", lat_str.trim()))?;
    let lon: f64 = lon_str
        .trim()
        .parse()
        .map_err(|_| format!("bad longitude '{}'", lon_str.trim()))?;

    let coordinate = Coordinate::new(lat, lon).map_err(|e| e.to_string())?;
    Ok(Some(coordinate))
}
