//! Integration tests for the alert engine.
//!
//! These tests verify the complete alerting flow including:
//! - Position sample → engine → evaluator → sink
//! - Record set replacement mid-stream
//! - Settings updates on a running engine
//! - Cooperative shutdown
//!
//! Run with: `cargo test --test alert_engine_integration`

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{Duration as ChronoDuration, Local, NaiveTime, Timelike};
use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::mpsc;

use fencebell::alert::{AlertEvent, AlertSink, SinkError};
use fencebell::engine::{AlertEngine, EngineCommand, EngineConfig, EngineHandle};
use fencebell::geo::Coordinate;
use fencebell::geofence::{parse_records, GeofenceId, GeofenceRecord};
use fencebell::position::PositionUpdate;
use fencebell::telemetry::EngineTelemetry;

// ============================================================================
// Helper Functions
// ============================================================================

/// Sink that records every delivered event.
#[derive(Default)]
struct RecordingSink {
    events: Mutex<Vec<AlertEvent>>,
}

impl RecordingSink {
    fn events(&self) -> Vec<AlertEvent> {
        self.events.lock().clone()
    }
}

impl AlertSink for RecordingSink {
    fn fire(&self, event: &AlertEvent) -> Result<(), SinkError> {
        self.events.lock().push(event.clone());
        Ok(())
    }
}

/// Sink that records the attempt but always reports delivery failure.
#[derive(Default)]
struct FailingSink {
    attempts: Mutex<Vec<GeofenceId>>,
}

impl FailingSink {
    fn attempts(&self) -> Vec<GeofenceId> {
        self.attempts.lock().clone()
    }
}

impl AlertSink for FailingSink {
    fn fire(&self, event: &AlertEvent) -> Result<(), SinkError> {
        self.attempts.lock().push(event.record_id.clone());
        Err(SinkError::new("notification service unavailable"))
    }
}

/// Marienplatz, Munich.
const OFFICE: (f64, f64) = (48.13743, 11.57549);
/// About 30 m north of the office, well inside a 100 m radius.
const OFFICE_INSIDE: (f64, f64) = (48.13770, 11.57549);
/// About 500 m north, outside a 100 m radius.
const OFFICE_NEAR: (f64, f64) = (48.14190, 11.57549);
/// Hamburg city hall, several hundred kilometers away.
const FAR_AWAY: (f64, f64) = (53.55034, 9.99215);

fn coordinate(point: (f64, f64)) -> Coordinate {
    Coordinate::new(point.0, point.1).expect("test coordinate should be valid")
}

fn make_record(id: &str, name: &str, center: (f64, f64), arrival: NaiveTime) -> GeofenceRecord {
    GeofenceRecord::new(GeofenceId::from(id), name, coordinate(center), 100.0, arrival)
        .expect("test record should be valid")
}

/// Arrival time matching the current wall clock, so the default window
/// qualifies for the duration of the test.
fn arrival_now() -> NaiveTime {
    let now = Local::now().time();
    NaiveTime::from_hms_opt(now.hour(), now.minute(), now.second())
        .expect("current time should be constructible")
}

/// Arrival time two hours away from the current wall clock, outside any
/// reasonable window. Wrapping past midnight still lands hours away.
fn arrival_far_from_now() -> NaiveTime {
    arrival_now() + ChronoDuration::hours(2)
}

/// Start an engine and hand back everything a test interacts with.
fn start_engine(
    sink: Arc<dyn AlertSink>,
    config: EngineConfig,
) -> (
    EngineHandle,
    mpsc::UnboundedSender<PositionUpdate>,
    mpsc::UnboundedSender<EngineCommand>,
    Arc<EngineTelemetry>,
) {
    let engine = AlertEngine::new(sink, config);
    let telemetry = engine.telemetry();

    let (position_tx, position_rx) = mpsc::unbounded_channel();
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let handle = engine.start(&Handle::current(), position_rx, command_rx);

    (handle, position_tx, command_tx, telemetry)
}

/// Poll until `condition` holds, panicking after two seconds.
async fn wait_until<F: Fn() -> bool>(condition: F, what: &str) {
    let deadline = Instant::now() + Duration::from_secs(2);
    while !condition() {
        assert!(Instant::now() < deadline, "Timed out waiting for {}", what);
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}

// ============================================================================
// Integration Tests
// ============================================================================

/// Test the complete pipeline from position samples to a delivered alert.
///
/// This simulates an approach to a saved location:
/// 1. The sync feed replaces the record set
/// 2. Positions arrive far away, nearby, then inside the radius
/// 3. The first inside sample fires exactly one alert
/// 4. Staying inside stays silent
#[tokio::test]
async fn test_approach_fires_alert_exactly_once() {
    let sink = Arc::new(RecordingSink::default());
    let (handle, position_tx, command_tx, telemetry) =
        start_engine(sink.clone(), EngineConfig::default());

    let office = make_record("office", "Office", OFFICE, arrival_now());
    command_tx
        .send(EngineCommand::ReplaceRecords(vec![office]))
        .expect("Channel should not be closed");

    for point in [FAR_AWAY, OFFICE_NEAR, OFFICE_INSIDE, OFFICE_INSIDE] {
        position_tx
            .send(PositionUpdate::new(coordinate(point)))
            .expect("Channel should not be closed");
    }

    wait_until(|| telemetry.snapshot().passes_run >= 4, "four passes").await;

    let events = sink.events();
    assert_eq!(events.len(), 1, "Exactly one alert should fire on entry");
    assert_eq!(events[0].record_id, GeofenceId::from("office"));
    assert_eq!(events[0].record_name, "Office");
    assert!(
        events[0].distance_meters <= 100.0,
        "Alert distance should be within the radius, got {}",
        events[0].distance_meters
    );

    let counters = telemetry.snapshot();
    assert_eq!(counters.positions_received, 4);
    assert_eq!(counters.passes_run, 4);
    assert_eq!(counters.alerts_fired, 1);
    assert_eq!(counters.record_replacements, 1);

    handle.shutdown();
    handle.join().await;
}

/// Test that records straight from the JSON feed drive alerts end to end.
#[tokio::test]
async fn test_json_feed_to_alert_flow() {
    let sink = Arc::new(RecordingSink::default());
    let (handle, position_tx, command_tx, telemetry) =
        start_engine(sink.clone(), EngineConfig::default());

    let arrival = arrival_now().format("%H:%M:%S").to_string();
    let feed = format!(
        r#"[{{
            "id": "rec-42",
            "name": "Dentist",
            "latitude": 48.13743,
            "longitude": 11.57549,
            "time": "{}",
            "distance": 100.0,
            "address": "Marienplatz 1"
        }}]"#,
        arrival
    );
    let records = parse_records(&feed).expect("feed should parse");

    command_tx
        .send(EngineCommand::ReplaceRecords(records))
        .unwrap();
    position_tx
        .send(PositionUpdate::new(coordinate(OFFICE_INSIDE)))
        .unwrap();

    wait_until(|| telemetry.snapshot().passes_run >= 1, "one pass").await;

    let events = sink.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].record_name, "Dentist");

    handle.shutdown();
    handle.join().await;
}

/// Test that an arrival time hours away suppresses the alert even inside
/// the radius.
#[tokio::test]
async fn test_alert_suppressed_outside_time_window() {
    let sink = Arc::new(RecordingSink::default());
    let (handle, position_tx, command_tx, telemetry) =
        start_engine(sink.clone(), EngineConfig::default());

    let office = make_record("office", "Office", OFFICE, arrival_far_from_now());
    command_tx
        .send(EngineCommand::ReplaceRecords(vec![office]))
        .unwrap();
    position_tx
        .send(PositionUpdate::new(coordinate(OFFICE_INSIDE)))
        .unwrap();

    wait_until(|| telemetry.snapshot().passes_run >= 1, "one pass").await;

    assert!(
        sink.events().is_empty(),
        "No alert should fire outside the time window"
    );

    handle.shutdown();
    handle.join().await;
}

/// Test that removing and re-adding a record resets its trigger state.
///
/// A record that vanishes from the feed and comes back under the same id
/// is a fresh fence: the next qualifying entry fires again even though
/// the position never left the radius.
#[tokio::test]
async fn test_record_replacement_resets_trigger_state() {
    let sink = Arc::new(RecordingSink::default());
    let (handle, position_tx, command_tx, telemetry) =
        start_engine(sink.clone(), EngineConfig::default());

    let office = make_record("office", "Office", OFFICE, arrival_now());
    command_tx
        .send(EngineCommand::ReplaceRecords(vec![office.clone()]))
        .unwrap();
    position_tx
        .send(PositionUpdate::new(coordinate(OFFICE_INSIDE)))
        .unwrap();

    wait_until(|| telemetry.snapshot().alerts_fired >= 1, "first alert").await;

    // Feed drops the record, then restores it
    command_tx
        .send(EngineCommand::ReplaceRecords(vec![]))
        .unwrap();
    command_tx
        .send(EngineCommand::ReplaceRecords(vec![office]))
        .unwrap();
    position_tx
        .send(PositionUpdate::new(coordinate(OFFICE_INSIDE)))
        .unwrap();

    wait_until(|| telemetry.snapshot().passes_run >= 2, "second pass").await;

    assert_eq!(
        sink.events().len(),
        2,
        "Restored record should fire again without leaving the radius"
    );
    assert_eq!(telemetry.snapshot().record_replacements, 3);

    handle.shutdown();
    handle.join().await;
}

/// Test enabling alerts on a running engine.
///
/// While disabled, transitions are still tracked silently. Enabling while
/// already inside must not fire retroactively; the next fresh entry does.
#[tokio::test]
async fn test_settings_update_enables_alerting() {
    let sink = Arc::new(RecordingSink::default());
    let disabled = EngineConfig::default().with_alerts_enabled(false);
    let (handle, position_tx, command_tx, telemetry) = start_engine(sink.clone(), disabled);

    let office = make_record("office", "Office", OFFICE, arrival_now());
    command_tx
        .send(EngineCommand::ReplaceRecords(vec![office]))
        .unwrap();
    position_tx
        .send(PositionUpdate::new(coordinate(OFFICE_INSIDE)))
        .unwrap();

    wait_until(|| telemetry.snapshot().passes_run >= 1, "first pass").await;
    assert!(sink.events().is_empty(), "Disabled engine should stay silent");

    // Enable while still inside the fence
    command_tx
        .send(EngineCommand::UpdateConfig(
            EngineConfig::default().with_alerts_enabled(true),
        ))
        .unwrap();
    position_tx
        .send(PositionUpdate::new(coordinate(OFFICE_INSIDE)))
        .unwrap();

    wait_until(|| telemetry.snapshot().passes_run >= 2, "second pass").await;
    assert!(
        sink.events().is_empty(),
        "Enabling mid-visit should not fire retroactively"
    );

    // Leave and come back
    position_tx
        .send(PositionUpdate::new(coordinate(FAR_AWAY)))
        .unwrap();
    position_tx
        .send(PositionUpdate::new(coordinate(OFFICE_INSIDE)))
        .unwrap();

    wait_until(|| telemetry.snapshot().passes_run >= 4, "fourth pass").await;
    assert_eq!(
        sink.events().len(),
        1,
        "Fresh entry after enabling should fire"
    );

    handle.shutdown();
    handle.join().await;
}

/// Test that delivery failures count in telemetry but never retrigger.
#[tokio::test]
async fn test_sink_failure_does_not_retrigger() {
    let sink = Arc::new(FailingSink::default());
    let (handle, position_tx, command_tx, telemetry) =
        start_engine(sink.clone(), EngineConfig::default());

    let office = make_record("office", "Office", OFFICE, arrival_now());
    command_tx
        .send(EngineCommand::ReplaceRecords(vec![office]))
        .unwrap();

    // Enter, stay, leave, enter again
    for point in [OFFICE_INSIDE, OFFICE_INSIDE, FAR_AWAY, OFFICE_INSIDE] {
        position_tx
            .send(PositionUpdate::new(coordinate(point)))
            .unwrap();
    }

    wait_until(|| telemetry.snapshot().passes_run >= 4, "four passes").await;

    assert_eq!(
        sink.attempts().len(),
        2,
        "Each fresh entry should attempt delivery exactly once"
    );

    let counters = telemetry.snapshot();
    assert_eq!(counters.alerts_fired, 2);
    assert_eq!(counters.sink_failures, 2);

    handle.shutdown();
    handle.join().await;
}

/// Test that the live position cell follows the latest processed sample.
#[tokio::test]
async fn test_live_position_follows_stream() {
    let engine = AlertEngine::new(
        Arc::new(RecordingSink::default()),
        EngineConfig::default(),
    );
    let live_position = engine.live_position();
    let telemetry = engine.telemetry();

    let (position_tx, position_rx) = mpsc::unbounded_channel();
    let (_command_tx, command_rx) = mpsc::unbounded_channel();
    let handle = engine.start(&Handle::current(), position_rx, command_rx);

    assert!(live_position.current().is_none(), "No sample seen yet");

    position_tx
        .send(PositionUpdate::new(coordinate(FAR_AWAY)))
        .unwrap();
    position_tx
        .send(PositionUpdate::new(coordinate(OFFICE)))
        .unwrap();

    wait_until(|| telemetry.snapshot().passes_run >= 2, "two passes").await;

    let current = live_position
        .current()
        .expect("Live position should be set after samples");
    assert_eq!(current.coordinate, coordinate(OFFICE));

    handle.shutdown();
    handle.join().await;
}

/// Test that shutdown stops the consumer loop and closes its inputs.
#[tokio::test]
async fn test_shutdown_stops_engine() {
    let sink = Arc::new(RecordingSink::default());
    let (handle, position_tx, _command_tx, telemetry) =
        start_engine(sink, EngineConfig::default());

    position_tx
        .send(PositionUpdate::new(coordinate(FAR_AWAY)))
        .unwrap();
    wait_until(|| telemetry.snapshot().passes_run >= 1, "one pass").await;

    handle.shutdown();
    handle.join().await;

    assert!(
        position_tx
            .send(PositionUpdate::new(coordinate(OFFICE)))
            .is_err(),
        "Position channel should be closed after shutdown"
    );
}
