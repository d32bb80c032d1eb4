//! Long-running alert engine.
//!
//! Wires the evaluator, store, live position cell, sink, and telemetry into
//! a single consumer task. All inputs arrive on channels - position samples
//! on one, record replacements and settings changes on the other - and are
//! processed strictly one at a time, so the evaluator is never re-entered
//! and trigger state needs no locking. Shutdown is cooperative via a
//! cancellation token; a pass in flight always runs to completion.
//!
//! # Architecture
//!
//! ```text
//! location stream ──mpsc──►┐
//!                          ├──► engine task ──► AlertEvaluator ──► AlertSink
//! feed / settings ──mpsc──►┘         │
//!                                    ├──► SharedLivePosition (display)
//!                                    └──► EngineTelemetry (counters)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use fencebell::alert::NullSink;
//! use fencebell::engine::{AlertEngine, EngineCommand, EngineConfig};
//!
//! let engine = AlertEngine::new(Arc::new(NullSink), EngineConfig::default());
//! let (position_tx, position_rx) = tokio::sync::mpsc::unbounded_channel();
//! let (command_tx, command_rx) = tokio::sync::mpsc::unbounded_channel();
//!
//! let handle = engine.start(&tokio::runtime::Handle::current(), position_rx, command_rx);
//!
//! command_tx.send(EngineCommand::ReplaceRecords(records))?;
//! position_tx.send(update)?;
//!
//! handle.shutdown();
//! handle.join().await;
//! ```

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::alert::{AlertEvaluator, AlertSink, EvaluatorConfig};
use crate::geofence::GeofenceRecord;
use crate::position::{PositionUpdate, SharedLivePosition};
use crate::schedule::{AlertWindow, DEFAULT_WINDOW_MINUTES};
use crate::store::GeofenceStore;
use crate::telemetry::EngineTelemetry;

/// Engine configuration.
///
/// Mirrors the settings source: the window size and the alerting on/off
/// flag. Runtime changes arrive as [`EngineCommand::UpdateConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Minutes around each record's arrival time that qualify.
    pub window_minutes: u32,

    /// Whether alerts are delivered to the sink.
    pub alerts_enabled: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            window_minutes: DEFAULT_WINDOW_MINUTES,
            alerts_enabled: true,
        }
    }
}

impl EngineConfig {
    /// Set the time window in minutes.
    pub fn with_window_minutes(mut self, minutes: u32) -> Self {
        self.window_minutes = minutes;
        self
    }

    /// Enable or disable alert delivery.
    pub fn with_alerts_enabled(mut self, enabled: bool) -> Self {
        self.alerts_enabled = enabled;
        self
    }

    fn evaluator_config(&self) -> EvaluatorConfig {
        EvaluatorConfig {
            window: AlertWindow::from_minutes(self.window_minutes),
            alerts_enabled: self.alerts_enabled,
        }
    }
}

/// Commands accepted by a running engine.
#[derive(Debug)]
pub enum EngineCommand {
    /// Replace the full geofence record set with a new snapshot from the
    /// sync feed. Idempotent for identical content.
    ReplaceRecords(Vec<GeofenceRecord>),

    /// Apply new settings from the settings source.
    UpdateConfig(EngineConfig),
}

/// The alert engine, before it is started.
///
/// Construction wires up the store, live position cell, and telemetry;
/// [`start`](Self::start) consumes the engine and moves them into the
/// consumer task. Clone the handles you need for display before starting.
pub struct AlertEngine {
    store: GeofenceStore,
    live_position: SharedLivePosition,
    telemetry: Arc<EngineTelemetry>,
    sink: Arc<dyn AlertSink>,
    config: EngineConfig,
    cancellation: CancellationToken,
}

impl AlertEngine {
    /// Create an engine delivering alerts to `sink`.
    pub fn new(sink: Arc<dyn AlertSink>, config: EngineConfig) -> Self {
        Self {
            store: GeofenceStore::new(),
            live_position: SharedLivePosition::new(),
            telemetry: Arc::new(EngineTelemetry::new()),
            sink,
            config,
            cancellation: CancellationToken::new(),
        }
    }

    /// Live position cell, for display readers.
    pub fn live_position(&self) -> SharedLivePosition {
        self.live_position.clone()
    }

    /// Telemetry counters.
    pub fn telemetry(&self) -> Arc<EngineTelemetry> {
        Arc::clone(&self.telemetry)
    }

    /// Cancellation token, for coordinating shutdown with other tasks.
    pub fn cancellation(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    /// Spawn the consumer loop on the given runtime.
    ///
    /// The loop is the single writer of evaluator state: position samples
    /// and commands are interleaved in arrival order but never processed
    /// concurrently. It runs until the handle is shut down or both input
    /// channels close.
    pub fn start(
        self,
        runtime: &Handle,
        positions: mpsc::UnboundedReceiver<PositionUpdate>,
        commands: mpsc::UnboundedReceiver<EngineCommand>,
    ) -> EngineHandle {
        let cancellation = self.cancellation.clone();
        let telemetry = Arc::clone(&self.telemetry);

        let task = runtime.spawn(run_loop(self, positions, commands));

        EngineHandle {
            task,
            cancellation,
            telemetry,
        }
    }
}

/// Handle to a running engine.
pub struct EngineHandle {
    task: JoinHandle<()>,
    cancellation: CancellationToken,
    telemetry: Arc<EngineTelemetry>,
}

impl EngineHandle {
    /// Telemetry counters of the running engine.
    pub fn telemetry(&self) -> Arc<EngineTelemetry> {
        Arc::clone(&self.telemetry)
    }

    /// Request shutdown. A pass in flight completes first.
    pub fn shutdown(&self) {
        self.cancellation.cancel();
    }

    /// Wait for the engine task to finish.
    pub async fn join(self) {
        if let Err(error) = self.task.await {
            warn!(%error, "Engine task terminated abnormally");
        }
    }
}

/// Single-consumer loop: the only writer of evaluator state.
async fn run_loop(
    engine: AlertEngine,
    mut positions: mpsc::UnboundedReceiver<PositionUpdate>,
    mut commands: mpsc::UnboundedReceiver<EngineCommand>,
) {
    let AlertEngine {
        store,
        live_position,
        telemetry,
        sink,
        config,
        cancellation,
    } = engine;

    let mut evaluator = AlertEvaluator::new(store.clone(), sink, config.evaluator_config());
    info!(
        window_minutes = config.window_minutes,
        alerts_enabled = config.alerts_enabled,
        "Alert engine started"
    );

    let mut positions_open = true;
    let mut commands_open = true;

    while positions_open || commands_open {
        tokio::select! {
            biased;

            _ = cancellation.cancelled() => {
                debug!("Alert engine cancelled");
                break;
            }

            command = commands.recv(), if commands_open => {
                match command {
                    Some(EngineCommand::ReplaceRecords(records)) => {
                        evaluator.sync_records(&records);
                        telemetry.records_replaced();
                        info!(records = records.len(), "Record set replaced");
                        store.replace_all(records);
                    }
                    Some(EngineCommand::UpdateConfig(new_config)) => {
                        info!(
                            window_minutes = new_config.window_minutes,
                            alerts_enabled = new_config.alerts_enabled,
                            "Engine settings updated"
                        );
                        evaluator.set_config(new_config.evaluator_config());
                    }
                    None => {
                        debug!("Engine command channel closed");
                        commands_open = false;
                    }
                }
            }

            position = positions.recv(), if positions_open => {
                match position {
                    Some(update) => {
                        telemetry.position_received();
                        live_position.update(update);

                        let outcome = evaluator.on_location_update(update.coordinate);
                        telemetry.pass_completed();
                        telemetry.alerts_fired(outcome.fired.len() as u64);
                        telemetry.sink_failures(outcome.sink_failures.len() as u64);
                    }
                    None => {
                        debug!("Engine position channel closed");
                        positions_open = false;
                    }
                }
            }
        }
    }

    info!("Alert engine stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_config_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.window_minutes, DEFAULT_WINDOW_MINUTES);
        assert!(config.alerts_enabled);
    }

    #[test]
    fn test_engine_config_builders() {
        let config = EngineConfig::default()
            .with_window_minutes(30)
            .with_alerts_enabled(false);

        assert_eq!(config.window_minutes, 30);
        assert!(!config.alerts_enabled);

        let evaluator_config = config.evaluator_config();
        assert_eq!(evaluator_config.window.minutes(), 30);
        assert!(!evaluator_config.alerts_enabled);
    }

    #[tokio::test]
    async fn test_engine_stops_when_inputs_close() {
        use crate::alert::NullSink;

        let engine = AlertEngine::new(Arc::new(NullSink), EngineConfig::default());
        let (position_tx, position_rx) = mpsc::unbounded_channel();
        let (command_tx, command_rx) = mpsc::unbounded_channel();

        let handle = engine.start(&Handle::current(), position_rx, command_rx);

        // Closing both inputs ends the loop without an explicit shutdown
        drop(position_tx);
        drop(command_tx);

        handle.join().await;
    }

    #[tokio::test]
    async fn test_engine_shutdown_is_idempotent() {
        use crate::alert::NullSink;

        let engine = AlertEngine::new(Arc::new(NullSink), EngineConfig::default());
        let (_position_tx, position_rx) = mpsc::unbounded_channel();
        let (_command_tx, command_rx) = mpsc::unbounded_channel();

        let handle = engine.start(&Handle::current(), position_rx, command_rx);

        handle.shutdown();
        handle.shutdown();
        handle.join().await;
    }
}
