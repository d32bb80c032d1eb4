//! Per-record trigger state and the evaluation pass.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{Local, NaiveTime};
use tracing::{debug, info, warn};

use super::model::{AlertEvent, FenceTransition, PassOutcome};
use super::sink::AlertSink;
use crate::geo::{self, Coordinate};
use crate::geofence::{GeofenceId, GeofenceRecord};
use crate::schedule::AlertWindow;
use crate::store::GeofenceStore;

/// Per-record trigger flag.
///
/// Edge-triggering hinges on remembering whether the previous pass already
/// saw the record qualifying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum TriggerState {
    #[default]
    Outside,
    Inside,
}

/// Evaluator configuration.
///
/// Settings are explicit state handed in at construction and replaced via
/// [`AlertEvaluator::set_config`] when the settings source changes; the
/// evaluator never reads ambient process-wide values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvaluatorConfig {
    /// Minutes around each record's arrival time that qualify.
    pub window: AlertWindow,

    /// When false, trigger state is still tracked but the sink is never
    /// invoked and nothing is reported as fired.
    pub alerts_enabled: bool,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            window: AlertWindow::default(),
            alerts_enabled: true,
        }
    }
}

impl EvaluatorConfig {
    /// Set the time window in minutes.
    pub fn with_window_minutes(mut self, minutes: u32) -> Self {
        self.window = AlertWindow::from_minutes(minutes);
        self
    }

    /// Enable or disable alert delivery.
    pub fn with_alerts_enabled(mut self, enabled: bool) -> Self {
        self.alerts_enabled = enabled;
        self
    }
}

/// Decides which records fire for each position sample.
///
/// Owns the per-record trigger state and must therefore be driven by one
/// caller at a time; the engine funnels every position sample and record
/// replacement through a single task to guarantee that. Records are
/// evaluated independently, in snapshot order, and one record's outcome
/// never affects another's.
pub struct AlertEvaluator {
    store: GeofenceStore,
    sink: Arc<dyn AlertSink>,
    config: EvaluatorConfig,
    trigger_states: HashMap<GeofenceId, TriggerState>,
}

impl AlertEvaluator {
    /// Create an evaluator reading records from `store` and delivering
    /// alerts to `sink`.
    pub fn new(store: GeofenceStore, sink: Arc<dyn AlertSink>, config: EvaluatorConfig) -> Self {
        Self {
            store,
            sink,
            config,
            trigger_states: HashMap::new(),
        }
    }

    /// Current configuration.
    pub fn config(&self) -> EvaluatorConfig {
        self.config
    }

    /// Replace the configuration. Takes effect on the next pass.
    pub fn set_config(&mut self, config: EvaluatorConfig) {
        self.config = config;
    }

    /// Run one evaluation pass against the current wall-clock time.
    pub fn on_location_update(&mut self, position: Coordinate) -> PassOutcome {
        self.evaluate_at(position, Local::now().time())
    }

    /// Run one evaluation pass with an explicit time of day.
    ///
    /// # Arguments
    ///
    /// * `position` - Latest live position
    /// * `now` - Wall-clock time of day for the window checks
    ///
    /// # Returns
    ///
    /// The pass outcome: which records fired, which deliveries failed, and
    /// the per-record transitions.
    pub fn evaluate_at(&mut self, position: Coordinate, now: NaiveTime) -> PassOutcome {
        let snapshot = self.store.snapshot();
        self.discard_stale_states(&snapshot);

        let mut outcome = PassOutcome {
            records_evaluated: snapshot.len(),
            ..PassOutcome::default()
        };

        for record in snapshot.iter() {
            let distance = geo::distance_meters(position, record.coordinate());
            let time_ok = self.config.window.contains(record.arrival_time(), now);
            let qualifies = distance <= record.radius_meters() && time_ok;

            let transition = self.transition(record.id(), qualifies);
            match transition {
                FenceTransition::Entered => {
                    let event = AlertEvent::new(record.id().clone(), record.name(), distance);

                    if self.config.alerts_enabled {
                        info!(
                            record = %event.record_id,
                            name = %event.record_name,
                            distance_m = distance,
                            "Alert fired"
                        );

                        if let Err(error) = self.sink.fire(&event) {
                            warn!(
                                record = %event.record_id,
                                error = %error,
                                "Alert sink failed, record stays fired"
                            );
                            outcome.sink_failures.push((event.record_id.clone(), error));
                        }

                        outcome.fired.push(event);
                    } else {
                        debug!(
                            record = %event.record_id,
                            "Geofence entered with alerts disabled"
                        );
                    }
                }
                FenceTransition::Exited => {
                    debug!(record = %record.id(), "Geofence exited, re-armed");
                }
                FenceTransition::Inside | FenceTransition::Outside => {}
            }

            outcome.transitions.push((record.id().clone(), transition));
        }

        outcome
    }

    /// Reconcile trigger state with a newly delivered record set.
    ///
    /// Called when the sync feed replaces the records, before the next
    /// pass runs. Ids absent from `records` lose their state immediately;
    /// deferring that to the next pass would let a remove-then-re-add
    /// sequence carry stale suppression across the gap.
    pub fn sync_records(&mut self, records: &[GeofenceRecord]) {
        self.discard_stale_states(records);
    }

    /// Number of records currently holding trigger state.
    pub fn tracked_records(&self) -> usize {
        self.trigger_states.len()
    }

    /// Drive one record's state machine and name what happened.
    fn transition(&mut self, id: &GeofenceId, qualifies: bool) -> FenceTransition {
        let state = self.trigger_states.entry(id.clone()).or_default();

        match (*state, qualifies) {
            (TriggerState::Outside, true) => {
                *state = TriggerState::Inside;
                FenceTransition::Entered
            }
            (TriggerState::Inside, false) => {
                *state = TriggerState::Outside;
                FenceTransition::Exited
            }
            (TriggerState::Inside, true) => FenceTransition::Inside,
            (TriggerState::Outside, false) => FenceTransition::Outside,
        }
    }

    /// Discard trigger state for ids not present in `records`.
    fn discard_stale_states(&mut self, records: &[GeofenceRecord]) {
        if self.trigger_states.is_empty() {
            return;
        }

        let live: HashSet<&GeofenceId> = records.iter().map(|r| r.id()).collect();
        self.trigger_states.retain(|id, _| live.contains(id));
    }
}
