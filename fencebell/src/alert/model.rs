//! Pass results and the events handed to sinks.

use crate::geofence::GeofenceId;

use super::sink::SinkError;

/// One fired alert, handed to the sink and reported in the pass outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertEvent {
    /// Identity of the record that fired.
    pub record_id: GeofenceId,

    /// Display name of the record, for notification text.
    pub record_name: String,

    /// Distance to the fence center at fire time, in meters.
    pub distance_meters: f64,
}

impl AlertEvent {
    /// Create an event for a record firing at the given distance.
    pub fn new(record_id: GeofenceId, record_name: impl Into<String>, distance_meters: f64) -> Self {
        Self {
            record_id,
            record_name: record_name.into(),
            distance_meters,
        }
    }
}

/// What a single record did during one pass.
///
/// Callers that only care about fired alerts can ignore this and read
/// [`PassOutcome::fired`]; the transition list exists for surfaces that
/// display per-record status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FenceTransition {
    /// Crossed into the qualifying region this pass. Fires.
    Entered,

    /// Still inside the qualifying region. Suppressed.
    Inside,

    /// Left the qualifying region this pass. Re-armed, no alert.
    Exited,

    /// Outside the qualifying region, as before.
    Outside,
}

impl FenceTransition {
    /// Whether the record is inside the qualifying region after this pass.
    pub fn is_inside(&self) -> bool {
        matches!(self, FenceTransition::Entered | FenceTransition::Inside)
    }
}

/// Result of one evaluation pass over the store snapshot.
#[derive(Debug, Default)]
pub struct PassOutcome {
    /// Number of records examined.
    pub records_evaluated: usize,

    /// Alerts fired this pass, in snapshot order.
    pub fired: Vec<AlertEvent>,

    /// Delivery failures, paired with the record that fired. The records
    /// still count as fired; failures are reported, never retried.
    pub sink_failures: Vec<(GeofenceId, SinkError)>,

    /// Per-record transitions, in snapshot order.
    pub transitions: Vec<(GeofenceId, FenceTransition)>,
}

impl PassOutcome {
    /// Whether any alert fired during the pass.
    pub fn fired_any(&self) -> bool {
        !self.fired.is_empty()
    }
}
