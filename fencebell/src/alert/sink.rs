//! Alert delivery boundary.

use thiserror::Error;

use super::model::AlertEvent;

/// Error returned when a sink cannot deliver an alert.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("alert delivery failed: {reason}")]
pub struct SinkError {
    reason: String,
}

impl SinkError {
    /// Create a delivery error with a human-readable reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// The delivery failure reason.
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// Receives fire decisions from the evaluator.
///
/// `fire` is invoked synchronously inside the evaluation pass and must
/// return promptly; a sink with long-running delivery work (vibration,
/// notification services) hands it off to its own channel or task instead
/// of blocking the evaluator.
///
/// A delivery failure is reported in the pass outcome but does not touch
/// trigger state: the record counts as fired either way, so a persistently
/// failing sink cannot cause repeat alerts.
pub trait AlertSink: Send + Sync {
    /// Deliver one alert.
    fn fire(&self, event: &AlertEvent) -> Result<(), SinkError>;
}

/// Sink that silently drops every alert.
///
/// Useful when running the evaluator for its state tracking alone, or as
/// a placeholder in tests and harnesses.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl AlertSink for NullSink {
    fn fire(&self, _event: &AlertEvent) -> Result<(), SinkError> {
        Ok(())
    }
}
