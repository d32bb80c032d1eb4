//! Point-in-time copy of the engine counters.

/// Counter values captured at one instant, for display.
///
/// Snapshots are plain data: copy them around freely, diff two of them for
/// rates, print them in a session summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TelemetrySnapshot {
    /// Position samples received from the stream.
    pub positions_received: u64,

    /// Evaluation passes completed.
    pub passes_run: u64,

    /// Alerts fired.
    pub alerts_fired: u64,

    /// Alert deliveries that failed.
    pub sink_failures: u64,

    /// Record-set replacements received from the sync feed.
    pub record_replacements: u64,
}
