//! Atomic counters for the engine loop.

use std::sync::atomic::{AtomicU64, Ordering};

use super::snapshot::TelemetrySnapshot;

/// Counters bumped by the engine as it processes inputs.
///
/// All operations are lock-free; share one instance via `Arc` between the
/// engine loop and whatever displays the numbers.
#[derive(Debug, Default)]
pub struct EngineTelemetry {
    positions_received: AtomicU64,
    passes_run: AtomicU64,
    alerts_fired: AtomicU64,
    sink_failures: AtomicU64,
    record_replacements: AtomicU64,
}

impl EngineTelemetry {
    /// Create a telemetry block with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one position sample received from the stream.
    pub fn position_received(&self) {
        self.positions_received.fetch_add(1, Ordering::Relaxed);
    }

    /// Record one completed evaluation pass.
    pub fn pass_completed(&self) {
        self.passes_run.fetch_add(1, Ordering::Relaxed);
    }

    /// Record alerts fired during a pass.
    pub fn alerts_fired(&self, count: u64) {
        self.alerts_fired.fetch_add(count, Ordering::Relaxed);
    }

    /// Record failed alert deliveries during a pass.
    pub fn sink_failures(&self, count: u64) {
        self.sink_failures.fetch_add(count, Ordering::Relaxed);
    }

    /// Record one record-set replacement from the sync feed.
    pub fn records_replaced(&self) {
        self.record_replacements.fetch_add(1, Ordering::Relaxed);
    }

    /// Take a point-in-time copy of all counters.
    pub fn snapshot(&self) -> TelemetrySnapshot {
        TelemetrySnapshot {
            positions_received: self.positions_received.load(Ordering::Relaxed),
            passes_run: self.passes_run.load(Ordering::Relaxed),
            alerts_fired: self.alerts_fired.load(Ordering::Relaxed),
            sink_failures: self.sink_failures.load(Ordering::Relaxed),
            record_replacements: self.record_replacements.load(Ordering::Relaxed),
        }
    }
}
