//! Engine telemetry for observability and session summaries.
//!
//! Lock-free atomic counters bumped by the engine loop, copied out as a
//! point-in-time snapshot for display.
//!
//! # Architecture
//!
//! ```text
//! Engine loop ─────► EngineTelemetry ─────► TelemetrySnapshot ─────► Views
//!                    (atomic counters)     (point-in-time copy)     (CLI, etc.)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use fencebell::telemetry::EngineTelemetry;
//!
//! let telemetry = Arc::new(EngineTelemetry::new());
//!
//! telemetry.position_received();
//! telemetry.pass_completed();
//! telemetry.alerts_fired(1);
//!
//! let snapshot = telemetry.snapshot();
//! println!("Alerts fired: {}", snapshot.alerts_fired);
//! ```

mod metrics;
mod snapshot;

pub use metrics::EngineTelemetry;
pub use snapshot::TelemetrySnapshot;
