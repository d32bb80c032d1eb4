//! Edge-triggered proximity alerting.
//!
//! The evaluator runs one pass per position sample: for every record in the
//! current store snapshot it computes the great-circle distance to the fence
//! center and checks the arrival time window, then drives a per-record state
//! machine so each qualifying entry rings the sink exactly once.
//!
//! # State Machine
//!
//! ```text
//!               qualifies (fire once)
//!   Outside ───────────────────────────► Inside
//!      ▲                                   │  ▲
//!      │                                   │  │ qualifies
//!      │        no longer qualifies        │  │ (suppressed)
//!      └───────────────────────────────────┘  │
//!                                          └──┘
//! ```
//!
//! A record qualifies when the position is within its trigger radius and the
//! current time of day falls inside the configured window around its arrival
//! time. Firing only on the Outside to Inside edge avoids an alert per
//! position tick while lingering inside a fence; leaving the fence re-arms
//! the record, so a fresh entry inside a later window fires again.
//!
//! Trigger state lives in the evaluator, keyed by record id, and is
//! discarded when a record disappears from the snapshot.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use fencebell::alert::{AlertEvaluator, EvaluatorConfig, NullSink};
//! use fencebell::store::GeofenceStore;
//!
//! let store = GeofenceStore::new();
//! store.replace_all(records);
//!
//! let mut evaluator =
//!     AlertEvaluator::new(store, Arc::new(NullSink), EvaluatorConfig::default());
//!
//! // One pass per position sample
//! let outcome = evaluator.on_location_update(position);
//! for event in &outcome.fired {
//!     println!("{} is {:.0} m away", event.record_name, event.distance_meters);
//! }
//! ```

mod evaluator;
mod model;
mod sink;

pub use evaluator::{AlertEvaluator, EvaluatorConfig};
pub use model::{AlertEvent, FenceTransition, PassOutcome};
pub use sink::{AlertSink, NullSink, SinkError};
