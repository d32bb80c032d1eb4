//! Geofence records and their wire format.
//!
//! A geofence record pairs a saved coordinate with a trigger radius and a
//! daily arrival time. Records are owned by the store and replaced wholesale
//! by the sync feed; this module validates incoming documents at that
//! boundary so the evaluator only ever sees well-formed values.

mod model;
mod wire;

pub use model::{GeofenceError, GeofenceId, GeofenceRecord};
pub use wire::{parse_arrival_time, parse_records, GeofenceDoc};
