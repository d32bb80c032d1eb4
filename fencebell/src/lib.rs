//! Fencebell - Arrival alerts for saved locations
//!
//! This library provides the core functionality for alerting when a live
//! position stream enters a saved location's radius near its expected
//! arrival time. A single-consumer engine task evaluates every position
//! sample against an atomically replaceable record set and fires each
//! alert exactly once per qualifying entry.

pub mod alert;
pub mod config;
pub mod engine;
pub mod geo;
pub mod geofence;
pub mod logging;
pub mod position;
pub mod schedule;
pub mod store;
pub mod telemetry;

/// Crate version from Cargo.toml.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
