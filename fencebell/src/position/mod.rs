//! Live position tracking.
//!
//! The location stream delivers [`PositionUpdate`] samples; the engine keeps
//! the most recent one in a [`SharedLivePosition`] cell so display surfaces
//! can read "where are we now" without touching the evaluator. No history is
//! retained: each update overwrites the last.

use std::sync::Arc;

use chrono::{DateTime, Local};
use parking_lot::RwLock;

use crate::geo::Coordinate;

/// One sample from the location stream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionUpdate {
    /// Where the device is.
    pub coordinate: Coordinate,

    /// When the sample was received.
    pub received_at: DateTime<Local>,
}

impl PositionUpdate {
    /// Create an update stamped with the current wall clock.
    pub fn new(coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            received_at: Local::now(),
        }
    }

    /// Create an update with an explicit receive time (for testing).
    pub fn with_received_at(coordinate: Coordinate, received_at: DateTime<Local>) -> Self {
        Self {
            coordinate,
            received_at,
        }
    }
}

/// Latest-value cell holding the most recent position.
///
/// Cheap to clone and share between the stream side and display readers.
/// Writers overwrite, readers copy out; there is exactly one value at a
/// time.
#[derive(Debug, Clone, Default)]
pub struct SharedLivePosition {
    inner: Arc<RwLock<Option<PositionUpdate>>>,
}

impl SharedLivePosition {
    /// Create an empty cell.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the cell with the newest sample.
    pub fn update(&self, position: PositionUpdate) {
        *self.inner.write() = Some(position);
    }

    /// The most recent sample, or `None` before the first update.
    pub fn current(&self) -> Option<PositionUpdate> {
        *self.inner.read()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    #[test]
    fn test_cell_starts_empty() {
        let cell = SharedLivePosition::new();
        assert!(cell.current().is_none());
    }

    #[test]
    fn test_update_overwrites() {
        let cell = SharedLivePosition::new();

        cell.update(PositionUpdate::new(coord(1.0, 1.0)));
        cell.update(PositionUpdate::new(coord(2.0, 2.0)));

        let current = cell.current().unwrap();
        assert_eq!(current.coordinate.latitude(), 2.0);
    }

    #[test]
    fn test_clones_share_the_cell() {
        let cell = SharedLivePosition::new();
        let reader = cell.clone();

        cell.update(PositionUpdate::new(coord(48.1374, 11.5755)));

        let seen = reader.current().unwrap();
        assert_eq!(seen.coordinate.longitude(), 11.5755);
    }

    #[test]
    fn test_explicit_receive_time() {
        let at = Local::now();
        let update = PositionUpdate::with_received_at(coord(0.0, 0.0), at);
        assert_eq!(update.received_at, at);
    }
}
