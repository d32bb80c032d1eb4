//! Record identity and the validated geofence model.

use std::fmt;

use chrono::NaiveTime;
use thiserror::Error;

use crate::geo::{Coordinate, GeoError};

/// Errors from validating a geofence record.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeofenceError {
    /// Trigger radius was zero, negative, or not a number.
    #[error("invalid trigger radius: {0} (must be a positive number of meters)")]
    InvalidRadius(f64),

    /// Arrival time string did not parse.
    #[error("invalid arrival time '{0}' (expected HH:MM or HH:MM:SS)")]
    InvalidArrivalTime(String),

    /// Coordinate out of range.
    #[error("invalid coordinate: {0}")]
    Coordinate(#[from] GeoError),

    /// The record feed document could not be parsed.
    #[error("malformed record document: {0}")]
    Malformed(String),
}

/// Stable identity of a geofence record.
///
/// Ids come from the sync feed and are opaque to the engine; uniqueness is
/// the feed's responsibility. Duplicate ids within one snapshot collapse to
/// the last occurrence wherever records are keyed by id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeofenceId(String);

impl GeofenceId {
    /// Create an id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GeofenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GeofenceId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for GeofenceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A saved location with a trigger radius and a daily arrival time.
///
/// Records are immutable once constructed; the sync feed replaces the whole
/// set rather than mutating individual records in place.
#[derive(Debug, Clone, PartialEq)]
pub struct GeofenceRecord {
    id: GeofenceId,
    name: String,
    coordinate: Coordinate,
    radius_meters: f64,
    arrival_time: NaiveTime,
    address: Option<String>,
}

impl GeofenceRecord {
    /// Create a record, validating the trigger radius.
    ///
    /// # Arguments
    ///
    /// * `id` - Stable record identity from the sync feed
    /// * `name` - Display name
    /// * `coordinate` - Fence center
    /// * `radius_meters` - Trigger radius, must be positive and finite
    /// * `arrival_time` - Daily arrival target, second precision
    ///
    /// # Returns
    ///
    /// A `Result` with the record, or `GeofenceError::InvalidRadius` when
    /// the radius is not a positive number.
    pub fn new(
        id: GeofenceId,
        name: impl Into<String>,
        coordinate: Coordinate,
        radius_meters: f64,
        arrival_time: NaiveTime,
    ) -> Result<Self, GeofenceError> {
        if !radius_meters.is_finite() || radius_meters <= 0.0 {
            return Err(GeofenceError::InvalidRadius(radius_meters));
        }

        Ok(Self {
            id,
            name: name.into(),
            coordinate,
            radius_meters,
            arrival_time,
            address: None,
        })
    }

    /// Attach a display address.
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Record identity.
    pub fn id(&self) -> &GeofenceId {
        &self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fence center.
    pub fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    /// Trigger radius in meters.
    pub fn radius_meters(&self) -> f64 {
        self.radius_meters
    }

    /// Daily arrival target.
    pub fn arrival_time(&self) -> NaiveTime {
        self.arrival_time
    }

    /// Display address, when the feed supplied one.
    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }
}
