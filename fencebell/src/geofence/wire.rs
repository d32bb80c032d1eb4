//! Sync-feed document format.
//!
//! The sync feed delivers geofence records as JSON documents mirroring the
//! backing store's field names. Documents are converted into validated
//! [`GeofenceRecord`] values before they reach the store; a document that
//! fails validation is rejected with the reason rather than silently
//! skipped.

use chrono::NaiveTime;
use serde::Deserialize;

use super::model::{GeofenceError, GeofenceId, GeofenceRecord};
use crate::geo::Coordinate;

/// A geofence record as delivered by the sync feed.
///
/// # Document Format
///
/// ```json
/// {
///   "id": "abc123",
///   "name": "Office",
///   "latitude": 48.137,
///   "longitude": 11.575,
///   "time": "09:00:00",
///   "distance": 150.0,
///   "address": "Marienplatz 1, Munich"
/// }
/// ```
///
/// `time` accepts `HH:MM:SS` or `HH:MM`; `distance` is the trigger radius
/// in meters; `address` may be absent or null.
#[derive(Debug, Clone, Deserialize)]
pub struct GeofenceDoc {
    /// Stable record identity.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Fence center latitude in degrees.
    pub latitude: f64,
    /// Fence center longitude in degrees.
    pub longitude: f64,
    /// Daily arrival time of day.
    pub time: String,
    /// Trigger radius in meters.
    pub distance: f64,
    /// Optional display address.
    #[serde(default)]
    pub address: Option<String>,
}

impl TryFrom<GeofenceDoc> for GeofenceRecord {
    type Error = GeofenceError;

    fn try_from(doc: GeofenceDoc) -> Result<Self, Self::Error> {
        let coordinate = Coordinate::new(doc.latitude, doc.longitude)?;
        let arrival_time = parse_arrival_time(&doc.time)?;

        let record = GeofenceRecord::new(
            GeofenceId::new(doc.id),
            doc.name,
            coordinate,
            doc.distance,
            arrival_time,
        )?;

        Ok(match doc.address {
            Some(address) => record.with_address(address),
            None => record,
        })
    }
}

/// Parse an arrival time string from the feed.
///
/// Accepts `HH:MM:SS` and `HH:MM`; a bare `HH:MM` reads as second zero.
pub fn parse_arrival_time(value: &str) -> Result<NaiveTime, GeofenceError> {
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .map_err(|_| GeofenceError::InvalidArrivalTime(value.to_string()))
}

/// Parse a JSON array of feed documents into validated records.
///
/// Order is preserved; the first invalid document aborts the parse with
/// its validation error.
pub fn parse_records(json: &str) -> Result<Vec<GeofenceRecord>, GeofenceError> {
    let docs: Vec<GeofenceDoc> =
        serde_json::from_str(json).map_err(|e| GeofenceError::Malformed(e.to_string()))?;

    docs.into_iter().map(GeofenceRecord::try_from).collect()
}
