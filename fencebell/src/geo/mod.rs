//! Geodesy for proximity checks.
//!
//! Provides validated geographic coordinates and the great-circle distance
//! between them, used to decide whether a live position lies inside a
//! geofence radius.

mod types;

pub use types::{Coordinate, GeoError, MAX_LAT, MAX_LON, MIN_LAT, MIN_LON};

/// Mean Earth radius in meters used by the haversine distance.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Computes the great-circle distance between two coordinates.
///
/// Uses the haversine formula on a sphere of radius [`EARTH_RADIUS_METERS`].
/// Pure function, safe to call concurrently from multiple evaluation passes.
///
/// # Arguments
///
/// * `a` - First coordinate
/// * `b` - Second coordinate
///
/// # Returns
///
/// Surface distance in meters, always finite and non-negative.
#[inline]
pub fn distance_meters(a: Coordinate, b: Coordinate) -> f64 {
    let phi1 = a.latitude().to_radians();
    let phi2 = b.latitude().to_radians();
    let delta_phi = (b.latitude() - a.latitude()).to_radians();
    let delta_lambda = (b.longitude() - a.longitude()).to_radians();

    let h = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_METERS * h.sqrt().atan2((1.0 - h).sqrt())
}
