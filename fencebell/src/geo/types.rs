//! Coordinate types and range validation.

use std::fmt;

use thiserror::Error;

/// Minimum valid latitude in degrees.
pub const MIN_LAT: f64 = -90.0;

/// Maximum valid latitude in degrees.
pub const MAX_LAT: f64 = 90.0;

/// Minimum valid longitude in degrees.
pub const MIN_LON: f64 = -180.0;

/// Maximum valid longitude in degrees.
pub const MAX_LON: f64 = 180.0;

/// Errors from constructing geographic values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeoError {
    /// Latitude outside the valid range.
    #[error("invalid latitude: {0} (expected {MIN_LAT} to {MAX_LAT})")]
    InvalidLatitude(f64),

    /// Longitude outside the valid range.
    #[error("invalid longitude: {0} (expected {MIN_LON} to {MAX_LON})")]
    InvalidLongitude(f64),
}

/// A geographic position in degrees, validated on construction.
///
/// Downstream distance math assumes the ranges hold, so the fields are
/// private and only reachable through [`Coordinate::new`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    /// Create a coordinate from degrees.
    ///
    /// # Arguments
    ///
    /// * `latitude` - Latitude in degrees (-90.0 to 90.0)
    /// * `longitude` - Longitude in degrees (-180.0 to 180.0)
    ///
    /// # Returns
    ///
    /// A `Result` containing the coordinate or an error if either value is
    /// out of range. NaN and infinities fail the range check.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, GeoError> {
        if !(MIN_LAT..=MAX_LAT).contains(&latitude) {
            return Err(GeoError::InvalidLatitude(latitude));
        }
        if !(MIN_LON..=MAX_LON).contains(&longitude) {
            return Err(GeoError::InvalidLongitude(longitude));
        }

        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Latitude in degrees.
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in degrees.
    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_coordinate() {
        let coord = Coordinate::new(48.1374, 11.5755).unwrap();
        assert_eq!(coord.latitude(), 48.1374);
        assert_eq!(coord.longitude(), 11.5755);
    }

    #[test]
    fn test_boundary_values_accepted() {
        assert!(Coordinate::new(MIN_LAT, MIN_LON).is_ok());
        assert!(Coordinate::new(MAX_LAT, MAX_LON).is_ok());
        assert!(Coordinate::new(0.0, 0.0).is_ok());
    }

    #[test]
    fn test_latitude_out_of_range() {
        let result = Coordinate::new(90.5, 0.0);
        assert!(matches!(result, Err(GeoError::InvalidLatitude(_))));

        let result = Coordinate::new(-91.0, 0.0);
        assert!(matches!(result, Err(GeoError::InvalidLatitude(_))));
    }

    #[test]
    fn test_longitude_out_of_range() {
        let result = Coordinate::new(0.0, 180.1);
        assert!(matches!(result, Err(GeoError::InvalidLongitude(_))));

        let result = Coordinate::new(0.0, -200.0);
        assert!(matches!(result, Err(GeoError::InvalidLongitude(_))));
    }

    #[test]
    fn test_nan_rejected() {
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
        assert!(Coordinate::new(0.0, f64::NAN).is_err());
        assert!(Coordinate::new(f64::INFINITY, 0.0).is_err());
    }

    #[test]
    fn test_display_format() {
        let coord = Coordinate::new(48.1374, 11.5755).unwrap();
        assert_eq!(format!("{}", coord), "48.137400, 11.575500");
    }
}
