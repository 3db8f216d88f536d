//! Geographic coordinate type, validated at construction.
//!
//! A [`Coordinate`] can only be obtained through [`Coordinate::new`], so any
//! coordinate reaching the submission path is already known to be in range.

use std::fmt;

use thiserror::Error;

/// Inclusive latitude bounds in decimal degrees.
pub const LATITUDE_BOUNDS: (f64, f64) = (-90.0, 90.0);

/// Inclusive longitude bounds in decimal degrees.
pub const LONGITUDE_BOUNDS: (f64, f64) = (-180.0, 180.0);

/// Latitude of the built-in pickup point (San Juan de Lurigancho office).
pub const PICKUP_LATITUDE: f64 = -12.048012;

/// Longitude of the built-in pickup point.
pub const PICKUP_LONGITUDE: f64 = -77.000123;

/// Display name of the built-in pickup point.
pub const PICKUP_NAME: &str = "San Juan de Lurigancho";

/// Why a latitude/longitude pair was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordinateError {
    #[error("latitude {0} is not a number in [-90, 90]")]
    InvalidLatitude(f64),
    #[error("longitude {0} is not a number in [-180, 180]")]
    InvalidLongitude(f64),
}

/// A validated WGS84 latitude/longitude pair.
///
/// Immutable once built; callers replace the whole value when a newer fix is
/// accepted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    /// Validates and wraps a latitude/longitude pair.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinateError::InvalidLatitude`] or
    /// [`CoordinateError::InvalidLongitude`] when the respective component is
    /// out of bounds. NaN fails the range check and is rejected the same way.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinateError> {
        if !(LATITUDE_BOUNDS.0..=LATITUDE_BOUNDS.1).contains(&latitude) {
            return Err(CoordinateError::InvalidLatitude(latitude));
        }
        if !(LONGITUDE_BOUNDS.0..=LONGITUDE_BOUNDS.1).contains(&longitude) {
            return Err(CoordinateError::InvalidLongitude(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    #[must_use]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    #[must_use]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.latitude, self.longitude)
    }
}

/// The built-in pickup point, used when `LOGITRACK_PICKUP_POINT` is unset.
#[must_use]
pub fn default_pickup_point() -> Coordinate {
    Coordinate {
        latitude: PICKUP_LATITUDE,
        longitude: PICKUP_LONGITUDE,
    }
}

#[cfg(test)]
#[path = "coordinate_test.rs"]
mod tests;
