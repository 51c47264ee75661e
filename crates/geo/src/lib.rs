//! Geospatial math for BloodConnect donor search.
//!
//! This crate provides:
//! - Haversine great-circle distance
//! - Bearing/distance point projection (used to nudge overlapping map markers)
//! - Bounding-box containment, with the India service area built in
//!
//! # Example
//!
//! ```
//! use bloodconnect_geo::{haversine_km, is_within_india_bounds, Coordinate};
//!
//! let delhi = Coordinate::new(28.6139, 77.2090);
//! let mumbai = Coordinate::new(19.0760, 72.8777);
//!
//! let distance_km = haversine_km(&delhi, &mumbai);
//! assert!((distance_km - 1150.0).abs() < 15.0);
//! assert!(is_within_india_bounds(delhi.latitude, delhi.longitude));
//! ```

mod bounds;
mod error;
mod haversine;

pub use bounds::{is_within_india_bounds, BoundingBox, INDIA_BOUNDS, INDIA_CENTROID};
pub use error::{GeoError, GeoErrorCode, Result};
pub use haversine::{
    destination_point, haversine_km, haversine_meters, EARTH_EQUATORIAL_RADIUS_M, EARTH_RADIUS_KM,
    EARTH_RADIUS_M,
};

/// A geographic coordinate with latitude and longitude.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees (-90 to 90)
    pub latitude: f64,
    /// Longitude in degrees (-180 to 180)
    pub longitude: f64,
}

impl Coordinate {
    /// Creates a new coordinate without range checks.
    #[inline]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Creates a coordinate, rejecting non-finite or out-of-range values.
    pub fn try_new(latitude: f64, longitude: f64) -> Result<Self> {
        let coord = Self::new(latitude, longitude);
        if coord.is_valid() {
            Ok(coord)
        } else {
            Err(GeoError::InvalidCoordinate(format!(
                "({latitude}, {longitude}) is outside [-90,90] x [-180,180]"
            )))
        }
    }

    /// Returns true if both components are finite numbers.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }

    /// Returns true if the coordinate is finite and within range.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Collision key rounded to 6 decimal places (~0.1 m).
    pub fn bucket_key(&self) -> String {
        format!("{:.6},{:.6}", self.latitude, self.longitude)
    }

    #[inline]
    pub(crate) fn to_radians(&self) -> (f64, f64) {
        (self.latitude.to_radians(), self.longitude.to_radians())
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self::new(lat, lng)
    }
}
