//! Rectangular latitude/longitude regions.

use crate::Coordinate;
use serde::{Deserialize, Serialize};

/// An axis-aligned latitude/longitude box. Containment is inclusive on all edges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Northern latitude limit
    pub north: f64,
    /// Southern latitude limit
    pub south: f64,
    /// Eastern longitude limit
    pub east: f64,
    /// Western longitude limit
    pub west: f64,
}

/// Approximate bounding box of India, the only supported service area.
pub const INDIA_BOUNDS: BoundingBox = BoundingBox {
    north: 37.1, // Jammu and Kashmir
    south: 6.4,  // Tamil Nadu
    east: 97.4,  // Arunachal Pradesh
    west: 68.1,  // Gujarat
};

/// Geographic center of India, used when a map has nothing better to center on.
pub const INDIA_CENTROID: Coordinate = Coordinate::new(20.5937, 78.9629);

impl BoundingBox {
    /// Returns true if the point lies inside the box or on its edge.
    /// Non-finite input is never contained.
    #[inline]
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        latitude >= self.south
            && latitude <= self.north
            && longitude >= self.west
            && longitude <= self.east
    }

    /// Coordinate form of [`BoundingBox::contains`].
    #[inline]
    pub fn contains_coordinate(&self, coord: &Coordinate) -> bool {
        self.contains(coord.latitude, coord.longitude)
    }
}

/// Inclusive test against [`INDIA_BOUNDS`].
///
/// # Example
/// ```
/// use bloodconnect_geo::is_within_india_bounds;
///
/// assert!(is_within_india_bounds(28.6, 77.2)); // Delhi
/// assert!(!is_within_india_bounds(51.5, -0.12)); // London
/// ```
#[inline]
pub fn is_within_india_bounds(latitude: f64, longitude: f64) -> bool {
    INDIA_BOUNDS.contains(latitude, longitude)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delhi_inside() {
        assert!(is_within_india_bounds(28.6, 77.2));
    }

    #[test]
    fn test_london_outside() {
        assert!(!is_within_india_bounds(51.5, -0.12));
    }

    #[test]
    fn test_edges_are_inclusive() {
        assert!(is_within_india_bounds(37.1, 97.4));
        assert!(is_within_india_bounds(6.4, 68.1));
        assert!(!is_within_india_bounds(37.100_001, 80.0));
        assert!(!is_within_india_bounds(20.0, 68.099_999));
    }

    #[test]
    fn test_nan_is_outside() {
        assert!(!is_within_india_bounds(f64::NAN, 77.2));
        assert!(!INDIA_BOUNDS.contains_coordinate(&Coordinate::new(28.6, f64::NAN)));
    }

    #[test]
    fn test_centroid_inside() {
        assert!(INDIA_BOUNDS.contains_coordinate(&INDIA_CENTROID));
    }
}
