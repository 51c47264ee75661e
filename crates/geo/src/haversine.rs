//! Great-circle distance and point projection.
//!
//! The Haversine formula gives the great-circle distance between two points
//! on a sphere given their longitudes and latitudes. [`destination_point`]
//! goes the other way: start point, distance and bearing in, end point out.

use crate::Coordinate;

/// Earth's mean radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Earth's mean radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Earth's equatorial radius in meters, used for marker projection.
pub const EARTH_EQUATORIAL_RADIUS_M: f64 = 6_378_137.0;

/// Calculates the great-circle distance between two coordinates in kilometers.
///
/// Symmetric in its arguments and zero for identical points.
///
/// # Example
/// ```
/// use bloodconnect_geo::{haversine_km, Coordinate};
///
/// let hyderabad = Coordinate::new(17.3850, 78.4867);
/// let bengaluru = Coordinate::new(12.9716, 77.5946);
///
/// let distance = haversine_km(&hyderabad, &bengaluru);
/// assert!((distance - 500.0).abs() < 10.0);
/// ```
#[inline]
pub fn haversine_km(from: &Coordinate, to: &Coordinate) -> f64 {
    haversine_with_radius(from, to, EARTH_RADIUS_KM)
}

/// Calculates the great-circle distance between two coordinates in meters.
#[inline]
pub fn haversine_meters(from: &Coordinate, to: &Coordinate) -> f64 {
    haversine_with_radius(from, to, EARTH_RADIUS_M)
}

#[inline]
fn haversine_with_radius(from: &Coordinate, to: &Coordinate, radius: f64) -> f64 {
    let (lat1, lon1) = from.to_radians();
    let (lat2, lon2) = to.to_radians();

    let d_lat = lat2 - lat1;
    let d_lon = lon2 - lon1;

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    // Rounding can push `a` just past 1 for antipodal points
    let a = a.clamp(0.0, 1.0);

    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    radius * c
}

/// Projects a point `distance_m` meters away from `origin` along `bearing_deg`
/// (clockwise from north).
///
/// Uses the equatorial radius. Only marker nudging relies on this, where
/// visual separation matters more than exactness.
///
/// # Example
/// ```
/// use bloodconnect_geo::{destination_point, haversine_meters, Coordinate};
///
/// let origin = Coordinate::new(17.4948, 78.3996);
/// let nudged = destination_point(&origin, 8.0, 90.0);
///
/// assert!(nudged.longitude > origin.longitude);
/// assert!((haversine_meters(&origin, &nudged) - 8.0).abs() < 0.1);
/// ```
pub fn destination_point(origin: &Coordinate, distance_m: f64, bearing_deg: f64) -> Coordinate {
    let angular = distance_m / EARTH_EQUATORIAL_RADIUS_M;
    let bearing = bearing_deg.to_radians();
    let (lat1, lon1) = origin.to_radians();

    let lat2 = (lat1.sin() * angular.cos() + lat1.cos() * angular.sin() * bearing.cos()).asin();
    let lon2 = lon1
        + (bearing.sin() * angular.sin() * lat1.cos())
            .atan2(angular.cos() - lat1.sin() * lat2.sin());

    Coordinate::new(lat2.to_degrees(), lon2.to_degrees())
}
