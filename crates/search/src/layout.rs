//! Map marker placement.
//!
//! Donors often share a village-level coordinate. Markers that would land on
//! the same spot are fanned out around it so each stays clickable.

use crate::engine::RankedResult;
use bloodconnect_geo::{destination_point, Coordinate, INDIA_CENTROID};
use serde::Serialize;
use std::collections::HashMap;

/// Offsets per ring before the radius grows.
const RING_SIZE: usize = 8;

/// Radius step between rings, in meters.
const RING_STEP_M: f64 = 8.0;

/// Angle between neighbours on a ring, in degrees.
const BEARING_STEP_DEG: usize = 45;

/// Where to draw one result's marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerPlacement {
    /// Render position, possibly offset from the donor's coordinate
    pub coordinate: Coordinate,
    /// Donor id
    pub source_id: String,
}

/// Offset for the `n`th repeat in a bucket (`n >= 1`): bearing and radius.
fn fan_offset(n: usize) -> (f64, f64) {
    let bearing = ((n * BEARING_STEP_DEG) % 360) as f64;
    let radius = RING_STEP_M * ((n / RING_SIZE) + 1) as f64;
    (bearing, radius)
}

/// Computes marker positions, skipping results without a finite coordinate.
///
/// The first result in a ~0.1 m bucket keeps its coordinate; later ones are
/// pushed out on 45° spokes, 8 m per ring of eight. Same input order gives the
/// same layout.
pub fn layout(results: &[RankedResult]) -> Vec<MarkerPlacement> {
    let mut seen: HashMap<String, usize> = HashMap::new();

    results
        .iter()
        .filter_map(|result| {
            let original = result.donor.finite_coordinate()?;
            let count = seen.entry(original.bucket_key()).or_insert(0);
            let coordinate = if *count == 0 {
                original
            } else {
                let (bearing, radius) = fan_offset(*count);
                destination_point(&original, radius, bearing)
            };
            *count += 1;

            Some(MarkerPlacement {
                coordinate,
                source_id: result.donor.id.clone(),
            })
        })
        .collect()
}

/// Initial map center: the search center, else the first marker, else the
/// middle of India.
pub fn map_center(center: Option<Coordinate>, placements: &[MarkerPlacement]) -> Coordinate {
    center
        .filter(Coordinate::is_finite)
        .or_else(|| placements.first().map(|p| p.coordinate))
        .unwrap_or(INDIA_CENTROID)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::donor::DonorRecord;
    use bloodconnect_geo::haversine_meters;
    use proptest::prelude::*;

    fn ranked(id: &str, coordinate: Option<Coordinate>) -> RankedResult {
        let mut donor = DonorRecord::new(id, "O+", "Bachupally");
        donor.coordinate = coordinate;
        RankedResult { donor, distance_km: 1.0 }
    }

    #[test]
    fn test_shared_coordinate_is_separated() {
        let spot = Coordinate::new(17.5453, 78.3670);
        let placements = layout(&[ranked("a", Some(spot)), ranked("b", Some(spot))]);

        assert_eq!(placements.len(), 2);
        assert_eq!(placements[0].coordinate, spot);
        assert_ne!(placements[0].coordinate, placements[1].coordinate);
        for placement in &placements {
            assert!(haversine_meters(&spot, &placement.coordinate) <= 50.0);
        }
        let offset = haversine_meters(&spot, &placements[1].coordinate);
        assert!((offset - 8.0).abs() < 0.1, "offset was {offset}");
    }

    #[test]
    fn test_ring_grows_every_eight() {
        assert_eq!(fan_offset(1), (45.0, 8.0));
        assert_eq!(fan_offset(7), (315.0, 8.0));
        assert_eq!(fan_offset(8), (0.0, 16.0));
        assert_eq!(fan_offset(17), (45.0, 24.0));
    }

    #[test]
    fn test_distinct_coordinates_untouched() {
        let a = Coordinate::new(17.0, 78.0);
        let b = Coordinate::new(17.1, 78.1);
        let placements = layout(&[ranked("a", Some(a)), ranked("b", Some(b))]);
        assert_eq!(placements[0].coordinate, a);
        assert_eq!(placements[1].coordinate, b);
    }

    #[test]
    fn test_missing_or_non_finite_coordinates_skipped() {
        let placements = layout(&[
            ranked("none", None),
            ranked("nan", Some(Coordinate::new(f64::NAN, 78.0))),
            ranked("ok", Some(Coordinate::new(17.0, 78.0))),
        ]);
        assert_eq!(placements.len(), 1);
        assert_eq!(placements[0].source_id, "ok");
    }

    #[test]
    fn test_map_center_fallbacks() {
        let center = Coordinate::new(17.3850, 78.4867);
        let marker = MarkerPlacement {
            coordinate: Coordinate::new(16.3, 80.4),
            source_id: "d".to_string(),
        };
        assert_eq!(map_center(Some(center), &[marker.clone()]), center);
        assert_eq!(map_center(None, &[marker.clone()]), marker.coordinate);
        assert_eq!(map_center(None, &[]), INDIA_CENTROID);
    }

    proptest! {
        #[test]
        fn prop_stacked_markers_are_distinct_and_close(
            lat in 8.0f64..36.0,
            lng in 69.0f64..96.0,
            count in 2usize..8,
        ) {
            let spot = Coordinate::new(lat, lng);
            let results: Vec<RankedResult> = (0..count)
                .map(|i| ranked(&format!("d{i}"), Some(spot)))
                .collect();
            let placements = layout(&results);

            prop_assert_eq!(placements.len(), count);
            for (i, a) in placements.iter().enumerate() {
                prop_assert!(haversine_meters(&spot, &a.coordinate) <= 50.0);
                for b in placements.iter().skip(i + 1) {
                    prop_assert!(haversine_meters(&a.coordinate, &b.coordinate) > 1.0);
                }
            }
        }
    }
}
