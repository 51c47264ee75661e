//! Proximity search over a donor pool.

use crate::donor::DonorRecord;
use crate::enrich::{backfill_all, DEFAULT_BACKFILL_CONCURRENCY};
use crate::error::{Result, SearchError};
use crate::query::SearchQuery;
use bloodconnect_geo::{haversine_km, BoundingBox, Coordinate, INDIA_BOUNDS};
use bloodconnect_geocoder::Geocode;
use bloodconnect_telemetry::{metrics, Timer};
use serde::Serialize;
use tracing::{debug, info, instrument};

/// Where a search is centered.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchCenter {
    /// Center point, inside the service area
    pub coordinate: Coordinate,
    /// State of the center; `None` disables the same-state filter
    pub state: Option<String>,
    /// Provider label when the center came from location text
    pub formatted_location: Option<String>,
}

/// A donor with its distance from the search center.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedResult {
    /// The donor, with any backfilled coordinate
    pub donor: DonorRecord,
    /// Great-circle distance; infinite when the donor has no coordinate
    pub distance_km: f64,
}

impl RankedResult {
    /// Distance for display: `"3.2 km"`, or `"—"` when unknown.
    pub fn distance_label(&self) -> String {
        if self.distance_km.is_finite() {
            format!("{:.1} km", self.distance_km)
        } else {
            "—".to_string()
        }
    }
}

/// Ranked results together with the resolved center.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchOutcome {
    /// Resolved center
    pub center: SearchCenter,
    /// Nearest first
    pub results: Vec<RankedResult>,
}

/// Same-state heuristic.
///
/// Passes when the center state is unknown, when the donor's location mentions
/// it (case-insensitive), or when the donor's location does not mention
/// "india" and so probably carries no state token at all.
pub fn matches_center_state(center_state: Option<&str>, donor_location: &str) -> bool {
    let Some(state) = center_state.map(str::trim).filter(|s| !s.is_empty()) else {
        return true;
    };
    let location = donor_location.to_lowercase();
    location.contains(&state.to_lowercase()) || !location.contains("india")
}

/// Finds available donors near a center, nearest first.
pub struct ProximitySearch<G> {
    geocoder: G,
    service_area: BoundingBox,
    backfill_concurrency: usize,
}

impl<G: Geocode> ProximitySearch<G> {
    /// Creates a search scoped to India.
    pub fn new(geocoder: G) -> Self {
        Self {
            geocoder,
            service_area: INDIA_BOUNDS,
            backfill_concurrency: DEFAULT_BACKFILL_CONCURRENCY,
        }
    }

    /// Replaces the service area.
    #[must_use]
    pub fn with_service_area(mut self, service_area: BoundingBox) -> Self {
        self.service_area = service_area;
        self
    }

    /// Caps concurrent backfill lookups (minimum 1).
    #[must_use]
    pub fn with_backfill_concurrency(mut self, concurrency: usize) -> Self {
        self.backfill_concurrency = concurrency.max(1);
        self
    }

    /// The geocoder used for centers and backfills.
    pub fn geocoder(&self) -> &G {
        &self.geocoder
    }

    /// Ranked results only.
    pub async fn search(&self, query: &SearchQuery, donor_pool: &[DonorRecord]) -> Result<Vec<RankedResult>> {
        Ok(self.search_with_center(query, donor_pool).await?.results)
    }

    /// Resolves the center, filters the pool, backfills missing coordinates
    /// and ranks by distance. Ties keep pool order.
    #[instrument(skip_all, fields(pool = donor_pool.len(), blood_types = ?query.blood_types))]
    pub async fn search_with_center(&self, query: &SearchQuery, donor_pool: &[DonorRecord]) -> Result<SearchOutcome> {
        let timer = Timer::start("search.duration_ms");
        let center = self.resolve_center(query).await?;

        let candidates: Vec<&DonorRecord> = donor_pool
            .iter()
            .filter(|donor| donor.is_available() && query.accepts_blood_type(&donor.blood_type))
            .collect();
        debug!(candidates = candidates.len(), "Type and availability filter applied");

        let enriched = backfill_all(&self.geocoder, candidates, self.backfill_concurrency).await;

        let mut results: Vec<RankedResult> = enriched
            .into_iter()
            .filter_map(|donor| self.rank(&center, donor))
            .collect();
        results.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));

        if let Some(limit) = query.max_results {
            results.truncate(limit);
        }

        metrics().increment("search.completed");
        metrics().histogram("search.results", results.len() as f64);
        let elapsed = timer.stop();
        info!(
            results = results.len(),
            center_state = center.state.as_deref().unwrap_or(""),
            duration_ms = elapsed.as_millis() as u64,
            "Search completed"
        );

        Ok(SearchOutcome { center, results })
    }

    /// Explicit coordinate first, then location text.
    async fn resolve_center(&self, query: &SearchQuery) -> Result<SearchCenter> {
        if let Some(coordinate) = query.explicit_coordinate {
            if !coordinate.is_finite() {
                return Err(SearchError::CenterUnresolved);
            }
            self.ensure_in_service_area(&coordinate)?;

            let state = match self.geocoder.reverse_geocode(coordinate).await {
                Ok(place) => place.state,
                Err(e) => {
                    debug!(error = %e, "Center state unknown, same-state filter disabled");
                    None
                }
            };
            return Ok(SearchCenter {
                coordinate,
                state,
                formatted_location: None,
            });
        }

        let text = query.trimmed_location().ok_or(SearchError::CenterUnresolved)?;
        let place = self.geocoder.geocode_address(text).await?;
        self.ensure_in_service_area(&place.coordinate)?;

        Ok(SearchCenter {
            coordinate: place.coordinate,
            state: place.state,
            formatted_location: Some(place.formatted_location),
        })
    }

    fn ensure_in_service_area(&self, coordinate: &Coordinate) -> Result<()> {
        if self.service_area.contains_coordinate(coordinate) {
            Ok(())
        } else {
            metrics().increment("search.out_of_area");
            Err(SearchError::OutOfServiceArea {
                latitude: coordinate.latitude,
                longitude: coordinate.longitude,
            })
        }
    }

    /// Applies the area and state filters and computes the distance.
    fn rank(&self, center: &SearchCenter, donor: DonorRecord) -> Option<RankedResult> {
        let coordinate = donor.finite_coordinate();
        if let Some(point) = coordinate {
            if !self.service_area.contains_coordinate(&point) {
                debug!(donor_id = %donor.id, "Donor outside service area");
                return None;
            }
        }
        if !matches_center_state(center.state.as_deref(), &donor.location) {
            return None;
        }

        let distance_km = coordinate.map_or(f64::INFINITY, |point| haversine_km(&center.coordinate, &point));
        Some(RankedResult { donor, distance_km })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::donor::Availability;
    use crate::error::SearchErrorCode;
    use crate::testing::FakeGeocoder;

    fn hyderabad() -> FakeGeocoder {
        FakeGeocoder::new()
            .with_place("Hyderabad", 17.3850, 78.4867, Some("Telangana"))
            .with_place("London", 51.5074, -0.1278, Some("England"))
            .with_place("Bachupally", 17.5453, 78.3670, Some("Telangana"))
    }

    fn pool() -> Vec<DonorRecord> {
        vec![
            DonorRecord::new("far", "O+", "Warangal, Telangana, India")
                .with_coordinate(Coordinate::new(17.9689, 79.5941)),
            DonorRecord::new("near", "O+", "Ameerpet, Hyderabad, Telangana")
                .with_coordinate(Coordinate::new(17.4375, 78.4483)),
            DonorRecord::new("a-pos", "A+", "Kukatpally, Hyderabad")
                .with_coordinate(Coordinate::new(17.4948, 78.3996)),
        ]
    }

    #[test]
    fn test_blood_type_filter_keeps_one() {
        let search = ProximitySearch::new(hyderabad());
        let donors = vec![
            DonorRecord::new("o", "O+", "Ameerpet").with_coordinate(Coordinate::new(17.4375, 78.4483)),
            DonorRecord::new("a", "A+", "Ameerpet").with_coordinate(Coordinate::new(17.4375, 78.4483)),
        ];
        let query = SearchQuery::new().with_blood_type("O+").with_location_text("Hyderabad");

        let results = tokio_test::block_on(search.search(&query, &donors)).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].donor.id, "o");
    }

    #[test]
    fn test_results_sorted_nearest_first() {
        let search = ProximitySearch::new(hyderabad());
        let query = SearchQuery::new().with_location_text("Hyderabad");

        let results = tokio_test::block_on(search.search(&query, &pool())).unwrap();
        let ids: Vec<&str> = results.iter().map(|r| r.donor.id.as_str()).collect();
        assert_eq!(ids, ["near", "a-pos", "far"]);
        assert!(results.windows(2).all(|w| w[0].distance_km <= w[1].distance_km));
    }

    #[test]
    fn test_explicit_center_outside_india_is_rejected() {
        let geocoder = hyderabad().with_reverse_state("England");
        let search = ProximitySearch::new(geocoder);
        let query = SearchQuery::new().with_coordinate(Coordinate::new(51.5, -0.12));

        let err = tokio_test::block_on(search.search(&query, &pool())).unwrap_err();
        assert_eq!(err.code(), SearchErrorCode::OutOfServiceArea);
        assert_eq!(search.geocoder().reverse_calls(), 0);
    }

    #[test]
    fn test_geocoded_center_outside_india_is_rejected() {
        let search = ProximitySearch::new(hyderabad());
        let query = SearchQuery::new().with_location_text("London");

        let err = tokio_test::block_on(search.search(&query, &pool())).unwrap_err();
        assert!(matches!(err, SearchError::OutOfServiceArea { .. }));
    }

    #[test]
    fn test_no_center_is_unresolved() {
        let search = ProximitySearch::new(hyderabad());
        let err = tokio_test::block_on(search.search(&SearchQuery::new().with_location_text("  "), &pool()))
            .unwrap_err();
        assert!(matches!(err, SearchError::CenterUnresolved));
    }

    #[test]
    fn test_unknown_location_text_is_geocode_error() {
        let search = ProximitySearch::new(hyderabad());
        let query = SearchQuery::new().with_location_text("Atlantis");
        let err = tokio_test::block_on(search.search(&query, &pool())).unwrap_err();
        assert_eq!(err.code(), SearchErrorCode::NotFound);
    }

    #[test]
    fn test_explicit_center_learns_state_by_reverse_geocode() {
        let search = ProximitySearch::new(hyderabad().with_reverse_state("Andhra Pradesh"));
        let donors = vec![
            DonorRecord::new("ts", "B+", "Ameerpet, Hyderabad, Telangana, India")
                .with_coordinate(Coordinate::new(17.4375, 78.4483)),
            DonorRecord::new("ap", "B+", "Guntur, Andhra Pradesh, India")
                .with_coordinate(Coordinate::new(16.3067, 80.4365)),
        ];
        let query = SearchQuery::new().with_coordinate(Coordinate::new(16.5062, 80.6480));

        let outcome = tokio_test::block_on(search.search_with_center(&query, &donors)).unwrap();
        assert_eq!(outcome.center.state.as_deref(), Some("Andhra Pradesh"));
        assert_eq!(outcome.results.len(), 1);
        assert_eq!(outcome.results[0].donor.id, "ap");
    }

    #[test]
    fn test_failed_reverse_disables_state_filter() {
        let search = ProximitySearch::new(hyderabad());
        let donors = vec![
            DonorRecord::new("ap", "B+", "Guntur, Andhra Pradesh, India")
                .with_coordinate(Coordinate::new(16.3067, 80.4365)),
        ];
        let query = SearchQuery::new().with_coordinate(Coordinate::new(17.3850, 78.4867));

        let outcome = tokio_test::block_on(search.search_with_center(&query, &donors)).unwrap();
        assert_eq!(outcome.center.state, None);
        assert_eq!(outcome.results.len(), 1);
    }

    #[test]
    fn test_unavailable_and_foreign_donors_are_excluded() {
        let search = ProximitySearch::new(hyderabad());
        let donors = vec![
            DonorRecord::new("away", "O+", "Ameerpet")
                .with_coordinate(Coordinate::new(17.4375, 78.4483))
                .with_availability(Availability::Unavailable),
            DonorRecord::new("abroad", "O+", "Dubai").with_coordinate(Coordinate::new(25.2048, 55.2708)),
            DonorRecord::new("home", "O+", "Ameerpet").with_coordinate(Coordinate::new(17.4375, 78.4483)),
        ];
        let query = SearchQuery::new().with_location_text("Hyderabad");

        let results = tokio_test::block_on(search.search(&query, &donors)).unwrap();
        let ids: Vec<&str> = results.iter().map(|r| r.donor.id.as_str()).collect();
        assert_eq!(ids, ["home"]);
    }

    #[test]
    fn test_backfill_and_unresolvable_donors() {
        let search = ProximitySearch::new(hyderabad());
        let donors = vec![
            DonorRecord::new("lost", "O+", "Unmapped Hamlet"),
            DonorRecord::new("typed", "O+", "Bachupally"),
        ];
        let query = SearchQuery::new().with_location_text("Hyderabad");

        let results = tokio_test::block_on(search.search(&query, &donors)).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].donor.id, "typed");
        assert!(results[0].donor.coordinate.is_some());
        assert_eq!(results[1].donor.id, "lost");
        assert!(results[1].distance_km.is_infinite());
        assert_eq!(results[1].distance_label(), "—");
    }

    #[test]
    fn test_equal_distances_keep_pool_order() {
        let search = ProximitySearch::new(hyderabad());
        let spot = Coordinate::new(17.4375, 78.4483);
        let donors: Vec<DonorRecord> = (0..5)
            .map(|i| DonorRecord::new(format!("d{i}"), "O+", "Ameerpet").with_coordinate(spot))
            .collect();
        let query = SearchQuery::new().with_location_text("Hyderabad");

        let results = tokio_test::block_on(search.search(&query, &donors)).unwrap();
        let ids: Vec<&str> = results.iter().map(|r| r.donor.id.as_str()).collect();
        assert_eq!(ids, ["d0", "d1", "d2", "d3", "d4"]);
    }

    #[test]
    fn test_max_results_truncates_after_sort() {
        let search = ProximitySearch::new(hyderabad());
        let query = SearchQuery::new().with_location_text("Hyderabad").with_max_results(1);

        let outcome = tokio_test::block_on(search.search_with_center(&query, &pool())).unwrap();
        assert_eq!(outcome.results.len(), 1);
        assert_eq!(outcome.results[0].donor.id, "near");
        assert_eq!(outcome.center.formatted_location.as_deref(), Some("Hyderabad, Telangana"));
    }

    #[test]
    fn test_custom_service_area() {
        let sri_lanka = BoundingBox {
            north: 9.9,
            south: 5.9,
            east: 81.9,
            west: 79.6,
        };
        let geocoder = hyderabad().with_place("Colombo", 6.9271, 79.8612, Some("Western Province"));
        let search = ProximitySearch::new(geocoder)
            .with_service_area(sri_lanka)
            .with_backfill_concurrency(1);
        let donors = vec![
            DonorRecord::new("col", "O+", "Kollupitiya, Colombo").with_coordinate(Coordinate::new(6.9117, 79.8490)),
            DonorRecord::new("hyd", "O+", "Ameerpet, Hyderabad").with_coordinate(Coordinate::new(17.4375, 78.4483)),
        ];

        let results = tokio_test::block_on(search.search(&SearchQuery::new().with_location_text("Colombo"), &donors))
            .unwrap();
        let ids: Vec<&str> = results.iter().map(|r| r.donor.id.as_str()).collect();
        assert_eq!(ids, ["col"]);

        let err = tokio_test::block_on(search.search(&SearchQuery::new().with_location_text("Hyderabad"), &donors))
            .unwrap_err();
        assert_eq!(err.code(), SearchErrorCode::OutOfServiceArea);
    }

    #[test]
    fn test_state_heuristic() {
        assert!(matches_center_state(None, "Anything, India"));
        assert!(matches_center_state(Some(""), "Anything, India"));
        assert!(matches_center_state(Some("Telangana"), "Ameerpet, Hyderabad, TELANGANA, India"));
        assert!(!matches_center_state(Some("Telangana"), "Guntur, Andhra Pradesh, India"));
        // No "india" token: state presence cannot be judged
        assert!(matches_center_state(Some("Telangana"), "Guntur"));
    }

    #[test]
    fn test_distance_label() {
        let result = RankedResult {
            donor: DonorRecord::new("d", "O+", ""),
            distance_km: 3.24,
        };
        assert_eq!(result.distance_label(), "3.2 km");
    }
}
