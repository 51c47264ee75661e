//! Best-effort location enrichment.
//!
//! None of these functions fail: a geocoding miss leaves the record or input
//! as it was. Records are never mutated in place; callers get new values.

use crate::donor::DonorRecord;
use bloodconnect_geo::Coordinate;
use bloodconnect_geocoder::{normalize_manual_string, Geocode};
use bloodconnect_telemetry::metrics;
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Returns a copy of `donor` with a coordinate geocoded from its location text.
///
/// Idempotent: a donor that already has a finite coordinate, or has no
/// location text, comes back unchanged without a geocoder call.
pub async fn backfill_coordinate<G: Geocode>(geocoder: &G, donor: &DonorRecord) -> DonorRecord {
    let mut enriched = donor.clone();
    if donor.finite_coordinate().is_some() || donor.location.trim().is_empty() {
        return enriched;
    }

    match geocoder.geocode_address(&donor.location).await {
        Ok(place) if place.coordinate.is_finite() => {
            debug!(donor_id = %donor.id, provider = %place.provider, "Backfilled donor coordinate");
            metrics().increment("search.backfill.resolved");
            enriched.coordinate = Some(place.coordinate);
        }
        Ok(_) => {
            debug!(donor_id = %donor.id, "Geocoder returned a non-finite coordinate");
            metrics().increment("search.backfill.missed");
        }
        Err(e) => {
            debug!(donor_id = %donor.id, error = %e, "Coordinate backfill failed");
            metrics().increment("search.backfill.missed");
        }
    }
    enriched
}

/// Backfill lookups in flight at once. A Nominatim forward lookup costs two
/// requests, and the public instance rate-limits.
pub const DEFAULT_BACKFILL_CONCURRENCY: usize = 4;

/// Backfills every donor on the calling task, with at most `concurrency`
/// lookups in flight. Output order matches input order.
pub async fn backfill_all<'a, G, I>(geocoder: &G, donors: I, concurrency: usize) -> Vec<DonorRecord>
where
    G: Geocode,
    I: IntoIterator<Item = &'a DonorRecord>,
{
    stream::iter(donors)
        .map(|donor| backfill_coordinate(geocoder, donor))
        .buffered(concurrency.max(1))
        .collect()
        .await
}

/// Typed location input after an attempt to geocode it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedLocation {
    /// Resolved point; `None` when geocoding failed
    pub coordinate: Option<Coordinate>,
    /// Provider-formatted location, or the manually normalized text
    pub display_text: String,
    /// State reported by the provider
    pub state: Option<String>,
}

/// Geocodes a typed location, falling back to manual normalization.
pub async fn resolve_location_input<G: Geocode>(geocoder: &G, text: &str) -> ResolvedLocation {
    match geocoder.geocode_address(text).await {
        Ok(place) => ResolvedLocation {
            coordinate: Some(place.coordinate),
            display_text: place.formatted_location,
            state: place.state,
        },
        Err(e) => {
            debug!(error = %e, "Location input not geocoded, normalizing by hand");
            ResolvedLocation {
                coordinate: None,
                display_text: normalize_manual_string(text),
                state: None,
            }
        }
    }
}

/// Location fields of a profile about to be saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileLocation {
    /// The text exactly as the user entered it
    pub location: String,
    /// Pin for the map, if one could be found
    pub coordinate: Option<Coordinate>,
    /// State, if one could be found
    pub state: Option<String>,
}

/// Fills in a profile's coordinate and state before saving.
///
/// Without a coordinate the typed text is geocoded. A coordinate with no known
/// state is reverse geocoded for one, but only when the typed text is blank or
/// has no comma; text like "Ameerpet, Hyderabad" already names its region.
/// Failures are tolerated and the profile is saved with whatever was found.
/// The typed text is never rewritten.
pub async fn prepare_profile_location<G: Geocode>(
    geocoder: &G,
    location_text: &str,
    coordinate: Option<Coordinate>,
) -> ProfileLocation {
    let mut prepared = ProfileLocation {
        location: location_text.to_string(),
        coordinate: coordinate.filter(Coordinate::is_finite),
        state: None,
    };

    if prepared.coordinate.is_none() && !location_text.trim().is_empty() {
        match geocoder.geocode_address(location_text).await {
            Ok(place) => {
                prepared.coordinate = Some(place.coordinate);
                prepared.state = place.state;
            }
            Err(e) => debug!(error = %e, "Saving profile without a map pin"),
        }
    }

    let needs_state = prepared.state.is_none() && !location_text.contains(',');
    if let (Some(point), true) = (prepared.coordinate, needs_state) {
        match geocoder.reverse_geocode(point).await {
            Ok(place) => prepared.state = place.state,
            Err(e) => debug!(error = %e, "State lookup for profile failed"),
        }
    }

    prepared
}
