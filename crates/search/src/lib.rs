//! Donor proximity search for BloodConnect.
//!
//! This crate provides:
//! - The donor record model, tolerant of how the profile store writes it
//! - Proximity search: center resolution, filtering, backfill, ranking
//! - Best-effort location enrichment for profiles and donors
//! - Marker layout for donors sharing a coordinate
//!
//! # Example
//!
//! ```rust,no_run
//! use bloodconnect_geocoder::DefaultGeocoder;
//! use bloodconnect_search::{layout, DonorRecord, ProximitySearch, SearchQuery};
//!
//! # async fn run(pool: Vec<DonorRecord>) -> Result<(), Box<dyn std::error::Error>> {
//! let search = ProximitySearch::new(DefaultGeocoder::from_env()?);
//! let query = SearchQuery::new().with_blood_type("O+").with_location_text("Kukatpally, Hyderabad");
//!
//! let results = search.search(&query, &pool).await?;
//! for result in &results {
//!     println!("{} {}", result.donor.id, result.distance_label());
//! }
//! let markers = layout(&results);
//! # let _ = markers;
//! # Ok(())
//! # }
//! ```

mod donor;
mod engine;
mod enrich;
mod error;
mod layout;
mod query;

#[cfg(test)]
mod testing;

pub use donor::{Availability, DonorRecord};
pub use engine::{matches_center_state, ProximitySearch, RankedResult, SearchCenter, SearchOutcome};
pub use enrich::{
    backfill_all, backfill_coordinate, prepare_profile_location, resolve_location_input, ProfileLocation,
    ResolvedLocation, DEFAULT_BACKFILL_CONCURRENCY,
};
pub use error::{Result, SearchError, SearchErrorCode};
pub use layout::{layout, map_center, MarkerPlacement};
pub use query::SearchQuery;
