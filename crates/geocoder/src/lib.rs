//! India-scoped geocoding for BloodConnect
//!
//! Resolves free-text addresses and GPS points to a normalized
//! `village/city, district, state` label plus coordinates.
//!
//! # Features
//!
//! - **Provider fallback**: Google Geocoding first, OpenStreetMap Nominatim second
//! - **Address normalization**: one canonical tuple out of each provider's schema
//! - **Country restriction**: forward lookups are limited to the configured region
//! - **Environment/TOML configuration**: keys and endpoints without code changes
//!
//! # Example
//!
//! ```rust,no_run
//! use bloodconnect_geocoder::{DefaultGeocoder, GeocoderConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let geocoder = DefaultGeocoder::from_config(&GeocoderConfig::from_env()?)?;
//!
//!     let place = geocoder.forward("Kukatpally, Hyderabad").await?;
//!     println!("{} -> {:?}", place.formatted_location, place.coordinate);
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod address;
pub mod config;
pub mod error;
mod geocoder;
pub mod provider;

pub use address::{format, normalize_manual_string, parse_provider_components, AddressParts};
pub use config::GeocoderConfig;
pub use error::{GeocodeError, Result};
pub use geocoder::{DefaultGeocoder, Geocode, GeocodeResult, Geocoder};
pub use provider::{AddressProvider, GoogleProvider, NominatimProvider, ProviderKind};

/// Label for a device position that could not be reverse geocoded.
///
/// # Example
/// ```
/// use bloodconnect_geo::Coordinate;
/// use bloodconnect_geocoder::fallback_location_label;
///
/// assert_eq!(fallback_location_label(&Coordinate::new(17.49481, 78.39962)), "17.4948, 78.3996");
/// ```
pub fn fallback_location_label(coordinate: &bloodconnect_geo::Coordinate) -> String {
    format!("{:.4}, {:.4}", coordinate.latitude, coordinate.longitude)
}
