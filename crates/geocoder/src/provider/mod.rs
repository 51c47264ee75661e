//! Geocoding provider backends.
//!
//! Every backend implements [`AddressProvider`]; the [`crate::Geocoder`] tries
//! a primary then a secondary backend in fixed order.

mod google;
mod nominatim;

pub use google::{GoogleProvider, GoogleResponse};
pub use nominatim::{NominatimHit, NominatimPlace, NominatimProvider};

use crate::config::GeocoderConfig;
use crate::error::{GeocodeError, Result};
use crate::GeocodeResult;
use bloodconnect_geo::Coordinate;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE};
use reqwest::Client;
use std::fmt;
use std::future::Future;

/// Which backend produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Google Maps Geocoding API
    Google,
    /// OpenStreetMap Nominatim
    Nominatim,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Google => f.write_str("google"),
            Self::Nominatim => f.write_str("nominatim"),
        }
    }
}

/// A forward/reverse geocoding backend.
///
/// Implementations normalize their own address payload before returning, so
/// callers only ever see [`GeocodeResult`].
pub trait AddressProvider: Send + Sync {
    /// Backend identity, for logs and results
    fn kind(&self) -> ProviderKind;

    /// Whether the backend can be called at all (e.g. has credentials)
    fn is_available(&self) -> bool {
        true
    }

    /// Resolve free text. `region` overrides the configured country restriction.
    fn forward(
        &self,
        address: &str,
        region: Option<&str>,
    ) -> impl Future<Output = Result<GeocodeResult>> + Send;

    /// Resolve a point to its administrative location.
    fn reverse(&self, coordinate: Coordinate) -> impl Future<Output = Result<GeocodeResult>> + Send;
}

/// Builds the HTTP client shared by both backends.
pub(crate) fn http_client(config: &GeocoderConfig) -> Result<Client> {
    let mut default_headers = HeaderMap::new();
    let language = HeaderValue::from_str(&config.language)
        .map_err(|_| GeocodeError::config(format!("invalid language: {}", config.language)))?;
    default_headers.insert(ACCEPT_LANGUAGE, language);

    Client::builder()
        .timeout(config.timeout)
        .user_agent(config.user_agent.clone())
        .default_headers(default_headers)
        .build()
        .map_err(|e| GeocodeError::config(format!("failed to build HTTP client: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_kind_display() {
        assert_eq!(ProviderKind::Google.to_string(), "google");
        assert_eq!(ProviderKind::Nominatim.to_string(), "nominatim");
    }

    #[test]
    fn test_http_client_builds_from_defaults() {
        assert!(http_client(&GeocoderConfig::default()).is_ok());
    }
}
