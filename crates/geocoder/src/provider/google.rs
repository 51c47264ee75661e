//! Google Maps Geocoding API backend.

use super::{http_client, AddressProvider, ProviderKind};
use crate::address::{self, AddressComponent};
use crate::config::GeocoderConfig;
use crate::error::{GeocodeError, Result};
use crate::GeocodeResult;
use bloodconnect_geo::Coordinate;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

/// Geocoding API response envelope.
#[derive(Debug, Deserialize)]
#[allow(missing_docs)]
pub struct GoogleResponse {
    pub status: String,
    #[serde(default)]
    pub results: Vec<GoogleResult>,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[allow(missing_docs)]
pub struct GoogleResult {
    #[serde(default)]
    pub address_components: Vec<AddressComponent>,
    #[serde(default)]
    pub formatted_address: String,
    pub geometry: GoogleGeometry,
}

#[derive(Debug, Deserialize)]
#[allow(missing_docs)]
pub struct GoogleGeometry {
    pub location: GoogleLatLng,
}

#[derive(Debug, Deserialize)]
#[allow(missing_docs)]
pub struct GoogleLatLng {
    pub lat: f64,
    pub lng: f64,
}

impl GoogleResponse {
    /// Converts the first result, treating any non-`OK` status as a failure.
    pub fn into_result(self, query: &str) -> Result<GeocodeResult> {
        match self.status.as_str() {
            "OK" => {}
            "ZERO_RESULTS" => return Err(GeocodeError::not_found(query.to_string())),
            status => {
                let detail = self.error_message.unwrap_or_default();
                return Err(GeocodeError::unavailable(format!(
                    "google status {status} {detail}"
                ).trim_end().to_string()));
            }
        }

        let first = self
            .results
            .into_iter()
            .next()
            .ok_or_else(|| GeocodeError::not_found(query.to_string()))?;

        let parts = address::parse_google_components(&first.address_components);
        let mut formatted_location = address::format(&parts);
        if formatted_location.is_empty() {
            formatted_location = first.formatted_address;
        }

        Ok(GeocodeResult {
            coordinate: Coordinate::new(first.geometry.location.lat, first.geometry.location.lng),
            formatted_location,
            state: parts.state,
            provider: ProviderKind::Google,
        })
    }
}

/// Google backend. Unavailable when no API key is configured.
#[derive(Clone)]
pub struct GoogleProvider {
    client: Client,
    url: String,
    api_key: Option<String>,
    region: String,
    language: String,
}

impl GoogleProvider {
    /// Create a backend from configuration
    pub fn new(config: &GeocoderConfig) -> Result<Self> {
        Ok(Self::with_client(http_client(config)?, config))
    }

    pub(crate) fn with_client(client: Client, config: &GeocoderConfig) -> Self {
        Self {
            client,
            url: config.google_url.clone(),
            api_key: config.google_api_key.clone(),
            region: config.region.to_lowercase(),
            language: config.language.clone(),
        }
    }

    fn key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| GeocodeError::unavailable("google api key not configured"))
    }

    /// Query parameters for a forward lookup restricted to `region`.
    fn forward_params(&self, address: &str, region: &str, key: &str) -> Vec<(&'static str, String)> {
        vec![
            ("address", address.to_string()),
            ("region", region.to_lowercase()),
            ("components", format!("country:{}", region.to_uppercase())),
            ("language", self.language.clone()),
            ("key", key.to_string()),
        ]
    }

    async fn fetch(&self, params: &[(&'static str, String)], query: &str) -> Result<GeocodeResult> {
        let response = self.client.get(&self.url).query(params).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeocodeError::unavailable(format!("google http {status}")));
        }

        let body: GoogleResponse = response.json().await?;
        body.into_result(query)
    }
}

impl AddressProvider for GoogleProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Google
    }

    fn is_available(&self) -> bool {
        self.api_key.is_some()
    }

    async fn forward(&self, address: &str, region: Option<&str>) -> Result<GeocodeResult> {
        let key = self.key()?;
        let region = region.unwrap_or(&self.region);
        debug!(provider = "google", address = %address, region = %region, "Forward geocode");

        let params = self.forward_params(address, region, key);
        self.fetch(&params, address).await
    }

    async fn reverse(&self, coordinate: Coordinate) -> Result<GeocodeResult> {
        let key = self.key()?;
        debug!(provider = "google", lat = coordinate.latitude, lng = coordinate.longitude, "Reverse geocode");

        let latlng = format!("{},{}", coordinate.latitude, coordinate.longitude);
        let params = vec![
            ("latlng", latlng.clone()),
            ("language", self.language.clone()),
            ("key", key.to_string()),
        ];
        self.fetch(&params, &latlng).await
    }
}
