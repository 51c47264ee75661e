//! OpenStreetMap Nominatim backend.
//!
//! Nominatim's `/search` returns a point and a display name only, so a forward
//! lookup is followed by a `/reverse` lookup to get the structured address.

use super::{http_client, AddressProvider, ProviderKind};
use crate::address;
use crate::config::GeocoderConfig;
use crate::error::{GeocodeError, Result};
use crate::GeocodeResult;
use bloodconnect_geo::Coordinate;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, warn};

/// One `/search` hit. Nominatim serializes coordinates as strings.
#[derive(Debug, Clone, Deserialize)]
#[allow(missing_docs)]
pub struct NominatimHit {
    pub lat: String,
    pub lon: String,
    #[serde(default)]
    pub display_name: String,
}

impl NominatimHit {
    /// Parses the string coordinates.
    pub fn coordinate(&self) -> Result<Coordinate> {
        let lat = self.lat.trim().parse::<f64>();
        let lon = self.lon.trim().parse::<f64>();
        match (lat, lon) {
            (Ok(lat), Ok(lon)) => Ok(Coordinate::new(lat, lon)),
            _ => Err(GeocodeError::unavailable(format!(
                "nominatim returned unparsable coordinates ({}, {})",
                self.lat, self.lon
            ))),
        }
    }

    /// Prefers the structured address from a `/reverse` lookup; when that
    /// lookup failed or found nothing, the hit's own display name stands in
    /// and the state stays unknown.
    pub fn with_detail(self, coordinate: Coordinate, detail: Result<NominatimPlace>) -> GeocodeResult {
        match detail.and_then(|place| place.into_result(coordinate)) {
            Ok(result) => result,
            Err(e) => {
                warn!(provider = "nominatim", error = %e, "Address detail lookup failed");
                GeocodeResult {
                    coordinate,
                    formatted_location: self.display_name,
                    state: None,
                    provider: ProviderKind::Nominatim,
                }
            }
        }
    }
}

/// A `/reverse` response with `addressdetails=1`.
#[derive(Debug, Clone, Default, Deserialize)]
#[allow(missing_docs)]
pub struct NominatimPlace {
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub address: HashMap<String, serde_json::Value>,
    /// Present instead of an address when nothing was found
    #[serde(default)]
    pub error: Option<String>,
}

impl NominatimPlace {
    /// Builds a result at `coordinate`, normalizing the address.
    pub fn into_result(self, coordinate: Coordinate) -> Result<GeocodeResult> {
        if let Some(reason) = self.error {
            return Err(GeocodeError::not_found(reason));
        }

        let parts = address::parse_nominatim_address(&self.address);
        let mut formatted_location = address::format(&parts);
        if formatted_location.is_empty() {
            formatted_location = self.display_name;
        }

        Ok(GeocodeResult {
            coordinate,
            formatted_location,
            state: parts.state,
            provider: ProviderKind::Nominatim,
        })
    }
}

/// Nominatim backend. Always available.
#[derive(Clone)]
pub struct NominatimProvider {
    client: Client,
    base_url: String,
    region: String,
    zoom: u8,
}

impl NominatimProvider {
    /// Create a backend from configuration
    pub fn new(config: &GeocoderConfig) -> Result<Self> {
        Ok(Self::with_client(http_client(config)?, config))
    }

    pub(crate) fn with_client(client: Client, config: &GeocoderConfig) -> Self {
        Self {
            client,
            base_url: config.nominatim_url.trim_end_matches('/').to_string(),
            region: config.region.to_lowercase(),
            zoom: config.reverse_zoom,
        }
    }

    async fn search(&self, address: &str, region: &str) -> Result<NominatimHit> {
        let url = format!("{}/search", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("format", "json"),
                ("limit", "1"),
                ("countrycodes", region),
                ("q", address),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeocodeError::unavailable(format!("nominatim search http {status}")));
        }

        let hits: Vec<NominatimHit> = response.json().await?;
        hits.into_iter()
            .next()
            .ok_or_else(|| GeocodeError::not_found(address.to_string()))
    }

    async fn lookup(&self, coordinate: Coordinate) -> Result<NominatimPlace> {
        let url = format!("{}/reverse", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("format", "json".to_string()),
                ("lat", coordinate.latitude.to_string()),
                ("lon", coordinate.longitude.to_string()),
                ("zoom", self.zoom.to_string()),
                ("addressdetails", "1".to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeocodeError::unavailable(format!("nominatim reverse http {status}")));
        }

        Ok(response.json().await?)
    }
}

impl AddressProvider for NominatimProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Nominatim
    }

    async fn forward(&self, address: &str, region: Option<&str>) -> Result<GeocodeResult> {
        let region = region.map_or_else(|| self.region.clone(), str::to_lowercase);
        debug!(provider = "nominatim", address = %address, region = %region, "Forward geocode");

        let hit = self.search(address, &region).await?;
        let coordinate = hit.coordinate()?;

        let detail = self.lookup(coordinate).await;
        Ok(hit.with_detail(coordinate, detail))
    }

    async fn reverse(&self, coordinate: Coordinate) -> Result<GeocodeResult> {
        debug!(provider = "nominatim", lat = coordinate.latitude, lng = coordinate.longitude, "Reverse geocode");
        self.lookup(coordinate).await?.into_result(coordinate)
    }
}
