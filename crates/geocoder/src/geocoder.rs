//! Two-provider geocoder with fixed fallback order.

use crate::config::GeocoderConfig;
use crate::error::{GeocodeError, Result};
use crate::provider::{http_client, AddressProvider, GoogleProvider, NominatimProvider, ProviderKind};
use bloodconnect_geo::Coordinate;
use bloodconnect_telemetry::metrics;
use serde::{Deserialize, Serialize};
use std::future::Future;
use tracing::{debug, instrument, warn, Span};
use uuid::Uuid;

/// A resolved location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeocodeResult {
    /// Resolved point
    pub coordinate: Coordinate,
    /// `village/city, district, state`, or the provider's own label
    pub formatted_location: String,
    /// State name when the provider reported one
    pub state: Option<String>,
    /// Backend that answered
    pub provider: ProviderKind,
}

/// Geocoding capability consumed by the search engine.
pub trait Geocode: Send + Sync {
    /// Resolve free text to a location.
    fn geocode_address(&self, text: &str) -> impl Future<Output = Result<GeocodeResult>> + Send;

    /// Resolve a point to a location.
    fn reverse_geocode(&self, coordinate: Coordinate) -> impl Future<Output = Result<GeocodeResult>> + Send;
}

impl<G: Geocode + ?Sized> Geocode for &G {
    fn geocode_address(&self, text: &str) -> impl Future<Output = Result<GeocodeResult>> + Send {
        (**self).geocode_address(text)
    }

    fn reverse_geocode(&self, coordinate: Coordinate) -> impl Future<Output = Result<GeocodeResult>> + Send {
        (**self).reverse_geocode(coordinate)
    }
}

/// Tries `primary`, then `secondary`. No retries, no backoff.
pub struct Geocoder<P, S> {
    primary: P,
    secondary: S,
}

/// The production pairing: Google first, Nominatim as fallback.
pub type DefaultGeocoder = Geocoder<GoogleProvider, NominatimProvider>;

impl DefaultGeocoder {
    /// Build both backends from configuration, sharing one HTTP client
    pub fn from_config(config: &GeocoderConfig) -> Result<Self> {
        config.validate()?;
        let client = http_client(config)?;
        Ok(Self::new(
            GoogleProvider::with_client(client.clone(), config),
            NominatimProvider::with_client(client, config),
        ))
    }

    /// Build from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_config(&GeocoderConfig::from_env()?)
    }
}

impl<P: AddressProvider, S: AddressProvider> Geocoder<P, S> {
    /// Pair two backends
    pub fn new(primary: P, secondary: S) -> Self {
        Self { primary, secondary }
    }

    /// Forward geocode with the configured region
    pub async fn forward(&self, address: &str) -> Result<GeocodeResult> {
        self.forward_in_region(address, None).await
    }

    /// Forward geocode, optionally overriding the region restriction
    #[instrument(skip(self), fields(request_id))]
    pub async fn forward_in_region(&self, address: &str, region: Option<&str>) -> Result<GeocodeResult> {
        Span::current().record("request_id", tracing::field::display(Uuid::new_v4()));

        let address = address.trim();
        if address.is_empty() {
            return Err(GeocodeError::InvalidInput("address is empty".to_string()));
        }

        if self.primary.is_available() {
            match self.primary.forward(address, region).await {
                Ok(result) => return Ok(result),
                Err(e) => self.note_fallback(e)?,
            }
        } else {
            debug!(provider = %self.primary.kind(), "Primary provider unavailable, skipping");
        }

        let outcome = self.secondary.forward(address, region).await;
        self.finish(outcome, address)
    }

    /// Reverse geocode a point
    #[instrument(skip(self), fields(request_id))]
    pub async fn reverse(&self, coordinate: Coordinate) -> Result<GeocodeResult> {
        Span::current().record("request_id", tracing::field::display(Uuid::new_v4()));

        if !coordinate.is_valid() {
            return Err(GeocodeError::InvalidInput(format!(
                "coordinate ({}, {}) is out of range",
                coordinate.latitude, coordinate.longitude
            )));
        }

        if self.primary.is_available() {
            match self.primary.reverse(coordinate).await {
                Ok(result) => return Ok(result),
                Err(e) => self.note_fallback(e)?,
            }
        } else {
            debug!(provider = %self.primary.kind(), "Primary provider unavailable, skipping");
        }

        let outcome = self.secondary.reverse(coordinate).await;
        let label = format!("{},{}", coordinate.latitude, coordinate.longitude);
        self.finish(outcome, &label)
    }

    /// Logs a primary failure; errors that must not fall through are returned.
    fn note_fallback(&self, error: GeocodeError) -> Result<()> {
        if !error.is_fallthrough() {
            return Err(error);
        }
        warn!(
            primary = %self.primary.kind(),
            secondary = %self.secondary.kind(),
            error = %error,
            "Primary provider failed, falling back"
        );
        metrics().increment("geocode.fallback");
        Ok(())
    }

    /// Maps an exhausted chain to `NotFound`.
    fn finish(&self, outcome: Result<GeocodeResult>, query: &str) -> Result<GeocodeResult> {
        outcome.map_err(|e| {
            warn!(provider = %self.secondary.kind(), error = %e, "All providers failed");
            metrics().increment("geocode.failed");
            match e {
                GeocodeError::NotFound(_) | GeocodeError::ProviderUnavailable(_) => {
                    GeocodeError::not_found(format!("{query} ({e})"))
                }
                other => other,
            }
        })
    }
}

impl<P: AddressProvider, S: AddressProvider> Geocode for Geocoder<P, S> {
    async fn geocode_address(&self, text: &str) -> Result<GeocodeResult> {
        self.forward(text).await
    }

    async fn reverse_geocode(&self, coordinate: Coordinate) -> Result<GeocodeResult> {
        self.reverse(coordinate).await
    }
}
