//! Geocoder configuration for the CLI

use anyhow::{Context, Result};
use bloodconnect_geocoder::{DefaultGeocoder, GeocoderConfig};
use std::path::Path;

/// Load from `path` when given, from the environment otherwise
pub fn load(path: Option<&Path>) -> Result<GeocoderConfig> {
    match path {
        Some(path) => GeocoderConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display())),
        None => GeocoderConfig::from_env().context("invalid geocoder environment"),
    }
}

/// Build the Google-then-Nominatim geocoder
pub fn geocoder(path: Option<&Path>) -> Result<DefaultGeocoder> {
    let config = load(path)?;
    tracing::debug!(
        google = config.google_api_key.is_some(),
        nominatim = %config.nominatim_url,
        region = %config.region,
        "Geocoder configured"
    );
    Ok(DefaultGeocoder::from_config(&config)?)
}
