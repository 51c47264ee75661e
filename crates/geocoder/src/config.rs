//! Configuration for the geocoder
//!
//! Supports defaults, environment variables and TOML files.

use crate::error::{GeocodeError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::time::Duration;

/// Default Google Geocoding API endpoint
const DEFAULT_GOOGLE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";

/// Default public Nominatim instance
const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

/// Nominatim asks every client to identify itself
const DEFAULT_USER_AGENT: &str = concat!("bloodconnect-geocoder/", env!("CARGO_PKG_VERSION"));

/// Geocoder configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocoderConfig {
    /// Google Geocoding API key; the Google provider is skipped without one
    pub google_api_key: Option<String>,
    /// Google Geocoding endpoint
    pub google_url: String,
    /// Nominatim base URL (without `/search`)
    pub nominatim_url: String,
    /// User-Agent sent with every request
    pub user_agent: String,
    /// Accept-Language / `language` parameter
    pub language: String,
    /// ISO 3166-1 alpha-2 country that forward lookups are restricted to
    pub region: String,
    /// Zoom used for Nominatim reverse lookups (14 ~ village/suburb)
    pub reverse_zoom: u8,
    /// Request timeout
    #[serde(with = "duration_secs")]
    pub timeout: Duration,
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            google_api_key: None,
            google_url: DEFAULT_GOOGLE_URL.to_string(),
            nominatim_url: DEFAULT_NOMINATIM_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            language: "en".to_string(),
            region: "in".to_string(),
            reverse_zoom: 14,
            timeout: Duration::from_secs(10),
        }
    }
}

impl GeocoderConfig {
    /// Create configuration from environment variables
    ///
    /// Reads the following environment variables:
    /// - `BLOODCONNECT_GOOGLE_API_KEY` or `GOOGLE_MAPS_API_KEY`: enables the Google provider
    /// - `BLOODCONNECT_GOOGLE_URL`: Google endpoint override
    /// - `BLOODCONNECT_NOMINATIM_URL`: Nominatim base URL override
    /// - `BLOODCONNECT_USER_AGENT`: User-Agent header
    /// - `BLOODCONNECT_REGION`: country restriction for forward lookups
    /// - `BLOODCONNECT_TIMEOUT_SECS`: request timeout in seconds
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let google_api_key = env::var("BLOODCONNECT_GOOGLE_API_KEY")
            .or_else(|_| env::var("GOOGLE_MAPS_API_KEY"))
            .ok()
            .filter(|k| !k.trim().is_empty());

        let timeout = match env::var("BLOODCONNECT_TIMEOUT_SECS") {
            Ok(raw) => raw
                .parse()
                .map(Duration::from_secs)
                .map_err(|_| GeocodeError::config(format!("BLOODCONNECT_TIMEOUT_SECS is not a number: {raw}")))?,
            Err(_) => defaults.timeout,
        };

        let config = Self {
            google_api_key,
            google_url: env::var("BLOODCONNECT_GOOGLE_URL").unwrap_or(defaults.google_url),
            nominatim_url: env::var("BLOODCONNECT_NOMINATIM_URL").unwrap_or(defaults.nominatim_url),
            user_agent: env::var("BLOODCONNECT_USER_AGENT").unwrap_or(defaults.user_agent),
            language: defaults.language,
            region: env::var("BLOODCONNECT_REGION").unwrap_or(defaults.region),
            reverse_zoom: defaults.reverse_zoom,
            timeout,
        };
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file; missing keys take their defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            GeocodeError::config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| {
            GeocodeError::config(format!("Failed to parse config file {}: {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Builder-style method to set the Google API key
    #[must_use]
    pub fn with_google_api_key(mut self, key: impl Into<String>) -> Self {
        self.google_api_key = Some(key.into());
        self
    }

    /// Builder-style method to set the Nominatim base URL
    #[must_use]
    pub fn with_nominatim_url(mut self, url: impl Into<String>) -> Self {
        self.nominatim_url = url.into();
        self
    }

    /// Builder-style method to set the Google endpoint
    #[must_use]
    pub fn with_google_url(mut self, url: impl Into<String>) -> Self {
        self.google_url = url.into();
        self
    }

    /// Builder-style method to set the region restriction
    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Builder-style method to set timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        for (name, url) in [("google_url", &self.google_url), ("nominatim_url", &self.nominatim_url)] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(GeocodeError::config(format!(
                    "{name} must start with http:// or https://"
                )));
            }
        }

        if self.timeout.is_zero() {
            return Err(GeocodeError::config("timeout cannot be zero"));
        }

        if self.region.len() != 2 || !self.region.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(GeocodeError::config(format!(
                "region must be a two-letter country code, got {:?}",
                self.region
            )));
        }

        if self.user_agent.trim().is_empty() {
            return Err(GeocodeError::config("user_agent cannot be empty"));
        }

        Ok(())
    }
}
