//! Error types for geocoding

use thiserror::Error;

/// Result type alias for geocoding operations
pub type Result<T> = std::result::Result<T, GeocodeError>;

/// Geocoding errors
#[derive(Error, Debug)]
pub enum GeocodeError {
    /// Empty address or otherwise unusable request
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Provider answered but had no match
    #[error("No match found: {0}")]
    NotFound(String),

    /// Transport failure, bad payload or non-OK provider status
    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for GeocodeError {
    fn from(e: reqwest::Error) -> Self {
        Self::ProviderUnavailable(e.to_string())
    }
}

impl From<serde_json::Error> for GeocodeError {
    fn from(e: serde_json::Error) -> Self {
        Self::ProviderUnavailable(format!("malformed provider response: {e}"))
    }
}

impl GeocodeError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a not-found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a provider-unavailable error
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::ProviderUnavailable(msg.into())
    }

    /// Whether the geocoder should move on to the next provider after this error
    #[must_use]
    pub fn is_fallthrough(&self) -> bool {
        match self {
            Self::NotFound(_) | Self::ProviderUnavailable(_) => true,
            Self::InvalidInput(_) | Self::Config(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallthrough_classification() {
        assert!(GeocodeError::not_found("x").is_fallthrough());
        assert!(GeocodeError::unavailable("x").is_fallthrough());
        assert!(!GeocodeError::InvalidInput("x".into()).is_fallthrough());
        assert!(!GeocodeError::config("x").is_fallthrough());
    }

    #[test]
    fn test_json_error_maps_to_unavailable() {
        let err: GeocodeError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, GeocodeError::ProviderUnavailable(_)));
    }
}
