//! Error types for the search crate.

use bloodconnect_geocoder::GeocodeError;
use thiserror::Error;

/// Result type alias for search operations.
pub type Result<T> = std::result::Result<T, SearchError>;

/// Errors that can occur during search operations.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Neither an explicit coordinate nor location text was supplied
    #[error("Search center unresolved: supply a location or the device position")]
    CenterUnresolved,

    /// The center lies outside the supported service area
    #[error("Location ({latitude}, {longitude}) is outside the service area")]
    OutOfServiceArea {
        /// Center latitude
        latitude: f64,
        /// Center longitude
        longitude: f64,
    },

    /// Geocoding the location text failed
    #[error("Geocoding failed: {0}")]
    Geocode(#[from] GeocodeError),
}

/// Error code for callers that map failures to numeric codes.
/// Range: 11xxx for search errors.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchErrorCode {
    /// No usable query center
    CenterUnresolved = 11001,
    /// Center outside supported bounds
    OutOfServiceArea = 11002,
    /// Geocoder rejected the input
    InvalidInput = 11003,
    /// Geocoder found nothing
    NotFound = 11004,
    /// Provider transport or status failure
    ProviderUnavailable = 11005,
    /// Geocoder misconfigured
    Config = 11006,
}

impl SearchError {
    /// Returns the error code for this error.
    pub fn code(&self) -> SearchErrorCode {
        match self {
            SearchError::CenterUnresolved => SearchErrorCode::CenterUnresolved,
            SearchError::OutOfServiceArea { .. } => SearchErrorCode::OutOfServiceArea,
            SearchError::Geocode(e) => match e {
                GeocodeError::InvalidInput(_) => SearchErrorCode::InvalidInput,
                GeocodeError::NotFound(_) => SearchErrorCode::NotFound,
                GeocodeError::ProviderUnavailable(_) => SearchErrorCode::ProviderUnavailable,
                GeocodeError::Config(_) => SearchErrorCode::Config,
            },
        }
    }
}
