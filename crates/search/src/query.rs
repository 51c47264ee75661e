//! Search input.

use bloodconnect_geo::Coordinate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// What a seeker is looking for and where.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchQuery {
    /// Accepted blood types; empty accepts every type
    pub blood_types: BTreeSet<String>,
    /// Free-text center, geocoded when no explicit coordinate is given
    pub location_text: Option<String>,
    /// Center supplied directly (device position or a map pick)
    pub explicit_coordinate: Option<Coordinate>,
    /// Keep only the nearest N results
    pub max_results: Option<usize>,
}

impl SearchQuery {
    /// Creates a query that accepts every blood type and has no center yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an accepted blood type.
    #[must_use]
    pub fn with_blood_type(mut self, blood_type: impl Into<String>) -> Self {
        self.blood_types.insert(blood_type.into());
        self
    }

    /// Centers the search on typed text.
    #[must_use]
    pub fn with_location_text(mut self, text: impl Into<String>) -> Self {
        self.location_text = Some(text.into());
        self
    }

    /// Centers the search on a known point.
    #[must_use]
    pub fn with_coordinate(mut self, coordinate: Coordinate) -> Self {
        self.explicit_coordinate = Some(coordinate);
        self
    }

    /// Caps the number of results.
    #[must_use]
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = Some(max_results);
        self
    }

    /// True when `blood_type` passes the type filter.
    pub fn accepts_blood_type(&self, blood_type: &str) -> bool {
        self.blood_types.is_empty() || self.blood_types.contains(blood_type)
    }

    /// Location text with surrounding whitespace removed, if any is left.
    pub fn trimmed_location(&self) -> Option<&str> {
        self.location_text
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }
}
