//! In-memory geocoder for unit tests.

use bloodconnect_geo::Coordinate;
use bloodconnect_geocoder::{Geocode, GeocodeError, GeocodeResult, ProviderKind, Result};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Answers forward lookups from a fixed table and reverse lookups with one state.
#[derive(Default)]
pub(crate) struct FakeGeocoder {
    places: HashMap<String, (Coordinate, Option<String>)>,
    reverse_state: Option<String>,
    forward_calls: AtomicUsize,
    reverse_calls: AtomicUsize,
}

impl FakeGeocoder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_place(mut self, name: &str, lat: f64, lng: f64, state: Option<&str>) -> Self {
        self.places
            .insert(name.to_string(), (Coordinate::new(lat, lng), state.map(str::to_string)));
        self
    }

    pub(crate) fn with_reverse_state(mut self, state: &str) -> Self {
        self.reverse_state = Some(state.to_string());
        self
    }

    pub(crate) fn forward_calls(&self) -> usize {
        self.forward_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn reverse_calls(&self) -> usize {
        self.reverse_calls.load(Ordering::SeqCst)
    }
}

impl Geocode for FakeGeocoder {
    async fn geocode_address(&self, text: &str) -> Result<GeocodeResult> {
        self.forward_calls.fetch_add(1, Ordering::SeqCst);
        let text = text.trim();
        let (coordinate, state) = self
            .places
            .get(text)
            .cloned()
            .ok_or_else(|| GeocodeError::not_found(text.to_string()))?;
        let formatted_location = match &state {
            Some(state) => format!("{text}, {state}"),
            None => text.to_string(),
        };
        Ok(GeocodeResult {
            coordinate,
            formatted_location,
            state,
            provider: ProviderKind::Nominatim,
        })
    }

    async fn reverse_geocode(&self, coordinate: Coordinate) -> Result<GeocodeResult> {
        self.reverse_calls.fetch_add(1, Ordering::SeqCst);
        let state = self
            .reverse_state
            .clone()
            .ok_or_else(|| GeocodeError::unavailable("reverse lookups disabled"))?;
        Ok(GeocodeResult {
            coordinate,
            formatted_location: state.clone(),
            state: Some(state),
            provider: ProviderKind::Nominatim,
        })
    }
}
