//! Donor records as stored by the profile layer.
//!
//! The store keeps coordinates as strings (`"17.4948"`, or `""` when unknown)
//! and attaches arbitrary profile fields; both are tolerated here.

use bloodconnect_geo::Coordinate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Whether a donor is currently accepting requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Availability {
    /// Shown in search results
    #[default]
    Available,
    /// Hidden from search results
    #[serde(other)]
    Unavailable,
}

/// A donor profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "DonorWire", into = "DonorWire")]
pub struct DonorRecord {
    /// Store identifier
    pub id: String,
    /// ABO/Rh group, e.g. `O+`
    pub blood_type: String,
    /// Resolved position; `None` when unknown or unusable
    pub coordinate: Option<Coordinate>,
    /// Location text as the donor typed or confirmed it
    pub location: String,
    /// Availability flag
    pub availability: Availability,
    /// Remaining profile fields, passed through untouched
    pub extra: Map<String, Value>,
}

impl DonorRecord {
    /// Creates an available donor without coordinates or extra fields.
    pub fn new(id: impl Into<String>, blood_type: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            blood_type: blood_type.into(),
            coordinate: None,
            location: location.into(),
            availability: Availability::Available,
            extra: Map::new(),
        }
    }

    /// Sets the coordinate.
    #[must_use]
    pub fn with_coordinate(mut self, coordinate: Coordinate) -> Self {
        self.coordinate = Some(coordinate).filter(Coordinate::is_finite);
        self
    }

    /// Sets the availability.
    #[must_use]
    pub fn with_availability(mut self, availability: Availability) -> Self {
        self.availability = availability;
        self
    }

    /// True when the donor shows up in searches.
    pub fn is_available(&self) -> bool {
        self.availability == Availability::Available
    }

    /// The coordinate, if both components are finite.
    pub fn finite_coordinate(&self) -> Option<Coordinate> {
        self.coordinate.filter(Coordinate::is_finite)
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DonorWire {
    #[serde(deserialize_with = "string_or_number")]
    id: String,
    #[serde(default)]
    blood_type: String,
    #[serde(default, deserialize_with = "lenient_degrees", skip_serializing_if = "Option::is_none")]
    latitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient_degrees", skip_serializing_if = "Option::is_none")]
    longitude: Option<f64>,
    #[serde(default)]
    location: String,
    #[serde(default)]
    availability: Availability,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl From<DonorWire> for DonorRecord {
    fn from(wire: DonorWire) -> Self {
        let coordinate = match (wire.latitude, wire.longitude) {
            (Some(lat), Some(lng)) => Some(Coordinate::new(lat, lng)),
            _ => None,
        };
        Self {
            id: wire.id,
            blood_type: wire.blood_type,
            coordinate,
            location: wire.location,
            availability: wire.availability,
            extra: wire.extra,
        }
    }
}

impl From<DonorRecord> for DonorWire {
    fn from(donor: DonorRecord) -> Self {
        let coordinate = donor.finite_coordinate();
        Self {
            id: donor.id,
            blood_type: donor.blood_type,
            latitude: coordinate.map(|c| c.latitude),
            longitude: coordinate.map(|c| c.longitude),
            location: donor.location,
            availability: donor.availability,
            extra: donor.extra,
        }
    }
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!("expected string or number id, got {other}"))),
    }
}

/// Accepts a number or a numeric string; anything else is absent.
fn lenient_degrees<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let parsed = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(parsed.filter(|v| v.is_finite()))
}
