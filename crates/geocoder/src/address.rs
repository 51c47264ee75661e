//! Address normalization.
//!
//! Providers describe the same place with different schemas: Google returns a
//! list of typed components, Nominatim a flat `address` object. Both are mapped
//! onto one [`AddressParts`] tuple ordered smallest area first, then rendered as
//! `village/city, district, state`.

use crate::provider::ProviderKind;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Canonical separator between address tokens.
pub const SEPARATOR: &str = ", ";

/// Delimiters accepted in manually typed addresses.
const MANUAL_DELIMITERS: [char; 4] = ['|', '/', ',', '-'];

/// Administrative breakdown of a location. Every slot is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressParts {
    /// Village, hamlet or neighbourhood
    pub village: Option<String>,
    /// Mandal / sub-district; stands in for the village when that is missing
    pub mandal: Option<String>,
    pub city: Option<String>,
    pub district: Option<String>,
    pub state: Option<String>,
}

impl AddressParts {
    /// True when no slot carries text.
    pub fn is_empty(&self) -> bool {
        [&self.village, &self.mandal, &self.city, &self.district, &self.state]
            .iter()
            .all(|slot| slot.is_none())
    }
}

/// One entry of Google's `address_components` array.
#[derive(Debug, Clone, Deserialize)]
#[allow(missing_docs)]
pub struct AddressComponent {
    pub long_name: String,
    #[serde(default)]
    pub types: Vec<String>,
}

/// Village slot: the smallest named area Google reports.
const GOOGLE_VILLAGE: &[&[&str]] = &[
    &["premise"],
    &["subpremise"],
    &["hamlet"],
    &["sublocality_level_3", "sublocality"],
    &["sublocality_level_2", "sublocality"],
    &["neighborhood"],
    &["administrative_area_level_4"],
];
const GOOGLE_MANDAL: &[&[&str]] = &[
    &["sublocality_level_1", "sublocality"],
    &["ward"],
    &["administrative_area_level_3"],
];
const GOOGLE_CITY: &[&[&str]] = &[&["locality"], &["postal_town"], &["administrative_area_level_2"]];
const GOOGLE_DISTRICT: &[&[&str]] = &[&["administrative_area_level_2"], &["administrative_area_level_3"]];
const GOOGLE_STATE: &[&[&str]] = &[&["administrative_area_level_1"]];

const OSM_VILLAGE: &[&str] = &["hamlet", "village", "neighbourhood", "quarter", "suburb"];
const OSM_MANDAL: &[&str] = &["city_district", "town", "county", "subdivision"];
const OSM_CITY: &[&str] = &["city", "town", "municipality"];
const OSM_DISTRICT: &[&str] = &["state_district", "county"];
const OSM_STATE: &[&str] = &["state"];

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Extracts parts from Google components. A component fills a slot when it
/// carries every type in a preference entry; entries are tried in order.
pub fn parse_google_components(components: &[AddressComponent]) -> AddressParts {
    let pick = |preferences: &[&[&str]]| {
        preferences.iter().find_map(|required| {
            components
                .iter()
                .find(|c| required.iter().all(|t| c.types.iter().any(|ct| ct == t)))
                .and_then(|c| non_empty(&c.long_name))
        })
    };

    AddressParts {
        village: pick(GOOGLE_VILLAGE),
        mandal: pick(GOOGLE_MANDAL),
        city: pick(GOOGLE_CITY),
        district: pick(GOOGLE_DISTRICT),
        state: pick(GOOGLE_STATE),
    }
}

/// Extracts parts from a Nominatim `address` object.
pub fn parse_nominatim_address(address: &HashMap<String, serde_json::Value>) -> AddressParts {
    let pick = |keys: &[&str]| {
        keys.iter()
            .find_map(|k| address.get(*k).and_then(|v| v.as_str()).and_then(non_empty))
    };

    AddressParts {
        village: pick(OSM_VILLAGE),
        mandal: pick(OSM_MANDAL),
        city: pick(OSM_CITY),
        district: pick(OSM_DISTRICT),
        state: pick(OSM_STATE),
    }
}

/// Parses a raw provider payload: Google's `address_components` array or
/// Nominatim's `address` object. Payloads of the wrong shape yield empty parts.
pub fn parse_provider_components(raw: &serde_json::Value, kind: ProviderKind) -> AddressParts {
    match kind {
        ProviderKind::Google => {
            serde_json::from_value::<Vec<AddressComponent>>(raw.clone())
                .map(|components| parse_google_components(&components))
                .unwrap_or_default()
        }
        ProviderKind::Nominatim => {
            serde_json::from_value::<HashMap<String, serde_json::Value>>(raw.clone())
                .map(|address| parse_nominatim_address(&address))
                .unwrap_or_default()
        }
    }
}

/// Renders `village-or-mandal, city, district, state`, skipping absent slots.
///
/// Returns an empty string when nothing is present; callers then fall back to
/// the provider's own formatted address.
pub fn format(parts: &AddressParts) -> String {
    let small_area = parts.village.as_deref().or(parts.mandal.as_deref());
    [
        small_area,
        parts.city.as_deref(),
        parts.district.as_deref(),
        parts.state.as_deref(),
    ]
    .into_iter()
    .flatten()
    .filter(|token| !token.is_empty())
    .collect::<Vec<_>>()
    .join(SEPARATOR)
}

/// Reorders a hand-typed address into `place, district, state`.
///
/// Splits on any of `| / , -`, trims, keeps the first three non-empty tokens.
///
/// # Example
/// ```
/// use bloodconnect_geocoder::address::normalize_manual_string;
///
/// assert_eq!(
///     normalize_manual_string("Kukatpally/Hyderabad/Telangana"),
///     "Kukatpally, Hyderabad, Telangana"
/// );
/// ```
pub fn normalize_manual_string(input: &str) -> String {
    input
        .split(MANUAL_DELIMITERS)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .take(3)
        .collect::<Vec<_>>()
        .join(SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn component(name: &str, types: &[&str]) -> AddressComponent {
        AddressComponent {
            long_name: name.to_string(),
            types: types.iter().map(|t| (*t).to_string()).collect(),
        }
    }

    #[test]
    fn test_google_components_kukatpally() {
        let components = vec![
            component("KPHB Colony", &["sublocality_level_2", "sublocality", "political"]),
            component("Kukatpally", &["sublocality_level_1", "sublocality", "political"]),
            component("Hyderabad", &["locality", "political"]),
            component("Medchal-Malkajgiri", &["administrative_area_level_2", "political"]),
            component("Telangana", &["administrative_area_level_1", "political"]),
            component("India", &["country", "political"]),
        ];

        let parts = parse_google_components(&components);
        assert_eq!(parts.village.as_deref(), Some("KPHB Colony"));
        assert_eq!(parts.mandal.as_deref(), Some("Kukatpally"));
        assert_eq!(parts.city.as_deref(), Some("Hyderabad"));
        assert_eq!(parts.district.as_deref(), Some("Medchal-Malkajgiri"));
        assert_eq!(parts.state.as_deref(), Some("Telangana"));
        assert_eq!(
            format(&parts),
            "KPHB Colony, Hyderabad, Medchal-Malkajgiri, Telangana"
        );
    }

    #[test]
    fn test_google_requires_all_types() {
        // sublocality_level_2 without the "sublocality" tag must not fill the village slot
        let components = vec![
            component("Stray", &["sublocality_level_2"]),
            component("Ward 7", &["ward"]),
        ];
        let parts = parse_google_components(&components);
        assert_eq!(parts.village, None);
        assert_eq!(parts.mandal.as_deref(), Some("Ward 7"));
    }

    #[test]
    fn test_google_district_falls_back_to_level_3() {
        let components = vec![component("Chevella", &["administrative_area_level_3"])];
        let parts = parse_google_components(&components);
        assert_eq!(parts.district.as_deref(), Some("Chevella"));
        assert_eq!(parts.mandal.as_deref(), Some("Chevella"));
        assert_eq!(parts.city, None);
    }

    #[test]
    fn test_nominatim_village_preference() {
        let raw = json!({
            "suburb": "Moosapet",
            "village": "Bachupally",
            "state_district": "Medchal",
            "city": "Hyderabad",
            "state": "Telangana",
            "country": "India",
            "country_code": "in"
        });
        let parts = parse_provider_components(&raw, ProviderKind::Nominatim);
        assert_eq!(parts.village.as_deref(), Some("Bachupally"));
        assert_eq!(parts.district.as_deref(), Some("Medchal"));
        assert_eq!(format(&parts), "Bachupally, Hyderabad, Medchal, Telangana");
    }

    #[test]
    fn test_nominatim_county_doubles_as_mandal_and_district() {
        let raw = json!({ "county": "Guntur", "state": "Andhra Pradesh" });
        let parts = parse_provider_components(&raw, ProviderKind::Nominatim);
        assert_eq!(parts.mandal.as_deref(), Some("Guntur"));
        assert_eq!(parts.district.as_deref(), Some("Guntur"));
        assert_eq!(format(&parts), "Guntur, Guntur, Andhra Pradesh");
    }

    #[test]
    fn test_wrong_shape_yields_empty_parts() {
        let parts = parse_provider_components(&json!("nonsense"), ProviderKind::Google);
        assert!(parts.is_empty());
        assert_eq!(format(&parts), "");
    }

    #[test]
    fn test_blank_values_are_absent() {
        let raw = json!({ "village": "  ", "state": "Kerala" });
        let parts = parse_provider_components(&raw, ProviderKind::Nominatim);
        assert_eq!(parts.village, None);
        assert_eq!(format(&parts), "Kerala");
    }

    #[test]
    fn test_normalize_manual_string() {
        assert_eq!(
            normalize_manual_string("Kukatpally/Hyderabad/Telangana"),
            "Kukatpally, Hyderabad, Telangana"
        );
        assert_eq!(
            normalize_manual_string(" Ameerpet | Hyderabad - Telangana , India "),
            "Ameerpet, Hyderabad, Telangana"
        );
        assert_eq!(normalize_manual_string("Nellore,,"), "Nellore");
        assert_eq!(normalize_manual_string(""), "");
    }
}
