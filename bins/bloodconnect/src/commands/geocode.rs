//! Forward and reverse geocoding commands

use super::{print_header, print_json};
use crate::config;
use anyhow::{bail, Result};
use bloodconnect_geo::{is_within_india_bounds, Coordinate};
use bloodconnect_geocoder::{fallback_location_label, GeocodeResult};
use owo_colors::OwoColorize;
use std::path::Path;

/// Geocode a free-text address
pub async fn run(config_path: Option<&Path>, address: &str, format: &str) -> Result<()> {
    let geocoder = config::geocoder(config_path)?;
    let place = geocoder.forward(address).await?;

    if format == "json" {
        return print_json(&place);
    }

    print_header("📍 Geocode");
    print_place(&place);
    Ok(())
}

/// Reverse geocode a point, falling back to a coordinate label
pub async fn run_reverse(config_path: Option<&Path>, lat: f64, lng: f64, format: &str) -> Result<()> {
    let coordinate = Coordinate::new(lat, lng);
    if !coordinate.is_valid() {
        bail!("coordinate ({lat}, {lng}) is out of range");
    }

    let geocoder = config::geocoder(config_path)?;
    let place = match geocoder.reverse(coordinate).await {
        Ok(place) => place,
        Err(e) if e.is_fallthrough() => {
            tracing::warn!(error = %e, "Reverse geocode failed, using coordinate label");
            let label = fallback_location_label(&coordinate);
            if format == "json" {
                return print_json(&serde_json::json!({
                    "coordinate": coordinate,
                    "formattedLocation": label,
                    "state": null,
                    "provider": null,
                }));
            }
            eprintln!("{} {}", "Warning:".yellow().bold(), e);
            println!("{label}");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    if format == "json" {
        return print_json(&place);
    }

    print_header("📍 Reverse geocode");
    print_place(&place);
    Ok(())
}

fn print_place(place: &GeocodeResult) {
    let coordinate = &place.coordinate;
    println!("  Location:    {}", place.formatted_location.bold());
    println!("  Coordinates: {:.6}, {:.6}", coordinate.latitude, coordinate.longitude);
    println!("  State:       {}", place.state.as_deref().unwrap_or("unknown"));
    println!("  Provider:    {}", place.provider.to_string().dimmed());
    if !is_within_india_bounds(coordinate.latitude, coordinate.longitude) {
        println!("  {}", "Outside the service area".yellow());
    }
    println!();
}
