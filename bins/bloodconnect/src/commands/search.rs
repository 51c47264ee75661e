//! Donor search command

use super::{print_header, print_json};
use crate::config;
use anyhow::{Context, Result};
use bloodconnect_geo::Coordinate;
use bloodconnect_search::{layout, map_center, DonorRecord, ProximitySearch, SearchOutcome, SearchQuery};
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};

/// Parsed `search` arguments
pub struct SearchArgs {
    pub pool: PathBuf,
    pub blood_types: Vec<String>,
    pub location: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub limit: Option<usize>,
    pub markers: bool,
}

impl SearchArgs {
    fn query(&self) -> SearchQuery {
        let mut query = SearchQuery::new();
        for blood_type in &self.blood_types {
            query = query.with_blood_type(blood_type.trim());
        }
        if let Some(text) = &self.location {
            query = query.with_location_text(text.as_str());
        }
        if let (Some(lat), Some(lng)) = (self.lat, self.lng) {
            query = query.with_coordinate(Coordinate::new(lat, lng));
        }
        if let Some(limit) = self.limit {
            query = query.with_max_results(limit);
        }
        query
    }
}

/// Read a JSON array of donor records
fn read_pool(path: &Path) -> Result<Vec<DonorRecord>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read donor pool {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid donor pool {}", path.display()))
}

/// Rank donors from a pool file
pub async fn run(config_path: Option<&Path>, args: SearchArgs, format: &str) -> Result<()> {
    let pool = read_pool(&args.pool)?;
    tracing::debug!(donors = pool.len(), "Donor pool loaded");

    let search = ProximitySearch::new(config::geocoder(config_path)?);
    let outcome = search.search_with_center(&args.query(), &pool).await?;

    if format == "json" {
        return print_outcome_json(&outcome, args.markers);
    }

    print_outcome(&outcome, args.markers);
    Ok(())
}

fn print_outcome_json(outcome: &SearchOutcome, markers: bool) -> Result<()> {
    let mut value = serde_json::to_value(outcome)?;
    if markers {
        let placements = layout(&outcome.results);
        value["mapCenter"] = serde_json::to_value(map_center(Some(outcome.center.coordinate), &placements))?;
        value["markers"] = serde_json::to_value(&placements)?;
    }
    print_json(&value)
}

fn print_outcome(outcome: &SearchOutcome, markers: bool) {
    let center = &outcome.center;

    print_header("🩸 Donor search");
    if let Some(label) = &center.formatted_location {
        println!("  Center: {}", label.bold());
    }
    println!(
        "  Center: {:.6}, {:.6} ({})",
        center.coordinate.latitude,
        center.coordinate.longitude,
        center.state.as_deref().unwrap_or("state unknown")
    );
    println!();

    if outcome.results.is_empty() {
        println!("  {}", "No available donors found".yellow());
        println!();
        return;
    }

    for (rank, result) in outcome.results.iter().enumerate() {
        println!(
            "  {:>3}. {:<4} {:>10}  {}  {}",
            rank + 1,
            result.donor.blood_type.red().bold(),
            result.distance_label(),
            result.donor.id,
            result.donor.location.dimmed()
        );
    }
    println!();
    println!("  Found {} available donors", outcome.results.len().to_string().green());

    if markers {
        let placements = layout(&outcome.results);
        let focus = map_center(Some(center.coordinate), &placements);
        print_header("🗺  Markers");
        println!("  Map center: {:.6}, {:.6}", focus.latitude, focus.longitude);
        for placement in &placements {
            println!(
                "  {:.6}, {:.6}  {}",
                placement.coordinate.latitude, placement.coordinate.longitude, placement.source_id
            );
        }
    }
    println!();
}
