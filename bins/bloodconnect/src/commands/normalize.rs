//! Manual address normalization command

use super::print_json;
use anyhow::Result;
use bloodconnect_geocoder::normalize_manual_string;

/// Print the normalized form of a typed address
pub fn run(text: &str, format: &str) -> Result<()> {
    let normalized = normalize_manual_string(text);

    if format == "json" {
        return print_json(&serde_json::json!({
            "input": text,
            "normalized": normalized,
        }));
    }

    println!("{normalized}");
    Ok(())
}
