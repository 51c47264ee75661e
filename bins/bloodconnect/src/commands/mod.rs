//! Command implementations

pub mod geocode;
pub mod normalize;
pub mod search;

use anyhow::Result;
use owo_colors::OwoColorize;
use serde::Serialize;

/// Pretty-print any serializable value to stdout
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Section header for text output
pub fn print_header(title: &str) {
    println!();
    println!("  {}", title.red().bold());
    println!("  {}", "─".repeat(60).dimmed());
}
