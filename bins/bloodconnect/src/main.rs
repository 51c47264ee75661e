//! BloodConnect CLI
//!
//! Geocodes locations and ranks nearby blood donors from a donor pool file.

use bloodconnect_telemetry::TelemetryConfig;
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;
mod config;

use commands::{geocode, normalize, search};

/// Donor-seeker location tools
#[derive(Parser)]
#[command(name = "bloodconnect")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (text, json)
    #[arg(short, long, global = true, default_value = "text")]
    format: String,

    /// Geocoder configuration file (TOML); environment variables otherwise
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve an address to coordinates and a normalized location
    Geocode {
        /// Free-text address
        address: String,
    },

    /// Resolve coordinates to a normalized location
    Reverse {
        /// Latitude in degrees
        #[arg(allow_negative_numbers = true)]
        lat: f64,

        /// Longitude in degrees
        #[arg(allow_negative_numbers = true)]
        lng: f64,
    },

    /// Reorder a typed address into "place, district, state" without a lookup
    Normalize {
        /// Address as typed, e.g. "Kukatpally/Hyderabad/Telangana"
        text: String,
    },

    /// Rank available donors near a location
    Search {
        /// JSON file holding an array of donor records
        #[arg(short, long)]
        pool: PathBuf,

        /// Accepted blood type (repeatable; all types when omitted)
        #[arg(short, long = "blood-type")]
        blood_type: Vec<String>,

        /// Search center as text
        #[arg(long, conflicts_with_all = ["lat", "lng"])]
        location: Option<String>,

        /// Search center latitude (e.g. the device position)
        #[arg(long, requires = "lng", allow_negative_numbers = true)]
        lat: Option<f64>,

        /// Search center longitude
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lng: Option<f64>,

        /// Keep only the nearest N donors
        #[arg(short, long)]
        limit: Option<usize>,

        /// Also print map marker positions
        #[arg(short, long)]
        markers: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let telemetry = if cli.verbose {
        TelemetryConfig::verbose()
    } else {
        TelemetryConfig::default()
    };
    if let Err(e) = bloodconnect_telemetry::init_with_config(telemetry) {
        eprintln!("{} {}", "Warning:".yellow().bold(), e);
    }

    let config = cli.config.as_deref();
    let result = match cli.command {
        Commands::Geocode { address } => geocode::run(config, &address, &cli.format).await,

        Commands::Reverse { lat, lng } => geocode::run_reverse(config, lat, lng, &cli.format).await,

        Commands::Normalize { text } => normalize::run(&text, &cli.format),

        Commands::Search { pool, blood_type, location, lat, lng, limit, markers } => {
            let args = search::SearchArgs {
                pool,
                blood_types: blood_type,
                location,
                lat,
                lng,
                limit,
                markers,
            };
            search::run(config, args, &cli.format).await
        }
    };

    tracing::debug!(
        metrics = %bloodconnect_telemetry::metrics().export_json(),
        "Session metrics"
    );

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
