#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the ParkWise toolchain.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use parkwise_locations::geocode::Geocoder;
use parkwise_locations::heatmap::build_heatmap;
use parkwise_locations::{load_summaries, to_candidates, top_by_count};
use parkwise_ranking::{GeoPoint, RankingEngine};
use parkwise_server::config::ServerConfig;

#[derive(Parser)]
#[command(name = "parkwise", about = "Parking violation risk toolchain")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank locations near a point, least risky first
    Rank {
        /// CSV of per-location ticket summaries
        #[arg(long)]
        data: PathBuf,
        /// Query latitude
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        /// Query longitude
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
        /// Search radius in miles
        #[arg(long, default_value = "0.5")]
        radius: f64,
        /// Maximum number of results (values below 1 mean 1)
        #[arg(long, default_value = "20", allow_negative_numbers = true)]
        limit: i64,
    },
    /// Print the heatmap payload for the busiest locations
    Heatmap {
        /// CSV of per-location ticket summaries
        #[arg(long)]
        data: PathBuf,
        /// Number of busiest locations to include
        #[arg(long, default_value = "1000")]
        limit: usize,
    },
    /// Resolve an address or intersection to coordinates
    Geocode {
        /// Free-text address, e.g. "100 N STATE ST"
        address: String,
    },
    /// Start the HTTP API server
    Serve {
        /// TOML config file; `BIND_ADDR`, `PORT`, and `PARKWISE_LOCATIONS`
        /// override it
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Rank {
            data,
            lat,
            lng,
            radius,
            limit,
        } => rank(&data, GeoPoint::new(lat, lng), radius, limit)?,
        Commands::Heatmap { data, limit } => {
            let rows = top_by_count(&load_summaries(&data)?, limit);
            let points = build_heatmap(&rows, &mut Geocoder::new());
            println!("{}", serde_json::to_string_pretty(&points)?);
        }
        Commands::Geocode { address } => {
            let (lat, lng) = Geocoder::new().geocode(&address);
            println!("{lat}, {lng}");
        }
        Commands::Serve { config } => {
            let config = ServerConfig::load(config.as_deref())?;
            actix_web::rt::System::new().block_on(parkwise_server::run_server(config))?;
        }
    }

    Ok(())
}

fn rank(
    data: &Path,
    query: GeoPoint,
    radius: f64,
    limit: i64,
) -> Result<(), Box<dyn std::error::Error>> {
    let rows = load_summaries(data)?;
    let candidates = to_candidates(&rows, &mut Geocoder::new());

    let mut engine = RankingEngine::default();
    let results = engine.filter_rank(query, radius, &candidates, limit)?;

    let stats = engine.hot_path_stats();
    log::info!(
        "Ranked {} of {} locations (buffer capacity {}, {} allocation(s))",
        results.len(),
        candidates.len(),
        stats.buffer_capacity,
        stats.total_reallocations
    );

    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}
