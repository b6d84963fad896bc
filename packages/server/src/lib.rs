#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for ParkWise.
//!
//! Loads the per-location ticket summaries once at startup, geocodes them
//! into ranking candidates, precomputes the heatmap, and serves the
//! nearest-violation ranking from a single shared
//! [`RankingEngine`](parkwise_ranking::RankingEngine). The engine reuses
//! one working buffer across requests, so it sits behind a `Mutex` and
//! requests are ranked one at a time.

pub mod config;
mod handlers;

use std::sync::Mutex;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use parkwise_locations::geocode::Geocoder;
use parkwise_locations::heatmap::{HeatmapPoint, build_heatmap};
use parkwise_locations::{LocationSummary, LocationsError, load_summaries, to_candidates};
use parkwise_ranking::{Candidate, RankingEngine};

use config::ServerConfig;

/// Shared application state.
pub struct AppState {
    /// Ranking engine and its reusable working buffer.
    pub engine: Mutex<RankingEngine>,
    /// Geocoded locations, in file order.
    pub candidates: Vec<Candidate>,
    /// Heatmap for the busiest locations.
    pub heatmap: Vec<HeatmapPoint>,
    /// Geocoder for ad-hoc address lookups; shares its cache with startup.
    pub geocoder: Mutex<Geocoder>,
}

impl AppState {
    /// Builds state from already-loaded summaries.
    #[must_use]
    pub fn new(rows: &[LocationSummary], config: &ServerConfig) -> Self {
        let mut geocoder = Geocoder::new();
        let candidates = to_candidates(rows, &mut geocoder);
        let busiest = parkwise_locations::top_by_count(rows, config.heatmap_limit);
        let heatmap = build_heatmap(&busiest, &mut geocoder);

        log::info!(
            "Prepared {} candidates and {} heatmap points ({} distinct locations geocoded)",
            candidates.len(),
            heatmap.len(),
            geocoder.cached()
        );

        Self {
            engine: Mutex::new(RankingEngine::new(config.ranking)),
            candidates,
            heatmap,
            geocoder: Mutex::new(geocoder),
        }
    }

    /// Reads the summaries named by `config` and builds state from them.
    ///
    /// # Errors
    ///
    /// Returns [`LocationsError`] if the summary file cannot be read.
    pub fn load(config: &ServerConfig) -> Result<Self, LocationsError> {
        let rows = load_summaries(&config.locations_path)?;
        Ok(Self::new(&rows, config))
    }
}

/// Registers the `/api` routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route(
                "/nearest-violations",
                web::get().to(handlers::nearest_violations),
            )
            .route("/heatmap-data", web::get().to(handlers::heatmap_data))
            .route("/geocode", web::get().to(handlers::geocode))
            .route("/hot-path-stats", web::get().to(handlers::hot_path_stats)),
    );
}

/// Starts the ParkWise API server.
///
/// Loads location summaries from `config.locations_path`, builds the shared
/// state, and runs the Actix-Web HTTP server until shutdown. The caller
/// provides the async runtime (e.g. via `#[actix_web::main]`) and
/// initializes logging.
///
/// # Errors
///
/// Returns an `std::io::Result` error if the summaries cannot be loaded,
/// or the HTTP server fails to bind or encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server(config: ServerConfig) -> std::io::Result<()> {
    log::info!(
        "Loading location summaries from {}...",
        config.locations_path.display()
    );
    let state = web::Data::new(AppState::load(&config).map_err(std::io::Error::other)?);

    let ServerConfig { bind_addr, port, .. } = config;
    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
