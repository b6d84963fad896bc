#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Standalone entry point for the ParkWise API server.
//!
//! Reads an optional TOML config from `PARKWISE_CONFIG`; `BIND_ADDR`,
//! `PORT`, and `PARKWISE_LOCATIONS` override it.

use std::path::PathBuf;

use parkwise_server::config::ServerConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let config_path = std::env::var("PARKWISE_CONFIG").ok().map(PathBuf::from);
    let config = ServerConfig::load(config_path.as_deref()).map_err(std::io::Error::other)?;

    parkwise_server::run_server(config).await
}
