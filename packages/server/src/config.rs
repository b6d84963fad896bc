//! Server configuration.
//!
//! Values come from an optional TOML file and are then overridden by the
//! `BIND_ADDR`, `PORT`, and `PARKWISE_LOCATIONS` environment variables.

use std::path::{Path, PathBuf};

use parkwise_ranking::RankingConfig;
use serde::{Deserialize, Serialize};

/// Errors from loading the server configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("I/O error reading {path}: {source}")]
    Io {
        /// Path of the config file.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The config file is not valid TOML for [`ServerConfig`].
    #[error("Invalid config: {0}")]
    Toml(#[from] toml::de::Error),

    /// An environment override could not be parsed.
    #[error("Invalid value for {name}: {value:?}")]
    InvalidEnv {
        /// Variable name.
        name: &'static str,
        /// Offending value.
        value: String,
    },
}

/// Runtime configuration for the HTTP server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    /// TCP port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// CSV file of per-location ticket summaries.
    #[serde(default = "default_locations_path")]
    pub locations_path: PathBuf,
    /// Number of busiest locations included in the heatmap.
    #[serde(default = "default_heatmap_limit")]
    pub heatmap_limit: usize,
    /// Ranking engine tuning.
    #[serde(default)]
    pub ranking: RankingConfig,
}

fn default_bind_addr() -> String {
    "127.0.0.1".to_string()
}

const fn default_port() -> u16 {
    5000
}

fn default_locations_path() -> PathBuf {
    PathBuf::from("data/locations.csv")
}

const fn default_heatmap_limit() -> usize {
    1000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            port: default_port(),
            locations_path: default_locations_path(),
            heatmap_limit: default_heatmap_limit(),
            ranking: RankingConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Loads the config file at `path` (or defaults when `None`), then
    /// applies environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed, or an
    /// environment override is malformed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
                    path: path.display().to_string(),
                    source: e,
                })?;
                log::info!("Loaded server config from {}", path.display());
                Self::from_toml_str(&text)?
            }
            None => Self::default(),
        };

        config.with_overrides(|name| std::env::var(name).ok())
    }

    /// Parses a TOML document. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Toml`] on malformed input.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::de::from_str(text)?)
    }

    /// Applies `BIND_ADDR`, `PORT`, and `PARKWISE_LOCATIONS` from `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnv`] if `PORT` is not a valid port.
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(bind_addr) = lookup("BIND_ADDR") {
            self.bind_addr = bind_addr;
        }
        if let Some(port) = lookup("PORT") {
            self.port = port
                .parse()
                .map_err(|_| ConfigError::InvalidEnv {
                    name: "PORT",
                    value: port,
                })?;
        }
        if let Some(path) = lookup("PARKWISE_LOCATIONS") {
            self.locations_path = PathBuf::from(path);
        }
        Ok(self)
    }
}
