#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Candidate, ranked result, and risk level types for the ParkWise
//! ranking engine.
//!
//! This crate contains only data types, configuration structs, and simple
//! conversions. The filtering and ranking pipeline itself lives in
//! `parkwise_ranking`.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Number of working slots allocated the first time the engine grows.
pub const BASELINE_CAPACITY: usize = 1024;

/// Scores strictly above this are [`RiskLevel::High`].
pub const HIGH_RISK_THRESHOLD: f64 = 0.66;

/// Scores strictly above this (and not high) are [`RiskLevel::Medium`].
pub const MEDIUM_RISK_THRESHOLD: f64 = 0.33;

/// A location with aggregated parking violation statistics, as fed to the
/// ranking engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Longitude (WGS84).
    pub longitude: f64,
    /// Number of tickets issued at this location.
    pub violation_count: i64,
    /// Mean fine across those tickets.
    pub average_fine: f64,
    /// Number of distinct violation codes seen at this location.
    pub violation_type_count: i64,
    /// Human-readable location (block address or intersection).
    pub location_label: Option<String>,
}

impl Candidate {
    /// Creates a candidate with a location label.
    #[must_use]
    pub fn new(
        latitude: f64,
        longitude: f64,
        violation_count: i64,
        average_fine: f64,
        violation_type_count: i64,
        location_label: impl Into<String>,
    ) -> Self {
        Self {
            latitude,
            longitude,
            violation_count,
            average_fine,
            violation_type_count,
            location_label: Some(location_label.into()),
        }
    }
}

/// Categorical bucket derived from a normalized risk score.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum RiskLevel {
    /// Score at or below 0.33.
    Low,
    /// Score above 0.33 and at or below 0.66.
    Medium,
    /// Score above 0.66.
    High,
}

impl RiskLevel {
    /// Classifies a risk score in `[0, 1]`.
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score > HIGH_RISK_THRESHOLD {
            Self::High
        } else if score > MEDIUM_RISK_THRESHOLD {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

/// One entry of a ranking call's output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedResult {
    /// Location label, empty when the candidate had none.
    #[serde(rename = "location")]
    pub location_label: String,
    /// Latitude.
    #[serde(rename = "lat")]
    pub latitude: f64,
    /// Longitude.
    #[serde(rename = "lng")]
    pub longitude: f64,
    /// Great-circle distance from the query point, in miles.
    pub distance: f64,
    /// Number of tickets issued at this location.
    pub violation_count: i64,
    /// Mean fine.
    #[serde(rename = "avgFine")]
    pub average_fine: f64,
    /// Number of distinct violation codes.
    #[serde(rename = "violationTypes")]
    pub violation_type_count: i64,
    /// Violation count normalized against the other survivors, in `[0, 1]`.
    pub risk_score: f64,
    /// Bucketed [`Self::risk_score`].
    pub risk_level: RiskLevel,
}

/// Allocation counters for the engine's reusable working buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotPathStats {
    /// Growth events during the most recent `filter_rank` call.
    pub allocations_last_call: u64,
    /// Growth events over the engine's lifetime.
    pub total_reallocations: u64,
    /// Current number of working slots.
    pub buffer_capacity: usize,
}

/// Tuning for a ranking engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingConfig {
    /// Slots allocated on first growth; later growth doubles from the
    /// current capacity. Defaults to 1024.
    #[serde(default = "default_baseline_capacity")]
    pub baseline_capacity: usize,
}

const fn default_baseline_capacity() -> usize {
    BASELINE_CAPACITY
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            baseline_capacity: default_baseline_capacity(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn risk_level_thresholds() {
        assert_eq!(RiskLevel::from_score(0.67), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(0.34), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(0.33), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(0.0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(1.0), RiskLevel::High);
    }

    #[test]
    fn risk_level_boundaries_are_inclusive_below() {
        assert_eq!(RiskLevel::from_score(0.66), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(0.660_001), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(0.330_001), RiskLevel::Medium);
    }

    #[test]
    fn risk_level_display_and_parse() {
        assert_eq!(RiskLevel::High.to_string(), "High");
        assert_eq!("Medium".parse::<RiskLevel>().ok(), Some(RiskLevel::Medium));
        assert!("medium-ish".parse::<RiskLevel>().is_err());
    }

    #[test]
    fn ranked_result_serializes_camel_case() {
        let result = RankedResult {
            location_label: "100 N STATE ST".to_string(),
            latitude: 41.88,
            longitude: -87.62,
            distance: 0.25,
            violation_count: 12,
            average_fine: 60.0,
            violation_type_count: 3,
            risk_score: 0.5,
            risk_level: RiskLevel::Medium,
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["location"], "100 N STATE ST");
        assert_eq!(json["lat"], 41.88);
        assert_eq!(json["violationCount"], 12);
        assert_eq!(json["avgFine"], 60.0);
        assert_eq!(json["violationTypes"], 3);
        assert_eq!(json["riskScore"], 0.5);
        assert_eq!(json["riskLevel"], "Medium");
    }

    #[test]
    fn config_defaults_when_fields_missing() {
        let config: RankingConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, RankingConfig::default());
        assert_eq!(config.baseline_capacity, 1024);
    }
}
