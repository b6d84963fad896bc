#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the ParkWise server.
//!
//! Every endpoint answers with a `{status, data, metadata}` envelope on
//! success and `{status, message}` on failure. These types are separate
//! from the engine types so the wire contract can evolve on its own.

use serde::{Deserialize, Serialize};

pub use parkwise_ranking_models::{HotPathStats, RankedResult, RiskLevel};

/// Default search radius in miles.
pub const DEFAULT_RADIUS_MILES: f64 = 0.5;

/// Default number of ranked results.
pub const DEFAULT_LIMIT: i64 = 20;

/// Outcome tag carried by every envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiStatus {
    Success,
    Error,
}

/// Successful response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T, M = ()> {
    /// Always [`ApiStatus::Success`].
    pub status: ApiStatus,
    /// Endpoint payload.
    pub data: T,
    /// Endpoint-specific metadata, omitted when the endpoint has none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<M>,
}

impl<T, M> ApiResponse<T, M> {
    #[must_use]
    pub const fn with_metadata(data: T, metadata: M) -> Self {
        Self {
            status: ApiStatus::Success,
            data,
            metadata: Some(metadata),
        }
    }
}

impl<T> ApiResponse<T> {
    #[must_use]
    pub const fn new(data: T) -> Self {
        Self {
            status: ApiStatus::Success,
            data,
            metadata: None,
        }
    }
}

/// Failed response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Always [`ApiStatus::Error`].
    pub status: ApiStatus,
    /// Human-readable reason.
    pub message: String,
}

impl ApiError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: ApiStatus::Error,
            message: message.into(),
        }
    }
}

/// Query parameters for `GET /api/nearest-violations`.
#[derive(Debug, Clone, Deserialize)]
pub struct NearestQueryParams {
    /// Query latitude (required).
    pub lat: Option<f64>,
    /// Query longitude (required).
    pub lng: Option<f64>,
    /// Search radius in miles.
    pub radius: Option<f64>,
    /// Maximum number of results; values below 1 mean 1.
    pub limit: Option<i64>,
}

/// Metadata for the nearest-violations response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearestMetadata {
    /// Echo of the query latitude.
    pub user_lat: f64,
    /// Echo of the query longitude.
    pub user_lng: f64,
    /// Radius actually used, in miles.
    pub radius: f64,
    /// Number of results returned.
    pub total_found: usize,
}

/// Metadata for the heatmap response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapMetadata {
    /// Number of points in the payload.
    pub total_locations: usize,
}

/// Query parameters for `GET /api/geocode`.
#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeQueryParams {
    /// Free-text address or intersection.
    pub address: Option<String>,
}

/// Resolved address.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiGeocode {
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lng: f64,
    /// The address as it was resolved.
    pub normalized_address: String,
}

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Server version.
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_envelope_omits_missing_metadata() {
        let json = serde_json::to_value(ApiResponse::new(vec![1, 2])).unwrap();
        assert_eq!(json, serde_json::json!({"status": "success", "data": [1, 2]}));
    }

    #[test]
    fn nearest_metadata_is_camel_case() {
        let response = ApiResponse::with_metadata(
            Vec::<RankedResult>::new(),
            NearestMetadata {
                user_lat: 41.88,
                user_lng: -87.63,
                radius: 0.5,
                total_found: 0,
            },
        );
        let json = serde_json::to_value(response).unwrap();
        assert_eq!(json["metadata"]["userLat"], 41.88);
        assert_eq!(json["metadata"]["totalFound"], 0);
    }

    #[test]
    fn error_envelope() {
        let json = serde_json::to_value(ApiError::new("lat and lng parameters are required"))
            .unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["message"], "lat and lng parameters are required");
    }
}
