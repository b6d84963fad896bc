//! HTTP handler functions for the ParkWise API.

use std::sync::PoisonError;

use actix_web::{HttpResponse, web};
use parkwise_ranking::GeoPoint;
use parkwise_server_models::{
    ApiError, ApiGeocode, ApiHealth, ApiResponse, DEFAULT_LIMIT, DEFAULT_RADIUS_MILES,
    GeocodeQueryParams, HeatmapMetadata, NearestMetadata, NearestQueryParams,
};

use crate::AppState;

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/nearest-violations`
///
/// Ranks the loaded locations within `radius` miles of `(lat, lng)`,
/// least risky first.
pub async fn nearest_violations(
    state: web::Data<AppState>,
    params: web::Query<NearestQueryParams>,
) -> HttpResponse {
    let (Some(lat), Some(lng)) = (params.lat, params.lng) else {
        return HttpResponse::BadRequest().json(ApiError::new("lat and lng parameters are required"));
    };
    let radius = params.radius.unwrap_or(DEFAULT_RADIUS_MILES);
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT);

    // The engine's buffer is cleared at the start of every call, so a
    // poisoned lock still guards a usable engine.
    let outcome = state
        .engine
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .filter_rank(GeoPoint::new(lat, lng), radius, &state.candidates, limit);

    match outcome {
        Ok(results) => {
            log::debug!(
                "/api/nearest-violations => lat={lat}, lng={lng}, radius={radius}, results={}",
                results.len()
            );
            let metadata = NearestMetadata {
                user_lat: lat,
                user_lng: lng,
                radius,
                total_found: results.len(),
            };
            HttpResponse::Ok().json(ApiResponse::with_metadata(results, metadata))
        }
        Err(e) => {
            log::error!("Failed to rank nearest violations: {e}");
            HttpResponse::InternalServerError().json(ApiError::new(e.to_string()))
        }
    }
}

/// `GET /api/heatmap-data`
///
/// Returns the heatmap precomputed at startup for the busiest locations.
pub async fn heatmap_data(state: web::Data<AppState>) -> HttpResponse {
    let metadata = HeatmapMetadata {
        total_locations: state.heatmap.len(),
    };
    HttpResponse::Ok().json(ApiResponse::with_metadata(&state.heatmap, metadata))
}

/// `GET /api/geocode`
///
/// Resolves a free-text address with the offline geocoder.
pub async fn geocode(
    state: web::Data<AppState>,
    params: web::Query<GeocodeQueryParams>,
) -> HttpResponse {
    let address = params.address.as_deref().map(str::trim).unwrap_or_default();
    if address.is_empty() {
        return HttpResponse::BadRequest().json(ApiError::new("address parameter is required"));
    }

    let (lat, lng) = state
        .geocoder
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .geocode(address);

    HttpResponse::Ok().json(ApiResponse::new(ApiGeocode {
        lat,
        lng,
        normalized_address: address.to_string(),
    }))
}

/// `GET /api/hot-path-stats`
///
/// Allocation counters of the shared ranking engine.
pub async fn hot_path_stats(state: web::Data<AppState>) -> HttpResponse {
    let stats = state
        .engine
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .hot_path_stats();
    HttpResponse::Ok().json(stats)
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use parkwise_locations::LocationSummary;
    use parkwise_server_models::{ApiStatus, HotPathStats, RankedResult, RiskLevel};

    use crate::config::ServerConfig;
    use crate::{AppState, configure};

    fn summary(location: &str, violation_count: i64) -> LocationSummary {
        LocationSummary {
            location: location.to_string(),
            violation_count,
            avg_fine: 60.0,
            violation_types: 2,
        }
    }

    fn state() -> actix_web::web::Data<AppState> {
        let rows = vec![
            summary("100 N STATE ST", 40),
            summary("200 S CLARK ST", 10),
            summary("50 W ADAMS ST", 25),
        ];
        actix_web::web::Data::new(AppState::new(&rows, &ServerConfig::default()))
    }

    #[actix_web::test]
    async fn health_reports_version() {
        let app = test::init_service(App::new().configure(configure)).await;
        let req = test::TestRequest::get().uri("/api/health").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["healthy"], true);
    }

    #[actix_web::test]
    async fn nearest_requires_coordinates() {
        let app = test::init_service(App::new().app_data(state()).configure(configure)).await;
        let req = test::TestRequest::get()
            .uri("/api/nearest-violations?lat=41.88")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], "error");
    }

    #[actix_web::test]
    async fn nearest_ranks_least_risky_first() {
        let app = test::init_service(App::new().app_data(state()).configure(configure)).await;
        let req = test::TestRequest::get()
            .uri("/api/nearest-violations?lat=41.8819&lng=-87.6278&radius=2&limit=2")
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["status"], "success");
        assert_eq!(body["metadata"]["totalFound"], 2);
        let data: Vec<RankedResult> = serde_json::from_value(body["data"].clone()).unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data[0].location_label, "200 S CLARK ST");
        assert_eq!(data[0].risk_level, RiskLevel::Low);
        assert!(data[0].risk_score <= data[1].risk_score);
    }

    #[actix_web::test]
    async fn stats_reflect_engine_use() {
        let app = test::init_service(App::new().app_data(state()).configure(configure)).await;

        let req = test::TestRequest::get()
            .uri("/api/nearest-violations?lat=41.8819&lng=-87.6278")
            .to_request();
        assert!(test::call_service(&app, req).await.status().is_success());

        let req = test::TestRequest::get().uri("/api/hot-path-stats").to_request();
        let stats: HotPathStats = test::call_and_read_body_json(&app, req).await;
        assert_eq!(stats.buffer_capacity, 1024);
        assert_eq!(stats.total_reallocations, 1);
    }

    #[actix_web::test]
    async fn heatmap_includes_every_location() {
        let app = test::init_service(App::new().app_data(state()).configure(configure)).await;
        let req = test::TestRequest::get().uri("/api/heatmap-data").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["metadata"]["totalLocations"], 3);
        assert_eq!(body["data"][0]["intensity"], 1.0);
    }

    #[actix_web::test]
    async fn geocode_rejects_blank_address() {
        let app = test::init_service(App::new().app_data(state()).configure(configure)).await;
        let req = test::TestRequest::get()
            .uri("/api/geocode?address=%20")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn geocode_resolves_address() {
        let app = test::init_service(App::new().app_data(state()).configure(configure)).await;
        let req = test::TestRequest::get()
            .uri("/api/geocode?address=100%20N%20WELLS%20ST")
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["status"], serde_json::to_value(ApiStatus::Success).unwrap());
        assert_eq!(body["data"]["normalizedAddress"], "100 N WELLS ST");
        assert!(body["data"]["lat"].is_f64());
    }
}
