//! API integration tests
//!
//! Router-level tests that never reach the database:
//! - Health and reference endpoints
//! - Series statistics
//! - Request validation errors

use std::time::Duration;

use agroclimate_backend::{create_app, AppState, Config};
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;

/// App backed by a pool that cannot connect
fn app() -> Router {
    let db = PgPoolOptions::new()
        .acquire_timeout(Duration::from_millis(200))
        .connect_lazy("postgres://localhost:1/agroclimate")
        .unwrap();
    let state = AppState::new(db, Config::default()).unwrap();
    create_app(state)
}

async fn send(request: Request<Body>) -> (StatusCode, Value) {
    let response = app().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[tokio::test]
    async fn test_health_reports_database_down() {
        let (status, body) = send(get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["database"], "disconnected");
        assert!(body["climate_zones"].as_u64().unwrap() > 0);
    }

    #[tokio::test]
    async fn test_reference_zones_and_crops() {
        let (status, zones) = send(get("/api/v1/reference/zones")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(zones
            .as_array()
            .unwrap()
            .iter()
            .any(|z| z["zone_id"] == "highveld"));

        let (status, crops) = send(get("/api/v1/reference/crops")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(crops.as_array().unwrap().iter().any(|c| c["crop_id"] == "maize"));
    }

    #[tokio::test]
    async fn test_unknown_zone_is_not_found() {
        let (status, body) = send(get("/api/v1/reference/zones/atlantis")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_statistics_flags_spike() {
        let points: Vec<Value> = (1..=30)
            .map(|day| {
                let value = if day == 15 { 40.0 } else { 20.0 + (day % 2) as f64 * 0.2 };
                json!({ "timestamp": format!("2024-01-{:02}T12:00:00Z", day), "value": value })
            })
            .collect();

        let (status, body) = send(post(
            "/api/v1/analysis/statistics",
            json!({ "category": "temperature", "points": points }),
        ))
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["descriptive"]["count"], 30);
        let anomalies = body["anomalies"].as_array().unwrap();
        assert_eq!(anomalies.len(), 1);
        assert_eq!(anomalies[0]["severity"], "high");
    }

    #[tokio::test]
    async fn test_forecast_horizon_out_of_range() {
        let (status, body) = send(post(
            "/api/v1/forecasts/seasonal",
            json!({
                "location": { "coordinates": { "latitude": "-17.83", "longitude": "31.05" } },
                "horizon_months": 13
            }),
        ))
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(body["error"]["field"], "horizon_months");
    }

    #[tokio::test]
    async fn test_empty_batches_rejected() {
        let (status, body) = send(post("/api/v1/predictions/batch", json!({ "requests": [] }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["field"], "requests");

        let (status, body) = send(post("/api/v1/observations", json!({ "observations": [] }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["field"], "observations");
    }

    #[test]
    fn test_root_banner() {
        let response = tokio_test::block_on(async { app().oneshot(get("/")).await.unwrap() });
        assert_eq!(response.status(), StatusCode::OK);
    }
}
