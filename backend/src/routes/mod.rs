//! Route definitions for the Agro-Climate Advisory Platform

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/observations", observation_routes())
        .nest("/analysis", analysis_routes())
        .nest("/forecasts", forecast_routes())
        .nest("/predictions", prediction_routes())
        .nest("/reference", reference_routes())
}

/// Observation history routes
fn observation_routes() -> Router<AppState> {
    Router::new().route(
        "/",
        get(handlers::list_observations).post(handlers::store_observations),
    )
}

/// Statistics and pattern analysis routes
fn analysis_routes() -> Router<AppState> {
    Router::new()
        .route("/statistics", post(handlers::analyze_statistics))
        .route("/patterns", post(handlers::analyze_patterns))
}

/// Seasonal forecast routes
fn forecast_routes() -> Router<AppState> {
    Router::new().route("/seasonal", post(handlers::create_seasonal_forecast))
}

/// Prediction routes
fn prediction_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_predictions).post(handlers::create_prediction),
        )
        .route("/batch", post(handlers::create_prediction_batch))
}

/// Reference table routes
fn reference_routes() -> Router<AppState> {
    Router::new()
        .route("/zones", get(handlers::list_zones))
        .route("/zones/:zone_id", get(handlers::get_zone))
        .route("/crops", get(handlers::list_crops))
}
