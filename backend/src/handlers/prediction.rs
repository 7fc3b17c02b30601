//! HTTP handlers for prediction endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use shared::{AgroClimaticPrediction, Location, Pagination};

use crate::error::AppResult;
use crate::services::prediction::{BatchPredictionInput, BatchPredictionResult, PredictionInput};
use crate::AppState;

/// Generate a prediction for one location/date
pub async fn create_prediction(
    State(state): State<AppState>,
    Json(input): Json<PredictionInput>,
) -> AppResult<Json<AgroClimaticPrediction>> {
    let service = state.prediction_service();
    let prediction = service.predict(input).await?;
    Ok(Json(prediction))
}

/// Generate predictions for many locations
pub async fn create_prediction_batch(
    State(state): State<AppState>,
    Json(input): Json<BatchPredictionInput>,
) -> AppResult<Json<BatchPredictionResult>> {
    let service = state.prediction_service();
    let result = service.predict_batch(input).await?;
    Ok(Json(result))
}

/// Query parameters for stored predictions
#[derive(Debug, Deserialize)]
pub struct PredictionQuery {
    pub latitude: Decimal,
    pub longitude: Decimal,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// Get stored predictions for a location, newest first
pub async fn list_predictions(
    State(state): State<AppState>,
    Query(query): Query<PredictionQuery>,
) -> AppResult<Json<Vec<AgroClimaticPrediction>>> {
    let defaults = Pagination::default();
    let pagination = Pagination {
        page: query.page.unwrap_or(defaults.page).max(1),
        per_page: query.per_page.unwrap_or(defaults.per_page).clamp(1, 100),
    };
    let location = Location::new(query.latitude, query.longitude);

    let service = state.prediction_service();
    let predictions = service.list(&location, &pagination).await?;
    Ok(Json(predictions))
}
