//! HTTP handlers for the injected reference tables

use axum::{
    extract::{Path, State},
    Json,
};
use shared::{ClimateZone, CropProfile};

use crate::error::{AppError, AppResult};
use crate::AppState;

pub async fn list_zones(State(state): State<AppState>) -> Json<Vec<ClimateZone>> {
    Json(state.reference.zones().to_vec())
}

pub async fn get_zone(
    State(state): State<AppState>,
    Path(zone_id): Path<String>,
) -> AppResult<Json<ClimateZone>> {
    state
        .reference
        .find_zone(&zone_id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Climate zone '{}'", zone_id)))
}

pub async fn list_crops(State(state): State<AppState>) -> Json<Vec<CropProfile>> {
    Json(state.reference.crops().to_vec())
}
