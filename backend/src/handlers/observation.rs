//! HTTP handlers for observation endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use shared::{DateRange, Location, Observation};

use crate::error::AppResult;
use crate::services::observation::{StoreObservationsInput, StoreObservationsResult};
use crate::AppState;

/// Store a batch of observations
pub async fn store_observations(
    State(state): State<AppState>,
    Json(input): Json<StoreObservationsInput>,
) -> AppResult<Json<StoreObservationsResult>> {
    let service = state.observation_service();
    let result = service.store(input).await?;
    Ok(Json(result))
}

/// Query parameters for stored observations
#[derive(Debug, Deserialize)]
pub struct ObservationQuery {
    pub latitude: Decimal,
    pub longitude: Decimal,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Get stored observations for a location, oldest first
pub async fn list_observations(
    State(state): State<AppState>,
    Query(query): Query<ObservationQuery>,
) -> AppResult<Json<Vec<Observation>>> {
    let end = query.end_date.unwrap_or_else(|| Utc::now().date_naive());
    let range = match query.start_date {
        Some(start) => DateRange::new(start, end),
        None => DateRange::trailing_days(end, state.config.engine.history_days),
    };
    let location = Location::new(query.latitude, query.longitude);

    let service = state.observation_service();
    let observations = service.list(&location, &range).await?;
    Ok(Json(observations))
}
