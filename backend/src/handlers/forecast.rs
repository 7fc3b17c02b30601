//! HTTP handlers for seasonal forecast endpoints

use axum::{extract::State, Json};
use shared::SeasonalForecast;

use crate::error::AppResult;
use crate::services::forecast::SeasonalForecastInput;
use crate::AppState;

/// Run the seasonal simulation, seeded by the latest stored patterns
pub async fn create_seasonal_forecast(
    State(state): State<AppState>,
    Json(input): Json<SeasonalForecastInput>,
) -> AppResult<Json<SeasonalForecast>> {
    let service = state.forecast_service();
    let request = service.request(input)?;

    let patterns = state
        .analysis_service()
        .latest_patterns(&request.location)
        .await?;
    if patterns.is_empty() {
        tracing::debug!(
            "No stored patterns for {}, forecasting from zone climatology",
            request.location.label()
        );
    }

    let forecast = service.seasonal(&request, &patterns).await?;
    Ok(Json(forecast))
}
