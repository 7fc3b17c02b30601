//! HTTP handlers for analysis endpoints

use axum::{extract::State, Json};
use shared::HistoricalWeatherPattern;

use crate::error::AppResult;
use crate::services::analysis::{
    series_statistics, PatternAnalysisInput, SeriesStatistics, StatisticsInput,
};
use crate::AppState;

/// Descriptive statistics, trend and anomalies for a numeric series
pub async fn analyze_statistics(
    Json(input): Json<StatisticsInput>,
) -> AppResult<Json<SeriesStatistics>> {
    Ok(Json(series_statistics(input)?))
}

/// Build historical patterns from supplied or stored observations
pub async fn analyze_patterns(
    State(state): State<AppState>,
    Json(input): Json<PatternAnalysisInput>,
) -> AppResult<Json<Vec<HistoricalWeatherPattern>>> {
    let service = state.analysis_service();
    let patterns = service
        .analyze(input, &state.observation_service())
        .await?;
    Ok(Json(patterns))
}
