//! Seasonal forecast service

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use shared::{
    validate_coordinates, validate_horizon, ClimateReferenceData, EngineSettings, EnsoState,
    ForecastRequest, HistoricalWeatherPattern, Location, RuleBasedSeasonalForecaster,
    SeasonalForecast,
};
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use crate::services::observation::round_coordinate;

/// Input for a seasonal forecast
#[derive(Debug, Clone, Deserialize)]
pub struct SeasonalForecastInput {
    pub location: Location,
    pub zone_id: Option<String>,
    /// `el_nino`, `la_nina` or `neutral`; unknown values fall back to neutral
    pub enso_state: Option<String>,
    pub horizon_months: Option<u32>,
    pub issued_on: Option<NaiveDate>,
}

impl SeasonalForecastInput {
    /// Validate and fill defaults
    pub fn into_request(self, settings: &EngineSettings, today: NaiveDate) -> AppResult<ForecastRequest> {
        validate_coordinates(&self.location.coordinates)
            .map_err(|msg| AppError::validation("location", msg))?;

        let horizon_months = self.horizon_months.unwrap_or(settings.default_horizon_months);
        validate_horizon(horizon_months, settings.max_horizon_months)
            .map_err(|msg| AppError::validation("horizon_months", msg))?;

        Ok(ForecastRequest {
            location: self.location,
            zone_id: self
                .zone_id
                .unwrap_or_else(|| settings.default_zone.clone()),
            enso_state: self
                .enso_state
                .as_deref()
                .map(EnsoState::parse_or_neutral)
                .unwrap_or_default(),
            issued_on: self.issued_on.unwrap_or(today),
            horizon_months,
        })
    }
}

/// Run the forecaster; only fails when no zone can be resolved
pub fn run_forecast(
    reference: &ClimateReferenceData,
    settings: &EngineSettings,
    request: &ForecastRequest,
    patterns: &[HistoricalWeatherPattern],
) -> AppResult<SeasonalForecast> {
    RuleBasedSeasonalForecaster::new(reference, settings.clone())
        .forecast(request, patterns)
        .ok_or_else(|| AppError::Configuration("No climate zones configured".to_string()))
}

/// Forecast service for seasonal simulations
#[derive(Clone)]
pub struct ForecastService {
    db: PgPool,
    reference: Arc<ClimateReferenceData>,
    settings: EngineSettings,
}

impl ForecastService {
    /// Create a new ForecastService instance
    pub fn new(db: PgPool, reference: Arc<ClimateReferenceData>, settings: EngineSettings) -> Self {
        Self {
            db,
            reference,
            settings,
        }
    }

    /// Validate input against the engine settings
    pub fn request(&self, input: SeasonalForecastInput) -> AppResult<ForecastRequest> {
        input.into_request(&self.settings, Utc::now().date_naive())
    }

    /// Forecast from the given patterns and persist the result
    pub async fn seasonal(
        &self,
        request: &ForecastRequest,
        patterns: &[HistoricalWeatherPattern],
    ) -> AppResult<SeasonalForecast> {
        let forecast = run_forecast(&self.reference, &self.settings, request, patterns)?;
        self.save(&forecast).await?;
        Ok(forecast)
    }

    async fn save(&self, forecast: &SeasonalForecast) -> AppResult<()> {
        let record = serde_json::to_value(forecast)
            .map_err(|e| AppError::Internal(format!("Failed to serialize forecast: {}", e)))?;

        sqlx::query(
            r#"
            INSERT INTO seasonal_forecasts (id, latitude, longitude, zone_id, enso_state, issued_on, record, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(forecast.id)
        .bind(round_coordinate(forecast.location.coordinates.latitude))
        .bind(round_coordinate(forecast.location.coordinates.longitude))
        .bind(&forecast.zone_id)
        .bind(forecast.enso_state.as_str())
        .bind(forecast.issued_on)
        .bind(record)
        .bind(forecast.created_at)
        .execute(&self.db)
        .await?;

        Ok(())
    }
}
