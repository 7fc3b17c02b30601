//! Prediction service: the full observation → pattern → prediction pipeline
//!
//! I/O happens at the edges: history is loaded first, the pure engine runs on
//! the blocking pool, then the record is persisted and alerts dispatched.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use shared::{
    validate_coordinates, AgroClimaticPrediction, AgroClimaticPredictor, ClimateReferenceData,
    DateRange, EngineSettings, EnsoState, Location, Observation, Pagination, PredictionRequest,
};
use sqlx::PgPool;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::error::{AppError, AppResult};
use crate::models::RecordRow;
use crate::services::alert::AlertDispatcher;
use crate::services::observation::{round_coordinate, ObservationService};

/// Largest accepted batch
pub const MAX_BATCH_SIZE: usize = 100;

/// Input for a single prediction
#[derive(Debug, Clone, Deserialize)]
pub struct PredictionInput {
    pub location: Location,
    pub zone_id: Option<String>,
    /// Defaults to today
    pub date: Option<NaiveDate>,
    pub enso_state: Option<String>,
}

impl PredictionInput {
    /// Validate and fill defaults
    pub fn into_request(self, settings: &EngineSettings, today: NaiveDate) -> AppResult<PredictionRequest> {
        validate_coordinates(&self.location.coordinates)
            .map_err(|msg| AppError::validation("location", msg))?;

        Ok(PredictionRequest {
            location: self.location,
            zone_id: self
                .zone_id
                .unwrap_or_else(|| settings.default_zone.clone()),
            date: self.date.unwrap_or(today),
            enso_state: self
                .enso_state
                .as_deref()
                .map(EnsoState::parse_or_neutral)
                .unwrap_or_default(),
        })
    }
}

/// Input for a batch of predictions
#[derive(Debug, Deserialize)]
pub struct BatchPredictionInput {
    pub requests: Vec<PredictionInput>,
}

/// Outcome for one batch entry, in request order
#[derive(Debug, Clone, Serialize)]
pub struct BatchPredictionItem {
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prediction: Option<AgroClimaticPrediction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchPredictionResult {
    pub succeeded: usize,
    pub failed: usize,
    pub items: Vec<BatchPredictionItem>,
}

/// Run the engine for one request over already-loaded history
pub fn compute_prediction(
    reference: &ClimateReferenceData,
    settings: &EngineSettings,
    request: &PredictionRequest,
    observations: &[Observation],
) -> AgroClimaticPrediction {
    AgroClimaticPredictor::new(reference, settings.clone()).predict(request, observations)
}

/// Prediction service
#[derive(Clone)]
pub struct PredictionService {
    db: PgPool,
    reference: Arc<ClimateReferenceData>,
    settings: EngineSettings,
    observations: ObservationService,
    alerts: AlertDispatcher,
}

impl PredictionService {
    /// Create a new PredictionService instance
    pub fn new(
        db: PgPool,
        reference: Arc<ClimateReferenceData>,
        settings: EngineSettings,
        observations: ObservationService,
        alerts: AlertDispatcher,
    ) -> Self {
        Self {
            db,
            reference,
            settings,
            observations,
            alerts,
        }
    }

    /// Predict for one location/date
    pub async fn predict(&self, input: PredictionInput) -> AppResult<AgroClimaticPrediction> {
        let request = input.into_request(&self.settings, Utc::now().date_naive())?;
        self.run(request).await
    }

    /// Predict for many locations with at most `max_concurrency` in flight.
    ///
    /// Entries fail independently; the batch itself only fails on an empty or
    /// oversized request.
    pub async fn predict_batch(&self, input: BatchPredictionInput) -> AppResult<BatchPredictionResult> {
        if input.requests.is_empty() {
            return Err(AppError::validation("requests", "At least one request is required"));
        }
        if input.requests.len() > MAX_BATCH_SIZE {
            return Err(AppError::validation(
                "requests",
                format!("At most {} requests per batch", MAX_BATCH_SIZE),
            ));
        }

        let today = Utc::now().date_naive();
        let semaphore = Arc::new(Semaphore::new(self.settings.max_concurrency.max(1)));
        let mut tasks = JoinSet::new();
        let mut items = Vec::with_capacity(input.requests.len());

        for (index, entry) in input.requests.into_iter().enumerate() {
            let request = match entry.into_request(&self.settings, today) {
                Ok(request) => request,
                Err(e) => {
                    items.push(BatchPredictionItem {
                        index,
                        prediction: None,
                        error: Some(e.to_string()),
                    });
                    continue;
                }
            };

            let permit = semaphore
                .clone()
                .acquire_owned()
                .await
                .map_err(|e| AppError::Internal(format!("Batch semaphore closed: {}", e)))?;
            let service = self.clone();

            tasks.spawn(async move {
                let result = service.run(request).await;
                drop(permit);
                (index, result)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            let (index, result) =
                joined.map_err(|e| AppError::Internal(format!("Batch task failed: {}", e)))?;
            items.push(match result {
                Ok(prediction) => BatchPredictionItem {
                    index,
                    prediction: Some(prediction),
                    error: None,
                },
                Err(e) => BatchPredictionItem {
                    index,
                    prediction: None,
                    error: Some(e.to_string()),
                },
            });
        }

        items.sort_by_key(|item| item.index);
        let succeeded = items.iter().filter(|i| i.prediction.is_some()).count();
        let failed = items.len() - succeeded;
        tracing::info!("Batch prediction: {} succeeded, {} failed", succeeded, failed);

        Ok(BatchPredictionResult {
            succeeded,
            failed,
            items,
        })
    }

    /// Stored predictions for a location, newest first
    pub async fn list(&self, location: &Location, pagination: &Pagination) -> AppResult<Vec<AgroClimaticPrediction>> {
        let rows = sqlx::query_as::<_, RecordRow>(
            r#"
            SELECT record
            FROM predictions
            WHERE latitude = $1 AND longitude = $2
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(round_coordinate(location.coordinates.latitude))
        .bind(round_coordinate(location.coordinates.longitude))
        .bind(pagination.per_page as i64)
        .bind(pagination.offset())
        .fetch_all(&self.db)
        .await?;

        rows.into_iter()
            .map(|row| {
                serde_json::from_value(row.record)
                    .map_err(|e| AppError::Internal(format!("Corrupt stored prediction: {}", e)))
            })
            .collect()
    }

    async fn run(&self, request: PredictionRequest) -> AppResult<AgroClimaticPrediction> {
        let range = DateRange::trailing_days(request.date, self.settings.history_days);
        let history = self.observations.history(&request.location, &range).await?;

        let reference = self.reference.clone();
        let settings = self.settings.clone();
        let prediction = tokio::task::spawn_blocking(move || {
            compute_prediction(&reference, &settings, &request, &history)
        })
        .await
        .map_err(|e| AppError::Internal(format!("Prediction task failed: {}", e)))?;

        self.save(&prediction).await?;
        self.alerts.dispatch(&prediction).await;
        Ok(prediction)
    }

    async fn save(&self, prediction: &AgroClimaticPrediction) -> AppResult<()> {
        let record = serde_json::to_value(prediction)
            .map_err(|e| AppError::Internal(format!("Failed to serialize prediction: {}", e)))?;

        sqlx::query(
            r#"
            INSERT INTO predictions (id, latitude, longitude, prediction_date, degraded, record, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(prediction.id)
        .bind(round_coordinate(prediction.location.coordinates.latitude))
        .bind(round_coordinate(prediction.location.coordinates.longitude))
        .bind(prediction.date)
        .bind(prediction.degraded)
        .bind(record)
        .bind(prediction.created_at)
        .execute(&self.db)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_input_defaults() {
        let settings = EngineSettings::default();
        let today = NaiveDate::from_ymd_opt(2024, 12, 1).unwrap();
        let request = PredictionInput {
            location: Location::new(Decimal::new(-1783, 2), Decimal::new(3105, 2)),
            zone_id: None,
            date: None,
            enso_state: Some("la_nina".to_string()),
        }
        .into_request(&settings, today)
        .unwrap();

        assert_eq!(request.date, today);
        assert_eq!(request.zone_id, "highveld");
        assert_eq!(request.enso_state, EnsoState::LaNina);
    }

    #[test]
    fn test_input_rejects_bad_coordinates() {
        let settings = EngineSettings::default();
        let today = NaiveDate::from_ymd_opt(2024, 12, 1).unwrap();
        let err = PredictionInput {
            location: Location::new(Decimal::from(95), Decimal::from(31)),
            zone_id: None,
            date: None,
            enso_state: None,
        }
        .into_request(&settings, today)
        .unwrap_err();
        assert!(matches!(err, AppError::Validation { field, .. } if field == "location"));
    }

    #[test]
    fn test_compute_without_history_is_degraded() {
        let reference = ClimateReferenceData::default();
        let settings = EngineSettings::default();
        let request = PredictionRequest {
            location: Location::new(Decimal::new(-1783, 2), Decimal::new(3105, 2)),
            zone_id: "highveld".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 12, 1).unwrap(),
            enso_state: EnsoState::Neutral,
        };
        let prediction = compute_prediction(&reference, &settings, &request, &[]);
        assert!(prediction.degraded);
        assert!((0.0..=100.0).contains(&prediction.yield_prediction));
    }
}
