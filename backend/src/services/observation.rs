//! Observation service: the engine's data source
//!
//! History comes from the `observations` table first and from the archive API
//! when the table has nothing for the requested range. An empty history is a
//! valid result.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::{partition_valid, validate_date_range, DateRange, Location, Observation};
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use crate::external::ArchiveClient;
use crate::models::ObservationRow;

/// Observation service for storing and loading history
#[derive(Clone)]
pub struct ObservationService {
    db: PgPool,
    archive: Option<ArchiveClient>,
}

/// Input for storing a batch of observations
#[derive(Debug, Deserialize)]
pub struct StoreObservationsInput {
    pub observations: Vec<Observation>,
    pub source: Option<String>,
}

/// One observation that failed boundary validation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RejectedObservation {
    pub index: usize,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoreObservationsResult {
    pub stored: usize,
    pub rejected: Vec<RejectedObservation>,
}

impl ObservationService {
    /// Create a new ObservationService backed by the database only
    pub fn new(db: PgPool) -> Self {
        Self { db, archive: None }
    }

    /// Create a new ObservationService with archive fallback
    pub fn with_archive(db: PgPool, archive: ArchiveClient) -> Self {
        Self {
            db,
            archive: Some(archive),
        }
    }

    /// Validate and store a batch. Invalid entries are reported, not stored;
    /// duplicates (same location and timestamp) are ignored.
    pub async fn store(&self, input: StoreObservationsInput) -> AppResult<StoreObservationsResult> {
        if input.observations.is_empty() {
            return Err(AppError::validation(
                "observations",
                "At least one observation is required",
            ));
        }

        let source = input.source.unwrap_or_else(|| "manual".to_string());
        let (accepted, rejected) = partition_valid(input.observations);
        for (index, reason) in &rejected {
            tracing::warn!("Rejected observation {}: {}", index, reason);
        }

        let stored = self.insert(&accepted, &source).await?;

        Ok(StoreObservationsResult {
            stored,
            rejected: rejected
                .into_iter()
                .map(|(index, reason)| RejectedObservation { index, reason })
                .collect(),
        })
    }

    /// Stored observations for a location within a date range, oldest first
    pub async fn list(&self, location: &Location, range: &DateRange) -> AppResult<Vec<Observation>> {
        validate_date_range(range).map_err(|msg| AppError::validation("date_range", msg))?;

        let rows = sqlx::query_as::<_, ObservationRow>(
            r#"
            SELECT latitude, longitude, location_name, recorded_at,
                   temperature_celsius, humidity_percent, precipitation_mm,
                   wind_speed_kmh, pressure_hpa, uv_index, cloud_cover_percent,
                   wind_direction_deg
            FROM observations
            WHERE latitude = $1 AND longitude = $2
              AND recorded_at >= $3::date
              AND recorded_at < ($4::date + INTERVAL '1 day')
            ORDER BY recorded_at ASC
            "#,
        )
        .bind(round_coordinate(location.coordinates.latitude))
        .bind(round_coordinate(location.coordinates.longitude))
        .bind(range.start)
        .bind(range.end)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Observation::from).collect())
    }

    /// History for the engine: database first, then the archive
    pub async fn history(&self, location: &Location, range: &DateRange) -> AppResult<Vec<Observation>> {
        let stored = self.list(location, range).await?;
        if !stored.is_empty() {
            return Ok(stored);
        }

        let Some(archive) = self.archive.as_ref() else {
            tracing::info!("No stored history for {} and no archive configured", location.label());
            return Ok(Vec::new());
        };

        let fetched = match archive.fetch_daily(location, range).await {
            Ok(observations) => observations,
            Err(e) => {
                tracing::warn!("Archive fallback failed for {}: {}", location.label(), e);
                return Ok(Vec::new());
            }
        };

        let (accepted, rejected) = partition_valid(fetched);
        if !rejected.is_empty() {
            tracing::warn!(
                "Dropped {} archive observations for {} that failed validation",
                rejected.len(),
                location.label()
            );
        }

        // Cache for the next request; a failed write does not fail this one
        if let Err(e) = self.insert(&accepted, "archive").await {
            tracing::warn!("Failed to cache archive observations: {}", e);
        }

        Ok(accepted)
    }

    async fn insert(&self, observations: &[Observation], source: &str) -> AppResult<usize> {
        if observations.is_empty() {
            return Ok(0);
        }

        let mut tx = self.db.begin().await?;
        let mut stored = 0;
        for observation in observations {
            let result = sqlx::query(
                r#"
                INSERT INTO observations (
                    latitude, longitude, location_name, recorded_at,
                    temperature_celsius, humidity_percent, precipitation_mm,
                    wind_speed_kmh, pressure_hpa, uv_index, cloud_cover_percent,
                    wind_direction_deg, source
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
                ON CONFLICT (latitude, longitude, recorded_at) DO NOTHING
                "#,
            )
            .bind(round_coordinate(observation.location.coordinates.latitude))
            .bind(round_coordinate(observation.location.coordinates.longitude))
            .bind(&observation.location.name)
            .bind(observation.timestamp)
            .bind(observation.temperature_celsius)
            .bind(observation.humidity_percent)
            .bind(observation.precipitation_mm)
            .bind(observation.wind_speed_kmh)
            .bind(observation.pressure_hpa)
            .bind(observation.uv_index)
            .bind(observation.cloud_cover_percent)
            .bind(observation.wind_direction_deg)
            .bind(source)
            .execute(&mut *tx)
            .await?;
            stored += result.rows_affected() as usize;
        }
        tx.commit().await?;

        tracing::info!("Stored {} of {} observations", stored, observations.len());
        Ok(stored)
    }
}

/// Column precision is six decimal places
pub fn round_coordinate(value: Decimal) -> Decimal {
    value.round_dp(6)
}
