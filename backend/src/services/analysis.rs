//! Analysis service: series statistics and historical pattern runs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use shared::engine::statistics::{self, TrendStats};
use shared::{
    partition_valid, validate_coordinates, AnomalyCategory, AnomalyDetector, DateRange, DescriptiveStats,
    EngineSettings, HistoricalWeatherPattern, Location, SeasonalPatternAnalyzer, WeatherAnomaly,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::RecordRow;
use crate::services::observation::{round_coordinate, ObservationService};

/// One point of a numeric series
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

/// Input for series statistics
#[derive(Debug, Deserialize)]
pub struct StatisticsInput {
    /// Defaults to temperature; precipitation uses one-sided detection
    pub category: Option<AnomalyCategory>,
    pub points: Vec<SeriesPoint>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeriesStatistics {
    pub category: AnomalyCategory,
    pub descriptive: DescriptiveStats,
    pub trend: TrendStats,
    pub anomalies: Vec<WeatherAnomaly>,
}

/// Input for a pattern analysis run
#[derive(Debug, Deserialize)]
pub struct PatternAnalysisInput {
    pub location: Location,
    /// Analyze these instead of the stored history
    pub observations: Option<Vec<shared::Observation>>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Descriptive statistics, trend and anomalies for one series
pub fn series_statistics(input: StatisticsInput) -> AppResult<SeriesStatistics> {
    if let Some(index) = input.points.iter().position(|p| !p.value.is_finite()) {
        return Err(AppError::validation(
            format!("points[{}].value", index),
            "Series values must be finite numbers",
        ));
    }

    let category = input.category.unwrap_or(AnomalyCategory::Temperature);
    let mut series: Vec<(DateTime<Utc>, f64)> =
        input.points.iter().map(|p| (p.timestamp, p.value)).collect();
    series.sort_by_key(|(timestamp, _)| *timestamp);
    let values: Vec<f64> = series.iter().map(|(_, v)| *v).collect();

    let detector = AnomalyDetector::default();
    let anomalies = match category {
        AnomalyCategory::Precipitation => detector.detect_precipitation(&series),
        other => detector.detect(other, &series),
    };

    Ok(SeriesStatistics {
        category,
        descriptive: statistics::describe(&values),
        trend: statistics::trend_stats(&values),
        anomalies,
    })
}

/// Analysis service for pattern runs
#[derive(Clone)]
pub struct AnalysisService {
    db: PgPool,
    settings: EngineSettings,
}

impl AnalysisService {
    /// Create a new AnalysisService instance
    pub fn new(db: PgPool, settings: EngineSettings) -> Self {
        Self { db, settings }
    }

    /// Build and persist patterns from supplied or stored observations
    pub async fn analyze(
        &self,
        input: PatternAnalysisInput,
        observations: &ObservationService,
    ) -> AppResult<Vec<HistoricalWeatherPattern>> {
        validate_coordinates(&input.location.coordinates)
            .map_err(|msg| AppError::validation("location", msg))?;

        let history = match input.observations {
            Some(supplied) => {
                let (accepted, rejected) = partition_valid(supplied);
                if let Some((index, reason)) = rejected.into_iter().next() {
                    return Err(AppError::validation(format!("observations[{}]", index), reason));
                }
                accepted
            }
            None => {
                let end = input.end_date.unwrap_or_else(|| Utc::now().date_naive());
                let range = match input.start_date {
                    Some(start) => DateRange::new(start, end),
                    None => DateRange::trailing_days(end, self.settings.history_days),
                };
                observations.history(&input.location, &range).await?
            }
        };

        let analyzer = SeasonalPatternAnalyzer::new(&self.settings);
        let patterns = analyzer.analyze(&input.location, &history);
        self.save_patterns(&input.location, &patterns).await?;
        Ok(patterns)
    }

    /// Persist one analysis run; later runs supersede earlier ones
    pub async fn save_patterns(
        &self,
        location: &Location,
        patterns: &[HistoricalWeatherPattern],
    ) -> AppResult<()> {
        if patterns.is_empty() {
            return Ok(());
        }

        let run_id = Uuid::new_v4();
        let mut tx = self.db.begin().await?;
        for pattern in patterns {
            let record = serde_json::to_value(pattern)
                .map_err(|e| AppError::Internal(format!("Failed to serialize pattern: {}", e)))?;
            sqlx::query(
                r#"
                INSERT INTO weather_patterns (id, run_id, latitude, longitude, period_label, granularity, record, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(pattern.id)
            .bind(run_id)
            .bind(round_coordinate(location.coordinates.latitude))
            .bind(round_coordinate(location.coordinates.longitude))
            .bind(&pattern.period_label)
            .bind(pattern.granularity.to_string())
            .bind(record)
            .bind(pattern.created_at)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;

        tracing::info!(
            "Saved {} patterns for {} (run {})",
            patterns.len(),
            location.label(),
            run_id
        );
        Ok(())
    }

    /// Patterns from the most recent run for a location
    pub async fn latest_patterns(&self, location: &Location) -> AppResult<Vec<HistoricalWeatherPattern>> {
        let rows = sqlx::query_as::<_, RecordRow>(
            r#"
            SELECT record
            FROM weather_patterns
            WHERE run_id = (
                SELECT run_id FROM weather_patterns
                WHERE latitude = $1 AND longitude = $2
                ORDER BY created_at DESC
                LIMIT 1
            )
            "#,
        )
        .bind(round_coordinate(location.coordinates.latitude))
        .bind(round_coordinate(location.coordinates.longitude))
        .fetch_all(&self.db)
        .await?;

        rows.into_iter()
            .map(|row| {
                serde_json::from_value(row.record)
                    .map_err(|e| AppError::Internal(format!("Corrupt stored pattern: {}", e)))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use shared::AnomalySeverity;

    fn points(values: &[f64]) -> Vec<SeriesPoint> {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        values
            .iter()
            .enumerate()
            .map(|(i, v)| SeriesPoint {
                timestamp: start + Duration::days(i as i64),
                value: *v,
            })
            .collect()
    }

    #[test]
    fn test_series_statistics_flags_spike() {
        let mut values = vec![20.0; 20];
        values[5] = 40.0;
        let stats = series_statistics(StatisticsInput {
            category: None,
            points: points(&values),
        })
        .unwrap();

        assert_eq!(stats.category, AnomalyCategory::Temperature);
        assert_eq!(stats.descriptive.count, 20);
        assert_eq!(stats.descriptive.max, 40.0);
        assert_eq!(stats.anomalies.len(), 1);
        assert_eq!(stats.anomalies[0].severity, AnomalySeverity::High);
    }

    #[test]
    fn test_series_statistics_rejects_nan() {
        let err = series_statistics(StatisticsInput {
            category: Some(AnomalyCategory::Humidity),
            points: points(&[50.0, f64::NAN]),
        })
        .unwrap_err();
        assert!(matches!(err, AppError::Validation { field, .. } if field == "points[1].value"));
    }

    #[test]
    fn test_series_statistics_empty_is_neutral() {
        let stats = series_statistics(StatisticsInput {
            category: Some(AnomalyCategory::Precipitation),
            points: vec![],
        })
        .unwrap();
        assert_eq!(stats.descriptive.count, 0);
        assert_eq!(stats.trend.slope, 0.0);
        assert!(stats.anomalies.is_empty());
    }
}
