//! Historical weather archive client
//!
//! Fetches daily aggregates from an Open-Meteo archive compatible API and
//! turns them into observation records.

use std::time::Duration;

use chrono::{NaiveDate, NaiveTime};
use reqwest::Client;
use serde::Deserialize;
use shared::{DateRange, Location, Observation};

use crate::config::DataSourceConfig;
use crate::error::{AppError, AppResult};

const DAILY_FIELDS: &str = "temperature_2m_mean,relative_humidity_2m_mean,precipitation_sum,wind_speed_10m_max,surface_pressure_mean";

/// Archive API client
#[derive(Clone)]
pub struct ArchiveClient {
    client: Client,
    base_url: String,
}

/// Archive API response
#[derive(Debug, Deserialize)]
pub struct ArchiveResponse {
    pub daily: ArchiveDaily,
}

/// Column-oriented daily series; any entry may be null
#[derive(Debug, Deserialize)]
pub struct ArchiveDaily {
    pub time: Vec<NaiveDate>,
    #[serde(default)]
    pub temperature_2m_mean: Vec<Option<f64>>,
    #[serde(default)]
    pub relative_humidity_2m_mean: Vec<Option<f64>>,
    #[serde(default)]
    pub precipitation_sum: Vec<Option<f64>>,
    #[serde(default)]
    pub wind_speed_10m_max: Vec<Option<f64>>,
    #[serde(default)]
    pub surface_pressure_mean: Vec<Option<f64>>,
}

impl ArchiveDaily {
    /// One observation per day at noon UTC. Days missing temperature,
    /// humidity or precipitation are dropped; missing wind and pressure
    /// default to calm and standard pressure.
    pub fn to_observations(&self, location: &Location) -> Vec<Observation> {
        let value = |series: &Vec<Option<f64>>, i: usize| series.get(i).copied().flatten();
        let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap_or_default();

        self.time
            .iter()
            .enumerate()
            .filter_map(|(i, date)| {
                Some(Observation {
                    timestamp: date.and_time(noon).and_utc(),
                    location: location.clone(),
                    temperature_celsius: value(&self.temperature_2m_mean, i)?,
                    humidity_percent: value(&self.relative_humidity_2m_mean, i)?,
                    precipitation_mm: value(&self.precipitation_sum, i)?,
                    wind_speed_kmh: value(&self.wind_speed_10m_max, i).unwrap_or(0.0),
                    pressure_hpa: value(&self.surface_pressure_mean, i).unwrap_or(1013.25),
                    uv_index: None,
                    cloud_cover_percent: None,
                    wind_direction_deg: None,
                })
            })
            .collect()
    }
}

impl ArchiveClient {
    /// Create a new ArchiveClient from the data source settings
    pub fn new(config: &DataSourceConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Configuration(format!("Archive HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch daily observations for a location and date range
    pub async fn fetch_daily(
        &self,
        location: &Location,
        range: &DateRange,
    ) -> AppResult<Vec<Observation>> {
        let url = format!(
            "{}/archive?latitude={}&longitude={}&start_date={}&end_date={}&daily={}&timezone=UTC",
            self.base_url,
            location.coordinates.latitude,
            location.coordinates.longitude,
            range.start,
            range.end,
            DAILY_FIELDS
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::DataSourceUnavailable(format!("Archive request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::DataSourceUnavailable(format!(
                "Archive API error: {} - {}",
                status, body
            )));
        }

        let data: ArchiveResponse = response.json().await.map_err(|e| {
            AppError::DataSourceUnavailable(format!("Failed to parse archive response: {}", e))
        })?;

        let observations = data.daily.to_observations(location);
        tracing::debug!(
            "Archive returned {} days for {} ({} to {})",
            observations.len(),
            location.label(),
            range.start,
            range.end
        );
        Ok(observations)
    }
}
