//! Weather observation records

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::types::Location;

/// A time-stamped weather observation for one location.
///
/// Observations are immutable once recorded; the engine only ever reads them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Validate)]
pub struct Observation {
    pub timestamp: DateTime<Utc>,
    pub location: Location,
    #[validate(range(min = -90.0, max = 65.0))]
    pub temperature_celsius: f64,
    #[validate(range(min = 0.0, max = 100.0))]
    pub humidity_percent: f64,
    #[validate(range(min = 0.0, max = 2000.0))]
    pub precipitation_mm: f64,
    #[validate(range(min = 0.0, max = 500.0))]
    pub wind_speed_kmh: f64,
    #[validate(range(min = 300.0, max = 1100.0))]
    pub pressure_hpa: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, max = 20.0))]
    pub uv_index: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, max = 100.0))]
    pub cloud_cover_percent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, max = 360.0))]
    pub wind_direction_deg: Option<f64>,
}

impl Observation {
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }
}

/// Sort observations chronologically without touching the caller's slice
pub fn sorted_by_timestamp(observations: &[Observation]) -> Vec<&Observation> {
    let mut sorted: Vec<&Observation> = observations.iter().collect();
    sorted.sort_by_key(|o| o.timestamp);
    sorted
}
