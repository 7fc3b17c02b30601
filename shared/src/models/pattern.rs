//! Historical weather pattern models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::Location;

/// Aggregation window a pattern was built over
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum PatternGranularity {
    Season,
    Month,
    Year,
}

impl std::fmt::Display for PatternGranularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PatternGranularity::Season => write!(f, "season"),
            PatternGranularity::Month => write!(f, "month"),
            PatternGranularity::Year => write!(f, "year"),
        }
    }
}

/// Coarse climate category of a period
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PatternType {
    HotWet,
    HotDry,
    CoolWet,
    CoolDry,
    Moderate,
}

impl std::fmt::Display for PatternType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PatternType::HotWet => write!(f, "hot_wet"),
            PatternType::HotDry => write!(f, "hot_dry"),
            PatternType::CoolWet => write!(f, "cool_wet"),
            PatternType::CoolDry => write!(f, "cool_dry"),
            PatternType::Moderate => write!(f, "moderate"),
        }
    }
}

/// Classify a period from its mean temperature and total precipitation
pub fn classify_pattern_type(average_temperature: f64, total_precipitation: f64) -> PatternType {
    if average_temperature > 25.0 && total_precipitation > 100.0 {
        PatternType::HotWet
    } else if average_temperature > 25.0 && total_precipitation < 50.0 {
        PatternType::HotDry
    } else if average_temperature < 15.0 && total_precipitation > 100.0 {
        PatternType::CoolWet
    } else if average_temperature < 15.0 && total_precipitation < 50.0 {
        PatternType::CoolDry
    } else {
        PatternType::Moderate
    }
}

/// Per-variable trend slopes (units per observation) and volatility
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PatternTrends {
    pub temperature_trend: f64,
    pub humidity_trend: f64,
    pub precipitation_trend: f64,
    /// Pearson correlation of temperature against time
    pub temperature_correlation: f64,
    pub temperature_volatility: f64,
    pub humidity_volatility: f64,
    pub precipitation_volatility: f64,
}

/// Aggregate statistics over one season, month or year of observations.
///
/// Immutable; a later analysis run produces new records rather than updating these.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoricalWeatherPattern {
    pub id: Uuid,
    pub location: Location,
    pub period_start: DateTime<Utc>,
    pub period_end: DateTime<Utc>,
    /// Season name ("summer"), month name ("January") or year ("2023")
    pub period_label: String,
    pub granularity: PatternGranularity,
    pub sample_count: usize,
    pub average_temperature: f64,
    pub min_temperature: f64,
    pub max_temperature: f64,
    pub total_precipitation: f64,
    pub average_humidity: f64,
    pub pattern_type: PatternType,
    pub anomalies: Vec<String>,
    pub trends: PatternTrends,
    pub summary: String,
    pub created_at: DateTime<Utc>,
}
