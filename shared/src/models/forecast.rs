//! Seasonal forecast models

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::EnsoState;
use crate::types::Location;

/// Three-band risk level shared by drought, pest and disease assessments
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "low"),
            RiskLevel::Medium => write!(f, "medium"),
            RiskLevel::High => write!(f, "high"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TemperatureOutlook {
    pub avg: f64,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RainfallOutlook {
    pub total_mm: f64,
    pub estimated_rainy_days: u32,
}

/// Simulated conditions for one calendar month
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonthlyForecast {
    pub year: i32,
    /// 1..=12
    pub month: u32,
    pub month_name: String,
    pub temperature: TemperatureOutlook,
    pub rainfall: RainfallOutlook,
    pub humidity_percent: f64,
    pub wind_speed_kmh: f64,
    pub condition_tags: Vec<String>,
    /// Always within [0, 1]
    pub confidence: f64,
}

/// Direction of change between the first and last forecast month
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
}

impl std::fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrendDirection::Increasing => write!(f, "Increasing"),
            TrendDirection::Decreasing => write!(f, "Decreasing"),
            TrendDirection::Stable => write!(f, "Stable"),
        }
    }
}

/// Horizon-wide averages and trend labels
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeasonalSummary {
    pub average_temperature: f64,
    pub average_monthly_rainfall: f64,
    pub total_rainfall: f64,
    pub average_humidity: f64,
    pub temperature_trend: TrendDirection,
    pub rainfall_trend: TrendDirection,
}

/// Drought risk for the forecast horizon
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DroughtAssessment {
    pub level: RiskLevel,
    pub expected_rainfall_mm: f64,
    pub predicted_rainfall_mm: f64,
    /// (expected - predicted) / expected, floored at 0
    pub rainfall_deficit: f64,
    /// Deficit plus the ENSO drought contribution
    pub composite_score: f64,
    pub recommendations: Vec<String>,
}

/// Output of one rule-based seasonal simulation run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeasonalForecast {
    pub id: Uuid,
    pub location: Location,
    pub zone_id: String,
    pub enso_state: EnsoState,
    pub issued_on: NaiveDate,
    pub months: Vec<MonthlyForecast>,
    pub summary: SeasonalSummary,
    pub drought_risk: DroughtAssessment,
    pub recommendations: Vec<String>,
    pub created_at: DateTime<Utc>,
}
