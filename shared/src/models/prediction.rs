//! Agro-climatic prediction models

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{EnsoState, RiskLevel};
use crate::types::{Location, Season};

/// Where the daily baseline for a prediction came from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BaselineSource {
    /// Seasonal pattern built from observations
    Historical,
    /// Fixed defaults; the prediction is degraded
    Default,
}

/// Categories carried as `[tag]` prefixes on alert strings
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AlertCategory {
    Heat,
    Frost,
    Disease,
    Rain,
    Drought,
}

impl AlertCategory {
    pub fn tag(&self) -> &'static str {
        match self {
            AlertCategory::Heat => "heat",
            AlertCategory::Frost => "frost",
            AlertCategory::Disease => "disease",
            AlertCategory::Rain => "rain",
            AlertCategory::Drought => "drought",
        }
    }

    /// Only temperature, frost and drought alerts go out as critical dispatches
    pub fn is_critical(&self) -> bool {
        matches!(
            self,
            AlertCategory::Heat | AlertCategory::Frost | AlertCategory::Drought
        )
    }

    /// Recover the category from an alert string's `[tag]` prefix
    pub fn from_alert(alert: &str) -> Option<AlertCategory> {
        let tag = alert.strip_prefix('[')?.split(']').next()?;
        match tag {
            "heat" => Some(AlertCategory::Heat),
            "frost" => Some(AlertCategory::Frost),
            "disease" => Some(AlertCategory::Disease),
            "rain" => Some(AlertCategory::Rain),
            "drought" => Some(AlertCategory::Drought),
            _ => None,
        }
    }

    pub fn format(&self, message: &str) -> String {
        format!("[{}] {}", self.tag(), message)
    }
}

/// Rubric result for one crop
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CropScore {
    pub crop_id: String,
    pub score: f64,
    pub temperature_in_range: bool,
    pub humidity_in_range: bool,
    pub precipitation_adequate: bool,
}

/// Derived climate indices reported alongside a prediction
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClimateIndicators {
    pub season: Season,
    pub enso_state: EnsoState,
    /// 0 (wet) .. 1 (no rain against the expected daily baseline)
    pub drought_index: f64,
    /// 0 below 30°C rising to 1 at 45°C
    pub heat_stress_index: f64,
    /// Base 10°C
    pub growing_degree_days: f64,
    pub baseline_source: BaselineSource,
}

/// Final per-location, per-date advisory record.
///
/// Never mutated after creation; regenerating yields a new record with a new id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgroClimaticPrediction {
    pub id: Uuid,
    pub date: NaiveDate,
    pub location: Location,
    pub zone_id: String,
    pub temperature: f64,
    pub humidity: f64,
    pub precipitation: f64,
    pub soil_moisture_estimate: f64,
    pub evapotranspiration_estimate: f64,
    pub recommended_crop: Option<String>,
    pub crop_scores: Vec<CropScore>,
    pub irrigation_advice: String,
    pub planting_advice: String,
    pub harvesting_advice: String,
    pub pest_risk: RiskLevel,
    pub disease_risk: RiskLevel,
    /// Within [0, 100]
    pub yield_prediction: f64,
    pub weather_alerts: Vec<String>,
    pub soil_condition_summary: String,
    pub climate_indicators: ClimateIndicators,
    /// Within [0, 1]; lowered when the default baseline was used
    pub confidence: f64,
    pub degraded: bool,
    pub created_at: DateTime<Utc>,
}

impl AgroClimaticPrediction {
    /// Alerts eligible for critical dispatch
    pub fn critical_alerts(&self) -> Vec<&str> {
        self.weather_alerts
            .iter()
            .filter(|a| AlertCategory::from_alert(a).map_or(false, |c| c.is_critical()))
            .map(String::as_str)
            .collect()
    }
}
