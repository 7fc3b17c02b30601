//! Weather anomaly records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which measurement an anomaly was found in
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyCategory {
    Temperature,
    Precipitation,
    Humidity,
    WindSpeed,
    Pressure,
}

impl AnomalyCategory {
    pub fn label(&self) -> &'static str {
        match self {
            AnomalyCategory::Temperature => "temperature",
            AnomalyCategory::Precipitation => "precipitation",
            AnomalyCategory::Humidity => "humidity",
            AnomalyCategory::WindSpeed => "wind speed",
            AnomalyCategory::Pressure => "pressure",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            AnomalyCategory::Temperature => "°C",
            AnomalyCategory::Precipitation => "mm",
            AnomalyCategory::Humidity => "%",
            AnomalyCategory::WindSpeed => "km/h",
            AnomalyCategory::Pressure => "hPa",
        }
    }
}

/// Severity of a flagged anomaly
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum AnomalySeverity {
    /// 2 < |z| <= 3
    Medium,
    /// |z| > 3
    High,
}

/// Expected agronomic impact, banded on |z| like severity
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ImpactLevel {
    Minor,
    Moderate,
    Severe,
}

/// A single statistically unusual reading
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherAnomaly {
    pub id: Uuid,
    pub category: AnomalyCategory,
    pub severity: AnomalySeverity,
    pub description: String,
    pub observed_value: f64,
    /// Series mean the reading was compared against
    pub expected_value: f64,
    /// z-score of the reading
    pub deviation: f64,
    pub timestamp: DateTime<Utc>,
    pub impact: ImpactLevel,
}
