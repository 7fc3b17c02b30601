//! Z-score anomaly detection

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::statistics;
use crate::models::{
    sorted_by_timestamp, AnomalyCategory, AnomalySeverity, ImpactLevel, Observation,
    WeatherAnomaly,
};

/// |z| bands for classification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct AnomalyThresholds {
    pub moderate_z: f64,
    pub severe_z: f64,
}

impl Default for AnomalyThresholds {
    fn default() -> Self {
        Self {
            moderate_z: 2.0,
            severe_z: 3.0,
        }
    }
}

/// The "normal" a series is judged against
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SeriesBaseline {
    pub mean: f64,
    pub std_dev: f64,
}

impl SeriesBaseline {
    pub fn of(values: &[f64]) -> Self {
        Self {
            mean: statistics::mean(values),
            std_dev: statistics::std_dev(values),
        }
    }
}

/// Stateless z-score classifier
#[derive(Debug, Clone, Default)]
pub struct AnomalyDetector {
    thresholds: AnomalyThresholds,
}

impl AnomalyDetector {
    pub fn new(thresholds: AnomalyThresholds) -> Self {
        Self { thresholds }
    }

    /// `(value - mean) / std_dev`, or 0 when the spread is zero
    pub fn z_score(value: f64, mean: f64, std_dev: f64) -> f64 {
        if std_dev <= 0.0 || !std_dev.is_finite() {
            return 0.0;
        }
        (value - mean) / std_dev
    }

    /// Severity for a z-score, or `None` when it is within the normal band
    pub fn classify(&self, z: f64) -> Option<AnomalySeverity> {
        let magnitude = z.abs();
        if magnitude > self.thresholds.severe_z {
            Some(AnomalySeverity::High)
        } else if magnitude > self.thresholds.moderate_z {
            Some(AnomalySeverity::Medium)
        } else {
            None
        }
    }

    pub fn impact(&self, z: f64) -> ImpactLevel {
        let magnitude = z.abs();
        if magnitude > self.thresholds.severe_z {
            ImpactLevel::Severe
        } else if magnitude > self.thresholds.moderate_z {
            ImpactLevel::Moderate
        } else {
            ImpactLevel::Minor
        }
    }

    /// Two-sided detection against the series' own mean and spread
    pub fn detect(
        &self,
        category: AnomalyCategory,
        series: &[(DateTime<Utc>, f64)],
    ) -> Vec<WeatherAnomaly> {
        let values: Vec<f64> = series.iter().map(|(_, v)| *v).collect();
        self.detect_against(category, series, SeriesBaseline::of(&values))
    }

    /// Two-sided detection against a supplied baseline
    pub fn detect_against(
        &self,
        category: AnomalyCategory,
        series: &[(DateTime<Utc>, f64)],
        baseline: SeriesBaseline,
    ) -> Vec<WeatherAnomaly> {
        series
            .iter()
            .filter_map(|&(timestamp, value)| {
                let z = Self::z_score(value, baseline.mean, baseline.std_dev);
                let severity = self.classify(z)?;
                Some(self.build(category, severity, timestamp, value, baseline.mean, z))
            })
            .collect()
    }

    /// One-sided detection: only unusually wet readings are flagged
    pub fn detect_precipitation(&self, series: &[(DateTime<Utc>, f64)]) -> Vec<WeatherAnomaly> {
        let values: Vec<f64> = series.iter().map(|(_, v)| *v).collect();
        let baseline = SeriesBaseline::of(&values);
        if baseline.std_dev <= 0.0 {
            return Vec::new();
        }

        let severe_line = baseline.mean + self.thresholds.severe_z * baseline.std_dev;
        let moderate_line = baseline.mean + self.thresholds.moderate_z * baseline.std_dev;

        series
            .iter()
            .filter_map(|&(timestamp, value)| {
                let severity = if value > severe_line {
                    AnomalySeverity::High
                } else if value > moderate_line {
                    AnomalySeverity::Medium
                } else {
                    return None;
                };
                let z = Self::z_score(value, baseline.mean, baseline.std_dev);
                Some(self.build(
                    AnomalyCategory::Precipitation,
                    severity,
                    timestamp,
                    value,
                    baseline.mean,
                    z,
                ))
            })
            .collect()
    }

    /// Run every detector over an observation list, in timestamp order
    pub fn detect_observations(&self, observations: &[Observation]) -> Vec<WeatherAnomaly> {
        let sorted = sorted_by_timestamp(observations);
        let series = |f: fn(&Observation) -> f64| -> Vec<(DateTime<Utc>, f64)> {
            sorted.iter().map(|o| (o.timestamp, f(o))).collect()
        };

        let mut anomalies = Vec::new();
        anomalies.extend(self.detect(
            AnomalyCategory::Temperature,
            &series(|o| o.temperature_celsius),
        ));
        anomalies.extend(self.detect(AnomalyCategory::Humidity, &series(|o| o.humidity_percent)));
        anomalies.extend(self.detect(AnomalyCategory::WindSpeed, &series(|o| o.wind_speed_kmh)));
        anomalies.extend(self.detect(AnomalyCategory::Pressure, &series(|o| o.pressure_hpa)));
        anomalies.extend(self.detect_precipitation(&series(|o| o.precipitation_mm)));

        anomalies.sort_by_key(|a| a.timestamp);
        anomalies
    }

    fn build(
        &self,
        category: AnomalyCategory,
        severity: AnomalySeverity,
        timestamp: DateTime<Utc>,
        value: f64,
        expected: f64,
        z: f64,
    ) -> WeatherAnomaly {
        let direction = if value >= expected {
            "unusually high"
        } else {
            "unusually low"
        };
        let unit = category.unit();
        let description = format!(
            "{} {}: {:.1}{} against an expected {:.1}{} (z = {:.2})",
            capitalize(category.label()),
            direction,
            value,
            unit,
            expected,
            unit,
            z
        );

        WeatherAnomaly {
            id: Uuid::new_v4(),
            category,
            severity,
            description,
            observed_value: value,
            expected_value: expected,
            deviation: z,
            timestamp,
            impact: self.impact(z),
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
