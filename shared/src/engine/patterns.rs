//! Seasonal pattern analysis
//!
//! Turns a flat observation list into aggregate `HistoricalWeatherPattern`
//! records per season and, optionally, per calendar month and year.

use std::collections::BTreeMap;

use chrono::{Datelike, Utc};
use uuid::Uuid;

use crate::engine::anomaly::AnomalyDetector;
use crate::engine::settings::EngineSettings;
use crate::engine::statistics;
use crate::models::{
    classify_pattern_type, sorted_by_timestamp, AnomalyCategory, HistoricalWeatherPattern,
    Observation, PatternGranularity, PatternTrends,
};
use crate::types::{month_from_name, month_name, Location, Season};

/// Builds pattern records from observation history
#[derive(Debug, Clone)]
pub struct SeasonalPatternAnalyzer {
    min_samples: usize,
    extreme_offset_c: f64,
    monthly: bool,
    yearly: bool,
    detector: AnomalyDetector,
}

impl SeasonalPatternAnalyzer {
    pub fn new(settings: &EngineSettings) -> Self {
        Self {
            min_samples: settings.min_pattern_samples.max(1),
            extreme_offset_c: settings.extreme_temperature_offset_c,
            monthly: settings.monthly_patterns,
            yearly: settings.yearly_patterns,
            detector: AnomalyDetector::default(),
        }
    }

    /// Analyze one location's observations.
    ///
    /// Input order does not matter; observations are sorted by timestamp
    /// first. Partitions below the minimum sample count are skipped, so an
    /// empty or sparse history yields an empty list.
    pub fn analyze(
        &self,
        location: &Location,
        observations: &[Observation],
    ) -> Vec<HistoricalWeatherPattern> {
        let sorted = sorted_by_timestamp(observations);

        let mut seasons: BTreeMap<Season, Vec<&Observation>> = BTreeMap::new();
        let mut months: BTreeMap<u32, Vec<&Observation>> = BTreeMap::new();
        let mut years: BTreeMap<i32, Vec<&Observation>> = BTreeMap::new();

        for observation in &sorted {
            let date = observation.date();
            seasons
                .entry(Season::for_date(date))
                .or_default()
                .push(observation);
            if self.monthly {
                months.entry(date.month()).or_default().push(observation);
            }
            if self.yearly {
                years.entry(date.year()).or_default().push(observation);
            }
        }

        let mut patterns = Vec::new();
        for (season, group) in &seasons {
            patterns.extend(self.build_pattern(
                location,
                season.label(),
                PatternGranularity::Season,
                group,
            ));
        }
        for (month, group) in &months {
            patterns.extend(self.build_pattern(
                location,
                month_name(*month),
                PatternGranularity::Month,
                group,
            ));
        }
        for (year, group) in &years {
            patterns.extend(self.build_pattern(
                location,
                &year.to_string(),
                PatternGranularity::Year,
                group,
            ));
        }

        tracing::info!(
            "Built {} patterns for {} from {} observations",
            patterns.len(),
            location.label(),
            observations.len()
        );
        patterns
    }

    fn build_pattern(
        &self,
        location: &Location,
        label: &str,
        granularity: PatternGranularity,
        group: &[&Observation],
    ) -> Option<HistoricalWeatherPattern> {
        if group.len() < self.min_samples {
            tracing::debug!(
                "Skipping {} pattern: {} observations, need {}",
                label,
                group.len(),
                self.min_samples
            );
            return None;
        }
        let first = group.first()?;
        let last = group.last()?;

        let temperatures: Vec<f64> = group.iter().map(|o| o.temperature_celsius).collect();
        let humidities: Vec<f64> = group.iter().map(|o| o.humidity_percent).collect();
        let precipitation: Vec<f64> = group.iter().map(|o| o.precipitation_mm).collect();

        let average_temperature = statistics::mean(&temperatures);
        let min_temperature = statistics::min(&temperatures);
        let max_temperature = statistics::max(&temperatures);
        let total_precipitation: f64 = precipitation.iter().sum();
        let average_humidity = statistics::mean(&humidities);

        let anomalies = self.describe_anomalies(group, average_temperature);

        let trends = PatternTrends {
            temperature_trend: statistics::linear_trend(&temperatures),
            humidity_trend: statistics::linear_trend(&humidities),
            precipitation_trend: statistics::linear_trend(&precipitation),
            temperature_correlation: statistics::correlation(&temperatures),
            temperature_volatility: statistics::volatility(&temperatures),
            humidity_volatility: statistics::volatility(&humidities),
            precipitation_volatility: statistics::volatility(&precipitation),
        };

        let summary = format!(
            "{}: average temperature {:.1}°C (min {:.1}°C, max {:.1}°C), total precipitation {:.1}mm, average humidity {:.1}% across {} observations",
            label,
            average_temperature,
            min_temperature,
            max_temperature,
            total_precipitation,
            average_humidity,
            group.len()
        );

        Some(HistoricalWeatherPattern {
            id: Uuid::new_v4(),
            location: location.clone(),
            period_start: first.timestamp,
            period_end: last.timestamp,
            period_label: label.to_string(),
            granularity,
            sample_count: group.len(),
            average_temperature,
            min_temperature,
            max_temperature,
            total_precipitation,
            average_humidity,
            pattern_type: classify_pattern_type(average_temperature, total_precipitation),
            anomalies,
            trends,
            summary,
            created_at: Utc::now(),
        })
    }

    /// z-score findings plus the coarse mean ± offset extreme check
    fn describe_anomalies(&self, group: &[&Observation], mean_temperature: f64) -> Vec<String> {
        let temperature_series: Vec<_> = group
            .iter()
            .map(|o| (o.timestamp, o.temperature_celsius))
            .collect();
        let precipitation_series: Vec<_> = group
            .iter()
            .map(|o| (o.timestamp, o.precipitation_mm))
            .collect();

        let mut found: Vec<String> = self
            .detector
            .detect(AnomalyCategory::Temperature, &temperature_series)
            .into_iter()
            .chain(self.detector.detect_precipitation(&precipitation_series))
            .map(|a| format!("{}: {}", a.timestamp.date_naive(), a.description))
            .collect();

        for observation in group {
            let t = observation.temperature_celsius;
            if t > mean_temperature + self.extreme_offset_c {
                found.push(format!(
                    "{}: extreme high temperature {:.1}°C, more than {:.0}°C above the period mean of {:.1}°C",
                    observation.date(),
                    t,
                    self.extreme_offset_c,
                    mean_temperature
                ));
            } else if t < mean_temperature - self.extreme_offset_c {
                found.push(format!(
                    "{}: extreme low temperature {:.1}°C, more than {:.0}°C below the period mean of {:.1}°C",
                    observation.date(),
                    t,
                    self.extreme_offset_c,
                    mean_temperature
                ));
            }
        }

        found
    }
}

/// Pattern for a season, preferring the most recently built one
pub fn season_pattern(
    patterns: &[HistoricalWeatherPattern],
    season: Season,
) -> Option<&HistoricalWeatherPattern> {
    patterns
        .iter()
        .filter(|p| p.granularity == PatternGranularity::Season && p.period_label == season.label())
        .max_by_key(|p| p.created_at)
}

/// Best pattern for a calendar month: its month pattern, else its season's
pub fn month_pattern(
    patterns: &[HistoricalWeatherPattern],
    month: u32,
) -> Option<&HistoricalWeatherPattern> {
    patterns
        .iter()
        .filter(|p| {
            p.granularity == PatternGranularity::Month
                && month_from_name(&p.period_label) == Some(month)
        })
        .max_by_key(|p| p.created_at)
        .or_else(|| season_pattern(patterns, Season::from_month(month)))
}
