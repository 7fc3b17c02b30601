//! Per-date agro-climatic prediction.
//!
//! Combines a pattern-derived daily baseline with the seasonal rule
//! adjustments, then scores crops and derives advice, risks and alerts.

use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::forecaster::{COOL_TEMPERATURE_C, HOT_TEMPERATURE_C};
use crate::engine::jitter::Jitter;
use crate::engine::patterns::{season_pattern, SeasonalPatternAnalyzer};
use crate::engine::reference::ClimateReferenceData;
use crate::engine::settings::EngineSettings;
use crate::models::{
    AgroClimaticPrediction, AlertCategory, BaselineSource, ClimateIndicators, ClimateZone,
    CropProfile, CropScore, EnsoState, HistoricalWeatherPattern, Observation, RiskLevel,
};
use crate::types::{Location, Season};

pub const DEFAULT_BASELINE_TEMPERATURE: f64 = 22.0;
pub const DEFAULT_BASELINE_HUMIDITY: f64 = 60.0;
pub const DEFAULT_BASELINE_PRECIPITATION: f64 = 0.0;

const HISTORICAL_CONFIDENCE: f64 = 0.8;
const DEFAULT_CONFIDENCE: f64 = 0.4;
const BASE_YIELD: f64 = 70.0;

/// What to predict
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictionRequest {
    pub location: Location,
    pub zone_id: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub enso_state: EnsoState,
}

/// Daily starting point before seasonal adjustment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DailyBaseline {
    pub temperature: f64,
    pub humidity: f64,
    pub precipitation: f64,
    pub source: BaselineSource,
}

impl DailyBaseline {
    pub fn fallback() -> Self {
        Self {
            temperature: DEFAULT_BASELINE_TEMPERATURE,
            humidity: DEFAULT_BASELINE_HUMIDITY,
            precipitation: DEFAULT_BASELINE_PRECIPITATION,
            source: BaselineSource::Default,
        }
    }
}

/// Baseline from the season pattern covering `date`, or the fixed defaults
pub fn select_baseline(patterns: &[HistoricalWeatherPattern], date: NaiveDate) -> DailyBaseline {
    let season = Season::for_date(date);
    match season_pattern(patterns, season) {
        Some(pattern) => DailyBaseline {
            temperature: pattern.average_temperature,
            humidity: pattern.average_humidity,
            precipitation: pattern.total_precipitation / 30.0,
            source: BaselineSource::Historical,
        },
        None => {
            tracing::warn!(
                "No {} pattern available for {}, using default baseline (degraded confidence)",
                season,
                date
            );
            DailyBaseline::fallback()
        }
    }
}

pub struct AgroClimaticPredictor<'a> {
    reference: &'a ClimateReferenceData,
    settings: EngineSettings,
    analyzer: SeasonalPatternAnalyzer,
}

impl<'a> AgroClimaticPredictor<'a> {
    pub fn new(reference: &'a ClimateReferenceData, settings: EngineSettings) -> Self {
        let analyzer = SeasonalPatternAnalyzer::new(&settings);
        Self {
            reference,
            settings,
            analyzer,
        }
    }

    /// Full pipeline from raw observations. An empty list is valid and
    /// yields a degraded prediction.
    pub fn predict(
        &self,
        request: &PredictionRequest,
        observations: &[Observation],
    ) -> AgroClimaticPrediction {
        let patterns = self.analyzer.analyze(&request.location, observations);
        self.predict_from_patterns(request, &patterns)
    }

    pub fn predict_from_patterns(
        &self,
        request: &PredictionRequest,
        patterns: &[HistoricalWeatherPattern],
    ) -> AgroClimaticPrediction {
        let baseline = select_baseline(patterns, request.date);
        let zone = self
            .reference
            .zone_or_default(&request.zone_id, &self.settings.default_zone);
        let rule = self.reference.seasonal_rule(request.date.month());
        let enso = self.reference.enso_modifier(request.enso_state);

        let mut jitter = if self.settings.jitter {
            Jitter::for_day(&request.location, request.date)
        } else {
            Jitter::none()
        };

        let raw_temperature = baseline.temperature
            + rule.temperature_delta()
            + enso.temp_modifier * 3.0
            + jitter.offset(1.5);
        let raw_humidity = baseline.humidity + rule.humidity_delta() + jitter.offset(5.0);
        let raw_precipitation = baseline.precipitation
            * rule.rainfall_modifier
            * (1.0 + enso.rainfall_modifier)
            * jitter.factor(0.8, 1.2);

        let temperature = raw_temperature.clamp(5.0, 45.0);
        let humidity = raw_humidity.clamp(10.0, 100.0);
        let precipitation = raw_precipitation.clamp(0.0, 50.0);

        // Triggered on the unclamped values; the frost threshold sits at the clamp floor
        let weather_alerts = reported_alerts(
            DailyReadings {
                temperature: raw_temperature,
                humidity: raw_humidity,
                precipitation: raw_precipitation,
            },
            DailyReadings {
                temperature,
                humidity,
                precipitation,
            },
        );

        let soil_moisture = soil_moisture(precipitation, humidity);
        let evapotranspiration = evapotranspiration(temperature, humidity);

        let crop_scores: Vec<CropScore> = self
            .reference
            .crops()
            .iter()
            .map(|c| score_crop(c, temperature, humidity, precipitation))
            .collect();
        let recommended = select_crop(&crop_scores).map(|s| s.crop_id.clone());
        let recommended_profile = recommended.as_deref().and_then(|id| self.reference.crop(id));

        let degraded = baseline.source == BaselineSource::Default;
        let confidence = {
            let base = if degraded {
                DEFAULT_CONFIDENCE
            } else {
                HISTORICAL_CONFIDENCE
            };
            (base - 0.1 * (enso.temp_modifier.abs() + enso.rainfall_modifier.abs())).clamp(0.0, 1.0)
        };

        let climate_indicators = ClimateIndicators {
            season: Season::for_date(request.date),
            enso_state: request.enso_state,
            drought_index: drought_index(precipitation, self.settings.expected_daily_precipitation_mm),
            heat_stress_index: heat_stress_index(temperature),
            growing_degree_days: growing_degree_days(temperature),
            baseline_source: baseline.source,
        };

        tracing::info!(
            "Prediction for {} on {}: {:.1}°C, {:.0}%, {:.1}mm, crop {:?}, {} alerts{}",
            request.location.label(),
            request.date,
            temperature,
            humidity,
            precipitation,
            recommended,
            weather_alerts.len(),
            if degraded { " (degraded)" } else { "" }
        );

        AgroClimaticPrediction {
            id: Uuid::new_v4(),
            date: request.date,
            location: request.location.clone(),
            zone_id: zone
                .map(|z| z.zone_id.clone())
                .unwrap_or_else(|| request.zone_id.clone()),
            temperature,
            humidity,
            precipitation,
            soil_moisture_estimate: soil_moisture,
            evapotranspiration_estimate: evapotranspiration,
            irrigation_advice: irrigation_advice(soil_moisture, temperature),
            planting_advice: planting_advice(
                temperature,
                soil_moisture,
                precipitation,
                recommended.as_deref(),
            ),
            harvesting_advice: harvesting_advice(precipitation, humidity),
            pest_risk: pest_risk(temperature, humidity),
            disease_risk: disease_risk(humidity, precipitation),
            yield_prediction: estimate_yield(recommended_profile, temperature, humidity, precipitation),
            recommended_crop: recommended,
            crop_scores,
            weather_alerts,
            soil_condition_summary: soil_condition_summary(zone, soil_moisture, evapotranspiration),
            climate_indicators,
            confidence,
            degraded,
            created_at: Utc::now(),
        }
    }
}

pub fn soil_moisture(precipitation: f64, humidity: f64) -> f64 {
    (precipitation * 2.0 + humidity * 0.3).clamp(0.0, 100.0)
}

pub fn evapotranspiration(temperature: f64, humidity: f64) -> f64 {
    (temperature * 0.5 - humidity * 0.2).clamp(0.0, 10.0)
}

/// Additive rubric: temperature 3/1, humidity 2/0.5, water 2/0.5
pub fn score_crop(profile: &CropProfile, temperature: f64, humidity: f64, precipitation: f64) -> CropScore {
    let temperature_in_range = profile.temperature_in_range(temperature);
    let humidity_in_range = profile.humidity_in_range(humidity);
    let precipitation_adequate = profile.precipitation_adequate(precipitation);

    let score = (if temperature_in_range { 3.0 } else { 1.0 })
        + (if humidity_in_range { 2.0 } else { 0.5 })
        + (if precipitation_adequate { 2.0 } else { 0.5 });

    CropScore {
        crop_id: profile.crop_id.clone(),
        score,
        temperature_in_range,
        humidity_in_range,
        precipitation_adequate,
    }
}

/// Strictly highest score; on a tie the earlier entry wins
pub fn select_crop(scores: &[CropScore]) -> Option<&CropScore> {
    scores.iter().fold(None, |best: Option<&CropScore>, s| match best {
        Some(b) if b.score >= s.score => Some(b),
        _ => Some(s),
    })
}

/// 0..=100 relative yield for the chosen crop; the base value when there is none
pub fn estimate_yield(
    profile: Option<&CropProfile>,
    temperature: f64,
    humidity: f64,
    precipitation: f64,
) -> f64 {
    let Some(profile) = profile else {
        return BASE_YIELD;
    };
    let mut estimate = BASE_YIELD;
    estimate += if profile.temperature_in_range(temperature) { 20.0 } else { -15.0 };
    estimate += if profile.humidity_in_range(humidity) { 10.0 } else { -10.0 };
    estimate += if profile.precipitation_adequate(precipitation) { 15.0 } else { -20.0 };
    estimate.clamp(0.0, 100.0)
}

pub fn pest_risk(temperature: f64, humidity: f64) -> RiskLevel {
    if temperature > 28.0 && humidity > 70.0 {
        RiskLevel::High
    } else if temperature > 22.0 && humidity > 60.0 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

pub fn disease_risk(humidity: f64, precipitation: f64) -> RiskLevel {
    if humidity > 80.0 && precipitation > 10.0 {
        RiskLevel::High
    } else if humidity > 70.0 || precipitation > 5.0 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

pub fn irrigation_advice(soil_moisture: f64, temperature: f64) -> String {
    let mut advice = if soil_moisture < 30.0 {
        "Irrigate now: soil moisture is low".to_string()
    } else if soil_moisture < 60.0 {
        "Light irrigation recommended within the next two days".to_string()
    } else {
        "Soil moisture is adequate: no irrigation needed".to_string()
    };
    if temperature > HOT_TEMPERATURE_C {
        advice.push_str("; irrigate early morning or evening to limit evaporation");
    }
    advice
}

pub fn planting_advice(
    temperature: f64,
    soil_moisture: f64,
    precipitation: f64,
    crop: Option<&str>,
) -> String {
    if temperature < COOL_TEMPERATURE_C {
        "Too cold for planting: wait for soils to warm".to_string()
    } else if temperature > HOT_TEMPERATURE_C {
        "High temperatures: plant heat-tolerant crops only and irrigate at planting".to_string()
    } else if soil_moisture >= 40.0 && precipitation >= 1.0 {
        match crop {
            Some(crop) => format!("Good planting conditions for {}", crop),
            None => "Good planting conditions".to_string(),
        }
    } else {
        "Wait for adequate soil moisture before planting".to_string()
    }
}

pub fn harvesting_advice(precipitation: f64, humidity: f64) -> String {
    if precipitation > 20.0 {
        "Delay harvesting: heavy rain expected".to_string()
    } else if precipitation > 5.0 || humidity > 85.0 {
        "Harvest with caution: dry produce thoroughly before storage".to_string()
    } else {
        "Good harvesting conditions".to_string()
    }
}

/// Daily conditions an alert is raised on or reported with
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyReadings {
    pub temperature: f64,
    pub humidity: f64,
    pub precipitation: f64,
}

/// Category-tagged alert strings for extreme conditions
pub fn weather_alerts(temperature: f64, humidity: f64, precipitation: f64) -> Vec<String> {
    let readings = DailyReadings {
        temperature,
        humidity,
        precipitation,
    };
    reported_alerts(readings, readings)
}

/// Alerts triggered by `raw` values but worded with the `reported` (clamped)
/// ones, so a message never quotes a number the record does not carry.
pub fn reported_alerts(raw: DailyReadings, reported: DailyReadings) -> Vec<String> {
    let temperature = reading(raw.temperature, reported.temperature, "°C", 1);
    let humidity = reading(raw.humidity, reported.humidity, "%", 0);
    let precipitation = reading(raw.precipitation, reported.precipitation, "mm", 1);

    let mut alerts = Vec::new();
    if raw.temperature > 35.0 {
        alerts.push(AlertCategory::Heat.format(&format!(
            "High temperature warning: {} expected, protect crops and livestock from heat stress",
            temperature
        )));
    }
    if raw.temperature < 5.0 {
        alerts.push(AlertCategory::Frost.format(&format!(
            "Frost warning: {} expected, cover sensitive crops overnight",
            temperature
        )));
    }
    if raw.humidity > 85.0 {
        alerts.push(AlertCategory::Disease.format(&format!(
            "High humidity ({}) favours fungal disease, scout crops and consider preventive spraying",
            humidity
        )));
    }
    if raw.precipitation > 20.0 {
        alerts.push(AlertCategory::Rain.format(&format!(
            "Heavy rain: {} expected, check drainage and postpone fertilizer application",
            precipitation
        )));
    }
    if raw.precipitation < 1.0 && raw.temperature > 25.0 {
        alerts.push(AlertCategory::Drought.format(&format!(
            "Dry heat: {} rain with temperatures of {}, prioritise irrigation of young crops",
            precipitation, temperature
        )));
    }
    alerts
}

/// `31.0°C`, or `above 45.0°C` / `below 5.0°C` when the reported value was clamped
fn reading(raw: f64, reported: f64, unit: &str, decimals: usize) -> String {
    let value = format!("{:.*}{}", decimals, reported, unit);
    if raw > reported {
        format!("above {}", value)
    } else if raw < reported {
        format!("below {}", value)
    } else {
        value
    }
}

/// 0 at or above the expected daily rainfall, 1 with no rain
pub fn drought_index(precipitation: f64, expected_daily_mm: f64) -> f64 {
    if expected_daily_mm <= 0.0 {
        return 0.0;
    }
    ((expected_daily_mm - precipitation) / expected_daily_mm).clamp(0.0, 1.0)
}

pub fn heat_stress_index(temperature: f64) -> f64 {
    ((temperature - 30.0) / 15.0).clamp(0.0, 1.0)
}

pub fn growing_degree_days(temperature: f64) -> f64 {
    (temperature - 10.0).max(0.0)
}

fn soil_condition_summary(zone: Option<&ClimateZone>, soil_moisture: f64, et: f64) -> String {
    let state = if soil_moisture < 30.0 {
        "dry"
    } else if soil_moisture < 60.0 {
        "moist"
    } else {
        "wet"
    };
    match zone {
        Some(zone) => format!(
            "{} soil is {} ({:.0}% moisture), evapotranspiration {:.1}mm/day",
            zone.soil_type, state, soil_moisture, et
        ),
        None => format!(
            "Soil is {} ({:.0}% moisture), evapotranspiration {:.1}mm/day",
            state, soil_moisture, et
        ),
    }
}
