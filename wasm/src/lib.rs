//! WebAssembly module for the Agro-Climate Advisory Platform
//!
//! Provides client-side computation for:
//! - Pattern classification and offline pattern analysis
//! - Soil moisture and evapotranspiration estimates
//! - Crop recommendation and yield estimates
//! - Drought risk and weather alerts

use wasm_bindgen::prelude::*;

use shared::engine::forecaster::drought_assessment;
use shared::engine::predictor;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;
pub use shared::{ClimateReferenceData, EngineSettings};

/// Engine version, for cache-busting stored offline results
#[wasm_bindgen]
pub fn engine_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn warn(message: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::warn_1(&JsValue::from_str(message));
    #[cfg(not(target_arch = "wasm32"))]
    let _ = message;
}

/// Classify a period as hot_wet, hot_dry, cool_wet, cool_dry or moderate
#[wasm_bindgen]
pub fn classify_weather_pattern(average_temperature: f64, total_precipitation: f64) -> String {
    classify_pattern_type(average_temperature, total_precipitation).to_string()
}

/// Soil moisture estimate (%)
#[wasm_bindgen]
pub fn estimate_soil_moisture(precipitation_mm: f64, humidity_percent: f64) -> f64 {
    predictor::soil_moisture(precipitation_mm, humidity_percent)
}

/// Evapotranspiration estimate (mm/day)
#[wasm_bindgen]
pub fn estimate_evapotranspiration(temperature: f64, humidity_percent: f64) -> f64 {
    predictor::evapotranspiration(temperature, humidity_percent)
}

/// Best-scoring crop from the built-in profiles
#[wasm_bindgen]
pub fn recommend_crop(temperature: f64, humidity: f64, precipitation: f64) -> Option<String> {
    let reference = ClimateReferenceData::default();
    let scores: Vec<CropScore> = reference
        .crops()
        .iter()
        .map(|crop| predictor::score_crop(crop, temperature, humidity, precipitation))
        .collect();
    predictor::select_crop(&scores).map(|score| score.crop_id.clone())
}

/// Yield estimate (%) for a crop; unknown crops get the weather-only estimate
#[wasm_bindgen]
pub fn predict_yield(crop_id: &str, temperature: f64, humidity: f64, precipitation: f64) -> f64 {
    let reference = ClimateReferenceData::default();
    predictor::estimate_yield(reference.crop(crop_id), temperature, humidity, precipitation)
}

/// Drought band ("low", "medium", "high") for expected vs predicted rainfall
#[wasm_bindgen]
pub fn drought_risk_level(expected_mm: f64, predicted_mm: f64, enso_state: &str) -> String {
    let reference = ClimateReferenceData::default();
    let enso = reference.enso_modifier(EnsoState::parse_or_neutral(enso_state));
    drought_assessment(expected_mm, predicted_mm, enso.drought_risk_contribution)
        .level
        .to_string()
}

/// Tagged weather alerts for one day's conditions
#[wasm_bindgen]
pub fn weather_alerts(temperature: f64, humidity: f64, precipitation: f64) -> js_sys::Array {
    predictor::weather_alerts(temperature, humidity, precipitation)
        .into_iter()
        .map(|alert| JsValue::from_str(&alert))
        .collect()
}

fn parse_observations(observations_json: &str) -> Result<Vec<Observation>, String> {
    let observations: Vec<Observation> = serde_json::from_str(observations_json)
        .map_err(|e| format!("Invalid observations JSON: {}", e))?;
    let (accepted, rejected) = partition_valid(observations);
    if !rejected.is_empty() {
        warn(&format!("Skipped {} invalid observations", rejected.len()));
    }
    Ok(accepted)
}

fn patterns_json(observations_json: &str) -> Result<String, String> {
    let observations = parse_observations(observations_json)?;
    let Some(location) = observations.first().map(|o| o.location.clone()) else {
        return Ok("[]".to_string());
    };

    let analyzer = shared::SeasonalPatternAnalyzer::new(&EngineSettings::default());
    let patterns = analyzer.analyze(&location, &observations);
    serde_json::to_string(&patterns).map_err(|e| format!("Failed to serialize patterns: {}", e))
}

fn prediction_json(request_json: &str, observations_json: &str) -> Result<String, String> {
    let request: shared::PredictionRequest = serde_json::from_str(request_json)
        .map_err(|e| format!("Invalid request JSON: {}", e))?;
    let observations = parse_observations(observations_json)?;

    let reference = ClimateReferenceData::default();
    let prediction = shared::AgroClimaticPredictor::new(&reference, EngineSettings::default())
        .predict(&request, &observations);
    if prediction.degraded {
        warn("No seasonal history for this date; prediction uses the default baseline");
    }
    serde_json::to_string(&prediction).map_err(|e| format!("Failed to serialize prediction: {}", e))
}

/// Historical patterns (JSON array) from a JSON array of observations
#[wasm_bindgen]
pub fn analyze_patterns(observations_json: &str) -> Result<String, JsValue> {
    patterns_json(observations_json).map_err(|e| JsValue::from_str(&e))
}

/// Offline prediction from a request and locally cached observations
#[wasm_bindgen]
pub fn predict_offline(request_json: &str, observations_json: &str) -> Result<String, JsValue> {
    prediction_json(request_json, observations_json).map_err(|e| JsValue::from_str(&e))
}
