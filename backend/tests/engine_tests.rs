//! Engine integration tests
//!
//! Tests for the observation → pattern → forecast/prediction pipeline:
//! - Constant series produce no anomalies and flat trends
//! - Single-day spikes are flagged
//! - Crop rubric maximum and selection
//! - Default baseline fallback
//! - Dry-season El Niño drought risk

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::engine::predictor::{estimate_yield, score_crop, select_crop};
use shared::{
    AgroClimaticPredictor, AnomalyCategory, AnomalyDetector, AnomalySeverity,
    ClimateReferenceData, EngineSettings, EnsoState, ForecastRequest, Location, Observation,
    PatternType, PredictionRequest, RiskLevel, RuleBasedSeasonalForecaster,
    SeasonalPatternAnalyzer,
};

fn location() -> Location {
    Location::named("Harare", Decimal::new(-17829, 3), Decimal::new(31052, 3))
}

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
}

fn observation(day: i64, temperature: f64, humidity: f64, precipitation: f64) -> Observation {
    Observation {
        timestamp: start() + Duration::days(day),
        location: location(),
        temperature_celsius: temperature,
        humidity_percent: humidity,
        precipitation_mm: precipitation,
        wind_speed_kmh: 10.0,
        pressure_hpa: 1013.0,
        uv_index: None,
        cloud_cover_percent: None,
        wind_direction_deg: None,
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// 30 flat days: nothing unusual, no trend
    #[test]
    fn test_constant_month_has_no_anomalies() {
        let observations: Vec<Observation> = (0..30).map(|d| observation(d, 22.0, 60.0, 0.0)).collect();

        let anomalies = AnomalyDetector::default().detect_observations(&observations);
        assert!(anomalies.is_empty());

        let analyzer = SeasonalPatternAnalyzer::new(&EngineSettings::default());
        let patterns = analyzer.analyze(&location(), &observations);
        let summer = patterns
            .iter()
            .find(|p| p.period_label == "summer")
            .expect("summer pattern");

        assert_eq!(summer.pattern_type, PatternType::Moderate);
        assert!(summer.trends.temperature_trend.abs() < 1e-9);
        assert!(summer.anomalies.is_empty());
    }

    /// A 40°C day in a 20°C month stands far outside the spread
    #[test]
    fn test_single_day_spike_is_flagged() {
        let series: Vec<(DateTime<Utc>, f64)> = (0..30)
            .map(|d| {
                let value = if d == 15 { 40.0 } else { 20.0 + (d % 2) as f64 * 0.2 };
                (start() + Duration::days(d), value)
            })
            .collect();

        let anomalies = AnomalyDetector::default().detect(AnomalyCategory::Temperature, &series);

        assert_eq!(anomalies.len(), 1);
        assert_eq!(anomalies[0].timestamp, start() + Duration::days(15));
        assert_eq!(anomalies[0].severity, AnomalySeverity::High);
    }

    /// 21°C / 70% / 20mm hits every maize band
    #[test]
    fn test_maize_rubric_maximum() {
        let reference = ClimateReferenceData::default();
        let scores: Vec<_> = reference
            .crops()
            .iter()
            .map(|crop| score_crop(crop, 21.0, 70.0, 20.0))
            .collect();

        let maize = scores.iter().find(|s| s.crop_id == "maize").unwrap();
        assert_eq!(maize.score, 7.0);
        assert_eq!(select_crop(&scores).unwrap().crop_id, "maize");
    }

    /// No history: default baseline, flagged as degraded
    #[test]
    fn test_prediction_without_history_uses_defaults() {
        let reference = ClimateReferenceData::default();
        let settings = EngineSettings {
            jitter: false,
            ..EngineSettings::default()
        };
        let predictor = AgroClimaticPredictor::new(&reference, settings);
        let request = PredictionRequest {
            location: location(),
            zone_id: "highveld".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
            enso_state: EnsoState::Neutral,
        };

        let prediction = predictor.predict_from_patterns(&request, &[]);
        assert!(prediction.degraded);
        assert!(prediction.confidence < 0.5);
    }

    /// 450mm zone, April-June, El Niño
    #[test]
    fn test_dry_el_nino_season_is_high_drought_risk() {
        let reference = ClimateReferenceData::default();
        let forecaster = RuleBasedSeasonalForecaster::new(&reference, EngineSettings::default());
        let request = ForecastRequest {
            location: location(),
            zone_id: "lowveld".to_string(),
            enso_state: EnsoState::ElNino,
            issued_on: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
            horizon_months: 3,
        };

        let forecast = forecaster.forecast(&request, &[]).unwrap();
        assert_eq!(forecast.drought_risk.level, RiskLevel::High);
    }

    /// Same observations, same request: same numbers
    #[test]
    fn test_pipeline_is_reproducible() {
        let reference = ClimateReferenceData::default();
        let settings = EngineSettings::default();
        let observations: Vec<Observation> = (0..90)
            .map(|d| observation(d, 20.0 + (d % 7) as f64, 55.0 + (d % 5) as f64, (d % 4) as f64))
            .collect();
        let request = PredictionRequest {
            location: location(),
            zone_id: "highveld".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 2, 14).unwrap(),
            enso_state: EnsoState::LaNina,
        };

        let predictor = AgroClimaticPredictor::new(&reference, settings);
        let a = predictor.predict(&request, &observations);
        let b = predictor.predict(&request, &observations);

        assert!(!a.degraded);
        assert_eq!(a.temperature, b.temperature);
        assert_eq!(a.humidity, b.humidity);
        assert_eq!(a.precipitation, b.precipitation);
        assert_eq!(a.recommended_crop, b.recommended_crop);
        assert_eq!(a.weather_alerts, b.weather_alerts);
    }
}

// ============================================================================
// Property Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Predicted values always respect their clamps
        #[test]
        fn prop_prediction_values_clamped(
            day in 0i64..365,
            lat in -35i64..-10,
            enso in 0usize..3,
        ) {
            let reference = ClimateReferenceData::default();
            let predictor = AgroClimaticPredictor::new(&reference, EngineSettings::default());
            let enso_state = [EnsoState::ElNino, EnsoState::LaNina, EnsoState::Neutral][enso];
            let request = PredictionRequest {
                location: Location::new(Decimal::from(lat), Decimal::from(30)),
                zone_id: "lowveld".to_string(),
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(day),
                enso_state,
            };

            let prediction = predictor.predict_from_patterns(&request, &[]);
            prop_assert!((5.0..=45.0).contains(&prediction.temperature));
            prop_assert!((10.0..=100.0).contains(&prediction.humidity));
            prop_assert!((0.0..=50.0).contains(&prediction.precipitation));
            prop_assert!((0.0..=100.0).contains(&prediction.yield_prediction));
            prop_assert!((0.0..=1.0).contains(&prediction.confidence));
        }

        /// Yield stays a percentage whatever the weather
        #[test]
        fn prop_yield_is_percentage(
            temperature in -10.0f64..60.0,
            humidity in 0.0f64..100.0,
            precipitation in 0.0f64..100.0,
        ) {
            let reference = ClimateReferenceData::default();
            let value = estimate_yield(reference.crop("maize"), temperature, humidity, precipitation);
            prop_assert!((0.0..=100.0).contains(&value));
        }

        /// Analysis never reports a pattern below the sample minimum
        #[test]
        fn prop_patterns_respect_min_samples(days in 1i64..120) {
            let settings = EngineSettings::default();
            let observations: Vec<Observation> = (0..days)
                .map(|d| observation(d, 18.0 + (d % 9) as f64, 60.0, (d % 3) as f64))
                .collect();

            let patterns = SeasonalPatternAnalyzer::new(&settings).analyze(&location(), &observations);
            for pattern in &patterns {
                prop_assert!(pattern.sample_count >= settings.min_pattern_samples);
            }
            let total: usize = patterns
                .iter()
                .filter(|p| p.granularity == shared::PatternGranularity::Season)
                .map(|p| p.sample_count)
                .sum();
            prop_assert!(total <= observations.len());
        }
    }
}
