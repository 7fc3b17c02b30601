//! Pure agro-climatic engine
//!
//! No I/O. Reference tables are passed in by the caller.

pub mod anomaly;
pub mod forecaster;
pub mod jitter;
pub mod patterns;
pub mod predictor;
pub mod reference;
pub mod settings;
pub mod statistics;

pub use anomaly::{AnomalyDetector, AnomalyThresholds, SeriesBaseline};
pub use forecaster::{ForecastRequest, RuleBasedSeasonalForecaster};
pub use jitter::Jitter;
pub use patterns::SeasonalPatternAnalyzer;
pub use predictor::{select_baseline, AgroClimaticPredictor, DailyBaseline, PredictionRequest};
pub use reference::ClimateReferenceData;
pub use settings::EngineSettings;
pub use statistics::{describe, DescriptiveStats};
