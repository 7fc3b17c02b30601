//! Tunable engine parameters

use serde::{Deserialize, Serialize};

/// Engine parameters, deserializable from the server's `engine` config section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineSettings {
    /// Partitions with fewer observations produce no pattern
    pub min_pattern_samples: usize,
    /// Coarse extreme-temperature check: partition mean ± this many °C
    pub extreme_temperature_offset_c: f64,
    pub monthly_patterns: bool,
    pub yearly_patterns: bool,
    /// Drought-index baseline; no derivation is known, so it stays configurable
    pub expected_daily_precipitation_mm: f64,
    /// Zone used when a request names an unknown zone
    pub default_zone: String,
    /// Observation history loaded for a prediction
    pub history_days: i64,
    /// Upper bound on concurrent predictions in a batch
    pub max_concurrency: usize,
    pub default_horizon_months: u32,
    pub max_horizon_months: u32,
    /// Disable to get the bare rule output with no noise
    pub jitter: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            min_pattern_samples: 5,
            extreme_temperature_offset_c: 10.0,
            monthly_patterns: true,
            yearly_patterns: false,
            expected_daily_precipitation_mm: 2.0,
            default_zone: "highveld".to_string(),
            history_days: 365,
            max_concurrency: 4,
            default_horizon_months: 3,
            max_horizon_months: 12,
            jitter: true,
        }
    }
}
