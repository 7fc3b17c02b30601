//! Static climate reference records: zones, seasonal rules, ENSO and crops

use serde::{Deserialize, Serialize};

/// Soil classes used for fertilization advice
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SoilType {
    Sandy,
    SandyLoam,
    Loam,
    ClayLoam,
    Clay,
}

impl std::fmt::Display for SoilType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SoilType::Sandy => write!(f, "sandy"),
            SoilType::SandyLoam => write!(f, "sandy loam"),
            SoilType::Loam => write!(f, "loam"),
            SoilType::ClayLoam => write!(f, "clay loam"),
            SoilType::Clay => write!(f, "clay"),
        }
    }
}

/// Reference profile for an agro-ecological region
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClimateZone {
    pub zone_id: String,
    pub name: String,
    pub altitude_m: f64,
    pub avg_temp_celsius: f64,
    pub annual_rainfall_mm: f64,
    pub rainy_season_months: Vec<u32>,
    pub dry_season_months: Vec<u32>,
    pub frost_risk_months: Vec<u32>,
    pub optimal_planting_months: Vec<u32>,
    /// Ordered by preference
    pub suitable_crops: Vec<String>,
    pub soil_type: SoilType,
}

impl ClimateZone {
    pub fn is_rainy_month(&self, month: u32) -> bool {
        self.rainy_season_months.contains(&month)
    }

    pub fn is_frost_month(&self, month: u32) -> bool {
        self.frost_risk_months.contains(&month)
    }

    pub fn is_planting_month(&self, month: u32) -> bool {
        self.optimal_planting_months.contains(&month)
    }

    /// Climatological rainfall for an average month
    pub fn monthly_rainfall_mm(&self) -> f64 {
        self.annual_rainfall_mm / 12.0
    }
}

/// Per-month adjustments applied to zone baselines
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SeasonalRule {
    pub month: u32,
    /// Additive; scaled by 5°C
    pub temp_modifier: f64,
    /// Multiplicative on the monthly rainfall baseline
    pub rainfall_modifier: f64,
    /// Centered on 1.0; each 0.1 shifts humidity by 2 points
    pub humidity_modifier: f64,
    /// Centered on 1.0; each 0.1 shifts wind by 0.5 km/h
    pub wind_modifier: f64,
}

impl SeasonalRule {
    pub fn temperature_delta(&self) -> f64 {
        self.temp_modifier * 5.0
    }

    pub fn humidity_delta(&self) -> f64 {
        (self.humidity_modifier - 1.0) * 20.0
    }

    pub fn wind_delta(&self) -> f64 {
        (self.wind_modifier - 1.0) * 5.0
    }
}

/// El Niño-Southern Oscillation phase
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum EnsoState {
    ElNino,
    LaNina,
    #[default]
    Neutral,
}

impl EnsoState {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnsoState::ElNino => "el_nino",
            EnsoState::LaNina => "la_nina",
            EnsoState::Neutral => "neutral",
        }
    }

    /// Parse a state name, falling back to neutral for anything unrecognized
    pub fn parse_or_neutral(value: &str) -> EnsoState {
        value.parse().unwrap_or_else(|_| {
            tracing::warn!("Unknown ENSO state '{}', falling back to neutral", value);
            EnsoState::Neutral
        })
    }
}

impl std::str::FromStr for EnsoState {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "el_nino" | "elnino" => Ok(EnsoState::ElNino),
            "la_nina" | "lanina" => Ok(EnsoState::LaNina),
            "neutral" => Ok(EnsoState::Neutral),
            _ => Err("Unknown ENSO state"),
        }
    }
}

impl std::fmt::Display for EnsoState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Climate modifiers attached to an ENSO phase
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct EnsoModifier {
    pub state: EnsoState,
    /// Additive; scaled by 3°C
    pub temp_modifier: f64,
    /// Fractional change in rainfall (-0.3 = 30% drier)
    pub rainfall_modifier: f64,
    pub drought_risk_contribution: f64,
}

/// Agronomic requirements for a crop
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CropProfile {
    pub crop_id: String,
    pub name: String,
    pub optimal_temp_min: f64,
    pub optimal_temp_max: f64,
    pub optimal_humidity_min: f64,
    pub optimal_humidity_max: f64,
    pub water_requirement_mm_per_season: f64,
    pub growing_period_days: u32,
    pub soil_ph_min: f64,
    pub soil_ph_max: f64,
}

impl CropProfile {
    pub fn temperature_in_range(&self, temperature: f64) -> bool {
        temperature >= self.optimal_temp_min && temperature <= self.optimal_temp_max
    }

    pub fn humidity_in_range(&self, humidity: f64) -> bool {
        humidity >= self.optimal_humidity_min && humidity <= self.optimal_humidity_max
    }

    /// Daily precipitation that satisfies the seasonal requirement
    pub fn daily_water_requirement_mm(&self) -> f64 {
        self.water_requirement_mm_per_season / 30.0
    }

    pub fn precipitation_adequate(&self, precipitation_mm: f64) -> bool {
        precipitation_mm >= self.daily_water_requirement_mm()
    }
}
