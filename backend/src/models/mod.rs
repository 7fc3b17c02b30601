//! Database models for the Agro-Climate Advisory Platform
//!
//! Re-exports records from the shared crate and adds backend-specific row types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;

pub use shared::models::*;
use shared::Location;

/// Row in the `observations` table
#[derive(Debug, Clone, FromRow)]
pub struct ObservationRow {
    pub latitude: Decimal,
    pub longitude: Decimal,
    pub location_name: Option<String>,
    pub recorded_at: DateTime<Utc>,
    pub temperature_celsius: f64,
    pub humidity_percent: f64,
    pub precipitation_mm: f64,
    pub wind_speed_kmh: f64,
    pub pressure_hpa: f64,
    pub uv_index: Option<f64>,
    pub cloud_cover_percent: Option<f64>,
    pub wind_direction_deg: Option<f64>,
}

impl From<ObservationRow> for Observation {
    fn from(row: ObservationRow) -> Self {
        let location = match row.location_name {
            Some(name) => Location::named(name, row.latitude, row.longitude),
            None => Location::new(row.latitude, row.longitude),
        };
        Observation {
            timestamp: row.recorded_at,
            location,
            temperature_celsius: row.temperature_celsius,
            humidity_percent: row.humidity_percent,
            precipitation_mm: row.precipitation_mm,
            wind_speed_kmh: row.wind_speed_kmh,
            pressure_hpa: row.pressure_hpa,
            uv_index: row.uv_index,
            cloud_cover_percent: row.cloud_cover_percent,
            wind_direction_deg: row.wind_direction_deg,
        }
    }
}

/// A stored JSONB record column
#[derive(Debug, FromRow)]
pub struct RecordRow {
    pub record: serde_json::Value,
}
