//! Validation utilities for observation input
//!
//! Malformed readings are rejected here, at the data-source boundary, so the
//! engine itself can assume finite numbers.

use rust_decimal::Decimal;
use validator::Validate;

use crate::models::Observation;
use crate::types::{DateRange, GpsCoordinates};

// ============================================================================
// Observation Validations
// ============================================================================

/// Validate that every numeric field of an observation is finite
pub fn validate_finite_readings(observation: &Observation) -> Result<(), &'static str> {
    let required = [
        observation.temperature_celsius,
        observation.humidity_percent,
        observation.precipitation_mm,
        observation.wind_speed_kmh,
        observation.pressure_hpa,
    ];
    if required.iter().any(|v| !v.is_finite()) {
        return Err("Observation readings must be finite numbers");
    }

    let optional = [
        observation.uv_index,
        observation.cloud_cover_percent,
        observation.wind_direction_deg,
    ];
    if optional.iter().flatten().any(|v| !v.is_finite()) {
        return Err("Optional observation readings must be finite numbers");
    }
    Ok(())
}

/// Validate latitude/longitude bounds
pub fn validate_coordinates(coordinates: &GpsCoordinates) -> Result<(), &'static str> {
    if coordinates.latitude < Decimal::from(-90) || coordinates.latitude > Decimal::from(90) {
        return Err("Latitude must be between -90 and 90");
    }
    if coordinates.longitude < Decimal::from(-180) || coordinates.longitude > Decimal::from(180) {
        return Err("Longitude must be between -180 and 180");
    }
    Ok(())
}

/// Full boundary check for one observation: finiteness, ranges and coordinates
pub fn validate_observation(observation: &Observation) -> Result<(), String> {
    validate_finite_readings(observation).map_err(str::to_string)?;
    validate_coordinates(&observation.location.coordinates).map_err(str::to_string)?;
    observation.validate().map_err(|errors| {
        let fields: Vec<String> = errors
            .field_errors()
            .keys()
            .map(|field| field.to_string())
            .collect();
        format!("Observation out of range: {}", fields.join(", "))
    })
}

/// Split a batch into accepted observations and per-index rejection reasons
pub fn partition_valid(observations: Vec<Observation>) -> (Vec<Observation>, Vec<(usize, String)>) {
    let mut accepted = Vec::with_capacity(observations.len());
    let mut rejected = Vec::new();

    for (index, observation) in observations.into_iter().enumerate() {
        match validate_observation(&observation) {
            Ok(()) => accepted.push(observation),
            Err(reason) => rejected.push((index, reason)),
        }
    }

    (accepted, rejected)
}

// ============================================================================
// Request Validations
// ============================================================================

/// Validate a query date range
pub fn validate_date_range(range: &DateRange) -> Result<(), &'static str> {
    if range.start > range.end {
        return Err("Start date must not be after end date");
    }
    if (range.end - range.start).num_days() > 366 * 30 {
        return Err("Date range must not exceed 30 years");
    }
    Ok(())
}

/// Validate a forecast horizon against the configured maximum
pub fn validate_horizon(horizon_months: u32, max_horizon_months: u32) -> Result<(), &'static str> {
    if horizon_months == 0 {
        return Err("Forecast horizon must be at least one month");
    }
    if horizon_months > max_horizon_months {
        return Err("Forecast horizon exceeds the configured maximum");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Location;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn observation() -> Observation {
        Observation {
            timestamp: Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap(),
            location: Location::new(Decimal::new(-1783, 2), Decimal::new(3105, 2)),
            temperature_celsius: 24.5,
            humidity_percent: 68.0,
            precipitation_mm: 4.2,
            wind_speed_kmh: 11.0,
            pressure_hpa: 1012.0,
            uv_index: Some(9.0),
            cloud_cover_percent: None,
            wind_direction_deg: Some(90.0),
        }
    }

    #[test]
    fn test_valid_observation() {
        assert!(validate_observation(&observation()).is_ok());
    }

    #[test]
    fn test_nan_temperature_rejected() {
        let mut obs = observation();
        obs.temperature_celsius = f64::NAN;
        assert!(validate_finite_readings(&obs).is_err());
        assert!(validate_observation(&obs).is_err());
    }

    #[test]
    fn test_infinite_optional_reading_rejected() {
        let mut obs = observation();
        obs.uv_index = Some(f64::INFINITY);
        assert!(validate_finite_readings(&obs).is_err());
    }

    #[test]
    fn test_out_of_range_humidity_rejected() {
        let mut obs = observation();
        obs.humidity_percent = 140.0;
        let err = validate_observation(&obs).unwrap_err();
        assert!(err.contains("humidity_percent"));
    }

    #[test]
    fn test_negative_precipitation_rejected() {
        let mut obs = observation();
        obs.precipitation_mm = -1.0;
        assert!(validate_observation(&obs).is_err());
    }

    #[test]
    fn test_invalid_coordinates() {
        let coords = GpsCoordinates::new(Decimal::from(95), Decimal::from(30));
        assert!(validate_coordinates(&coords).is_err());
        let coords = GpsCoordinates::new(Decimal::from(-17), Decimal::from(181));
        assert!(validate_coordinates(&coords).is_err());
    }

    #[test]
    fn test_high_altitude_station_pressure_accepted() {
        // Addis Ababa, ~2350 m
        let mut obs = observation();
        obs.location = Location::new(Decimal::new(903, 2), Decimal::new(3875, 2));
        obs.pressure_hpa = 770.0;
        let (accepted, rejected) = partition_valid(vec![obs]);
        assert_eq!(accepted.len(), 1);
        assert!(rejected.is_empty());

        let mut obs = observation();
        obs.pressure_hpa = 250.0;
        let err = validate_observation(&obs).unwrap_err();
        assert!(err.contains("pressure_hpa"));
    }

    #[test]
    fn test_partition_valid() {
        let mut bad = observation();
        bad.pressure_hpa = f64::NAN;
        let (accepted, rejected) = partition_valid(vec![observation(), bad, observation()]);
        assert_eq!(accepted.len(), 2);
        assert_eq!(rejected.len(), 1);
        assert_eq!(rejected[0].0, 1);
    }

    #[test]
    fn test_date_range_validation() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        assert!(validate_date_range(&DateRange::new(start, end)).is_ok());
        assert!(validate_date_range(&DateRange::new(end, start)).is_err());
    }

    #[test]
    fn test_horizon_validation() {
        assert!(validate_horizon(3, 12).is_ok());
        assert!(validate_horizon(0, 12).is_err());
        assert!(validate_horizon(13, 12).is_err());
    }
}
