//! Climate reference tables.
//!
//! Immutable configuration handed to the engine components by reference.
//! `ClimateReferenceData::default()` carries the built-in southern-African
//! tables; tests and deployments can construct alternates with `new`.

use serde::{Deserialize, Serialize};

use crate::models::{ClimateZone, CropProfile, EnsoModifier, EnsoState, SeasonalRule, SoilType};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClimateReferenceData {
    zones: Vec<ClimateZone>,
    seasonal_rules: Vec<SeasonalRule>,
    enso_modifiers: Vec<EnsoModifier>,
    crops: Vec<CropProfile>,
}

impl ClimateReferenceData {
    /// Build from explicit tables.
    ///
    /// The first zone is the fallback for unknown zone ids. Months without a
    /// rule get a neutral one and missing ENSO states get zero modifiers.
    pub fn new(
        zones: Vec<ClimateZone>,
        seasonal_rules: Vec<SeasonalRule>,
        enso_modifiers: Vec<EnsoModifier>,
        crops: Vec<CropProfile>,
    ) -> Self {
        Self {
            zones,
            seasonal_rules,
            enso_modifiers,
            crops,
        }
    }

    pub fn zones(&self) -> &[ClimateZone] {
        &self.zones
    }

    /// Crop profiles in table order (the tie-break order for crop selection)
    pub fn crops(&self) -> &[CropProfile] {
        &self.crops
    }

    pub fn find_zone(&self, zone_id: &str) -> Option<&ClimateZone> {
        self.zones
            .iter()
            .find(|z| z.zone_id.eq_ignore_ascii_case(zone_id))
    }

    /// Look up a zone, falling back to `default_zone` and then to the first entry
    pub fn zone_or_default(&self, zone_id: &str, default_zone: &str) -> Option<&ClimateZone> {
        if let Some(zone) = self.find_zone(zone_id) {
            return Some(zone);
        }
        tracing::warn!(
            "Unknown climate zone '{}', falling back to '{}'",
            zone_id,
            default_zone
        );
        self.find_zone(default_zone).or_else(|| self.zones.first())
    }

    pub fn seasonal_rule(&self, month: u32) -> SeasonalRule {
        self.seasonal_rules
            .iter()
            .find(|r| r.month == month)
            .copied()
            .unwrap_or(SeasonalRule {
                month,
                temp_modifier: 0.0,
                rainfall_modifier: 1.0,
                humidity_modifier: 1.0,
                wind_modifier: 1.0,
            })
    }

    pub fn enso_modifier(&self, state: EnsoState) -> EnsoModifier {
        self.enso_modifiers
            .iter()
            .find(|m| m.state == state)
            .copied()
            .unwrap_or(EnsoModifier {
                state,
                temp_modifier: 0.0,
                rainfall_modifier: 0.0,
                drought_risk_contribution: 0.0,
            })
    }

    pub fn crop(&self, crop_id: &str) -> Option<&CropProfile> {
        self.crops
            .iter()
            .find(|c| c.crop_id.eq_ignore_ascii_case(crop_id))
    }
}

impl Default for ClimateReferenceData {
    fn default() -> Self {
        Self::new(
            default_zones(),
            default_seasonal_rules(),
            default_enso_modifiers(),
            default_crops(),
        )
    }
}

fn zone(
    zone_id: &str,
    name: &str,
    altitude_m: f64,
    avg_temp_celsius: f64,
    annual_rainfall_mm: f64,
    rainy: &[u32],
    frost: &[u32],
    planting: &[u32],
    crops: &[&str],
    soil_type: SoilType,
) -> ClimateZone {
    let dry = (1..=12).filter(|m| !rainy.contains(m)).collect();
    ClimateZone {
        zone_id: zone_id.to_string(),
        name: name.to_string(),
        altitude_m,
        avg_temp_celsius,
        annual_rainfall_mm,
        rainy_season_months: rainy.to_vec(),
        dry_season_months: dry,
        frost_risk_months: frost.to_vec(),
        optimal_planting_months: planting.to_vec(),
        suitable_crops: crops.iter().map(|c| c.to_string()).collect(),
        soil_type,
    }
}

fn default_zones() -> Vec<ClimateZone> {
    vec![
        zone(
            "highveld",
            "Highveld",
            1500.0,
            18.0,
            800.0,
            &[11, 12, 1, 2, 3],
            &[6, 7, 8],
            &[10, 11, 12],
            &["maize", "tobacco", "soybean", "wheat", "potato"],
            SoilType::SandyLoam,
        ),
        zone(
            "middleveld",
            "Middleveld",
            1000.0,
            21.0,
            650.0,
            &[11, 12, 1, 2, 3],
            &[6, 7],
            &[11, 12],
            &["maize", "cotton", "groundnut", "sorghum", "sunflower"],
            SoilType::Sandy,
        ),
        zone(
            "lowveld",
            "Lowveld",
            500.0,
            25.0,
            450.0,
            &[12, 1, 2],
            &[],
            &[11, 12, 1],
            &["sorghum", "millet", "cotton", "sugarcane"],
            SoilType::Clay,
        ),
        zone(
            "eastern_highlands",
            "Eastern Highlands",
            1800.0,
            16.0,
            1200.0,
            &[10, 11, 12, 1, 2, 3, 4],
            &[6, 7, 8],
            &[9, 10, 11],
            &["tea", "coffee", "potato", "maize"],
            SoilType::ClayLoam,
        ),
    ]
}

fn default_seasonal_rules() -> Vec<SeasonalRule> {
    // (month, temp, rainfall, humidity, wind)
    let table: [(u32, f64, f64, f64, f64); 12] = [
        (1, 0.6, 2.2, 1.3, 0.9),
        (2, 0.5, 2.0, 1.3, 0.9),
        (3, 0.3, 1.4, 1.2, 0.9),
        (4, 0.0, 0.6, 1.0, 1.0),
        (5, -0.4, 0.15, 0.85, 1.0),
        (6, -0.8, 0.05, 0.8, 1.1),
        (7, -0.9, 0.05, 0.75, 1.2),
        (8, -0.5, 0.05, 0.7, 1.4),
        (9, 0.1, 0.1, 0.65, 1.5),
        (10, 0.7, 0.4, 0.7, 1.3),
        (11, 0.7, 1.3, 0.95, 1.1),
        (12, 0.6, 2.0, 1.2, 1.0),
    ];
    table
        .iter()
        .map(|&(month, temp, rain, humidity, wind)| SeasonalRule {
            month,
            temp_modifier: temp,
            rainfall_modifier: rain,
            humidity_modifier: humidity,
            wind_modifier: wind,
        })
        .collect()
}

fn default_enso_modifiers() -> Vec<EnsoModifier> {
    vec![
        EnsoModifier {
            state: EnsoState::ElNino,
            temp_modifier: 0.5,
            rainfall_modifier: -0.3,
            drought_risk_contribution: 0.3,
        },
        EnsoModifier {
            state: EnsoState::LaNina,
            temp_modifier: -0.3,
            rainfall_modifier: 0.2,
            drought_risk_contribution: -0.1,
        },
        EnsoModifier {
            state: EnsoState::Neutral,
            temp_modifier: 0.0,
            rainfall_modifier: 0.0,
            drought_risk_contribution: 0.0,
        },
    ]
}

fn crop(
    crop_id: &str,
    name: &str,
    temp: (f64, f64),
    humidity: (f64, f64),
    water_mm: f64,
    days: u32,
    ph: (f64, f64),
) -> CropProfile {
    CropProfile {
        crop_id: crop_id.to_string(),
        name: name.to_string(),
        optimal_temp_min: temp.0,
        optimal_temp_max: temp.1,
        optimal_humidity_min: humidity.0,
        optimal_humidity_max: humidity.1,
        water_requirement_mm_per_season: water_mm,
        growing_period_days: days,
        soil_ph_min: ph.0,
        soil_ph_max: ph.1,
    }
}

fn default_crops() -> Vec<CropProfile> {
    vec![
        crop("maize", "Maize", (18.0, 24.0), (60.0, 80.0), 500.0, 120, (5.5, 7.0)),
        crop("wheat", "Wheat", (15.0, 20.0), (50.0, 70.0), 450.0, 120, (6.0, 7.5)),
        crop("sorghum", "Sorghum", (25.0, 32.0), (40.0, 65.0), 450.0, 110, (5.5, 8.5)),
        crop("millet", "Pearl Millet", (25.0, 35.0), (30.0, 60.0), 350.0, 90, (5.5, 7.5)),
        crop("groundnut", "Groundnut", (22.0, 30.0), (50.0, 70.0), 500.0, 120, (5.5, 7.0)),
        crop("soybean", "Soybean", (20.0, 30.0), (60.0, 80.0), 550.0, 110, (6.0, 7.0)),
        crop("cotton", "Cotton", (21.0, 30.0), (50.0, 70.0), 700.0, 160, (5.8, 8.0)),
        crop("tobacco", "Tobacco", (20.0, 30.0), (65.0, 80.0), 500.0, 100, (5.0, 6.5)),
        crop("sunflower", "Sunflower", (20.0, 25.0), (40.0, 60.0), 450.0, 100, (6.0, 7.5)),
        crop("potato", "Potato", (15.0, 20.0), (70.0, 85.0), 500.0, 100, (5.0, 6.5)),
        crop("sugarcane", "Sugarcane", (24.0, 30.0), (70.0, 85.0), 1500.0, 365, (6.0, 7.5)),
        crop("tea", "Tea", (18.0, 25.0), (70.0, 90.0), 1200.0, 365, (4.5, 5.5)),
        crop("coffee", "Arabica Coffee", (18.0, 22.0), (70.0, 85.0), 1200.0, 270, (5.5, 6.5)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tables_complete() {
        let reference = ClimateReferenceData::default();
        assert_eq!(reference.zones().len(), 4);
        assert_eq!(reference.crops().len(), 13);
        for month in 1..=12 {
            assert_eq!(reference.seasonal_rule(month).month, month);
        }
    }

    #[test]
    fn test_zone_crops_all_have_profiles() {
        let reference = ClimateReferenceData::default();
        for zone in reference.zones() {
            for crop_id in &zone.suitable_crops {
                assert!(reference.crop(crop_id).is_some(), "missing profile for {}", crop_id);
            }
        }
    }

    #[test]
    fn test_dry_months_complement_rainy_months() {
        let reference = ClimateReferenceData::default();
        let lowveld = reference.find_zone("lowveld").unwrap();
        assert_eq!(lowveld.dry_season_months.len(), 9);
        assert!(!lowveld.dry_season_months.contains(&1));
    }

    #[test]
    fn test_unknown_zone_falls_back() {
        let reference = ClimateReferenceData::default();
        let zone = reference.zone_or_default("atlantis", "highveld").unwrap();
        assert_eq!(zone.zone_id, "highveld");
        let zone = reference.zone_or_default("atlantis", "also_missing").unwrap();
        assert_eq!(zone.zone_id, "highveld");
        let zone = reference.zone_or_default("LOWVELD", "highveld").unwrap();
        assert_eq!(zone.zone_id, "lowveld");
    }

    #[test]
    fn test_missing_entries_are_neutral() {
        let reference = ClimateReferenceData::new(vec![], vec![], vec![], vec![]);
        let rule = reference.seasonal_rule(5);
        assert_eq!(rule.rainfall_modifier, 1.0);
        assert_eq!(rule.temp_modifier, 0.0);
        let enso = reference.enso_modifier(EnsoState::ElNino);
        assert_eq!(enso.drought_risk_contribution, 0.0);
        assert!(reference.zone_or_default("highveld", "highveld").is_none());
    }

    #[test]
    fn test_el_nino_is_dry_and_warm() {
        let reference = ClimateReferenceData::default();
        let enso = reference.enso_modifier(EnsoState::ElNino);
        assert!(enso.rainfall_modifier < 0.0);
        assert!(enso.temp_modifier > 0.0);
        assert!(enso.drought_risk_contribution > 0.0);
    }
}
