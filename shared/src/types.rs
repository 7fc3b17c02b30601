//! Common types used across the platform

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// GPS coordinates
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GpsCoordinates {
    pub latitude: Decimal,
    pub longitude: Decimal,
}

impl GpsCoordinates {
    pub fn new(latitude: Decimal, longitude: Decimal) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// A single observation site (farm, station or plot centroid)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Location {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub coordinates: GpsCoordinates,
}

impl Location {
    pub fn new(latitude: Decimal, longitude: Decimal) -> Self {
        Self {
            name: None,
            coordinates: GpsCoordinates::new(latitude, longitude),
        }
    }

    pub fn named(name: impl Into<String>, latitude: Decimal, longitude: Decimal) -> Self {
        Self {
            name: Some(name.into()),
            coordinates: GpsCoordinates::new(latitude, longitude),
        }
    }

    /// Stable key used for seeding jitter and for storage lookups.
    ///
    /// Coordinates are normalized so `18.70` and `18.7` map to the same key.
    pub fn key(&self) -> String {
        format!(
            "{}:{}",
            self.coordinates.latitude.normalize(),
            self.coordinates.longitude.normalize()
        )
    }

    /// Human-readable label for summaries and alerts
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => self.key(),
        }
    }
}

/// Date range for queries
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// The `days` days ending on (and including) `end`
    pub fn trailing_days(end: NaiveDate, days: i64) -> Self {
        let start = end - chrono::Duration::days((days - 1).max(0));
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// Climatological season.
///
/// The engine uses the southern-hemisphere convention everywhere:
/// December-February is summer, March-May autumn, June-August winter and
/// September-November spring.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    Summer,
    Autumn,
    Winter,
    Spring,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Summer, Season::Autumn, Season::Winter, Season::Spring];

    /// Map a calendar month (1..=12) to its season
    pub fn from_month(month: u32) -> Season {
        match month {
            12 | 1 | 2 => Season::Summer,
            3..=5 => Season::Autumn,
            6..=8 => Season::Winter,
            _ => Season::Spring,
        }
    }

    pub fn for_date(date: NaiveDate) -> Season {
        Season::from_month(date.month())
    }

    pub fn months(&self) -> [u32; 3] {
        match self {
            Season::Summer => [12, 1, 2],
            Season::Autumn => [3, 4, 5],
            Season::Winter => [6, 7, 8],
            Season::Spring => [9, 10, 11],
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Season::Summer => "summer",
            Season::Autumn => "autumn",
            Season::Winter => "winter",
            Season::Spring => "spring",
        }
    }
}

impl std::fmt::Display for Season {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// English month name for a 1-based month number
pub fn month_name(month: u32) -> &'static str {
    let index = (month.clamp(1, 12) - 1) as usize;
    MONTH_NAMES[index]
}

/// Month number (1..=12) for an English month name, case-insensitive
pub fn month_from_name(name: &str) -> Option<u32> {
    MONTH_NAMES
        .iter()
        .position(|m| m.eq_ignore_ascii_case(name))
        .map(|i| i as u32 + 1)
}

/// Number of days in the given month
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    match (
        NaiveDate::from_ymd_opt(year, month, 1),
        NaiveDate::from_ymd_opt(next_year, next_month, 1),
    ) {
        (Some(first), Some(next)) => (next - first).num_days() as u32,
        _ => 30,
    }
}

/// Pagination parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 20,
        }
    }
}

impl Pagination {
    pub fn offset(&self) -> i64 {
        (self.page.saturating_sub(1) as i64) * self.per_page as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_season_mapping_is_southern_hemisphere() {
        assert_eq!(Season::from_month(1), Season::Summer);
        assert_eq!(Season::from_month(12), Season::Summer);
        assert_eq!(Season::from_month(4), Season::Autumn);
        assert_eq!(Season::from_month(7), Season::Winter);
        assert_eq!(Season::from_month(10), Season::Spring);
    }

    #[test]
    fn test_season_months_round_trip() {
        for season in Season::ALL {
            for month in season.months() {
                assert_eq!(Season::from_month(month), season);
            }
        }
    }

    #[test]
    fn test_month_names() {
        assert_eq!(month_name(1), "January");
        assert_eq!(month_name(12), "December");
        assert_eq!(month_from_name("march"), Some(3));
        assert_eq!(month_from_name("summer"), None);
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(2023, 12), 31);
        assert_eq!(days_in_month(2023, 4), 30);
    }

    #[test]
    fn test_location_key_is_normalized() {
        let a = Location::new(Decimal::new(-17830, 3), Decimal::new(3105, 2));
        let b = Location::new(Decimal::new(-1783, 2), Decimal::new(31050, 3));
        assert_eq!(a.key(), b.key());
    }

    #[test]
    fn test_trailing_days() {
        let end = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        let range = DateRange::trailing_days(end, 31);
        assert_eq!(range.start, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert!(range.contains(end));
    }
}
