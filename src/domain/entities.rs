//! Domain entities. Pure data structures for the calendar core.
//!
//! No renderer/IO types here; holiday rows arrive from adapters already mapped.

use crate::domain::DomainError;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Month/day key in "MM-DD" form. Used to match holidays and custom events against dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthDay {
    month: u32,
    day: u32,
}

impl MonthDay {
    /// Builds a key. `02-29` is accepted since it exists in leap years.
    pub fn new(month: u32, day: u32) -> Option<Self> {
        // 2000 is a leap year, so every real month/day pair is representable.
        NaiveDate::from_ymd_opt(2000, month, day).map(|_| Self { month, day })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            month: date.month(),
            day: date.day(),
        }
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    /// Pins the key to a concrete year. None for 02-29 outside leap years.
    pub fn in_year(&self, year: i32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(year, self.month, self.day)
    }
}

impl fmt::Display for MonthDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:02}", self.month, self.day)
    }
}

impl FromStr for MonthDay {
    type Err = DomainError;

    /// Parses "MM-DD". A full ISO date ("YYYY-MM-DD") is also accepted and its year dropped.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let tail = match s.len() {
            5 => Some(s),
            10 => s.get(5..),
            _ => None,
        }
        .ok_or_else(|| DomainError::Import(format!("bad month-day '{}'", s)))?;
        let (m, d) = tail
            .split_once('-')
            .ok_or_else(|| DomainError::Import(format!("bad month-day '{}'", s)))?;
        let month = m
            .parse::<u32>()
            .map_err(|_| DomainError::Import(format!("bad month in '{}'", s)))?;
        let day = d
            .parse::<u32>()
            .map_err(|_| DomainError::Import(format!("bad day in '{}'", s)))?;
        MonthDay::new(month, day)
            .ok_or_else(|| DomainError::Import(format!("no such month-day '{}'", s)))
    }
}

impl Serialize for MonthDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A holiday pinned to one year. Supplied by the holiday collaborator; matched by
/// exact (month_day, year).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayEvent {
    pub name: String,
    pub month_day: MonthDay,
    pub year: i32,
    /// Location the holiday came from, e.g. "US" or "US-ca".
    pub category: String,
}

/// Raw collaborator row, before it is pinned to a year and category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayRow {
    pub name: String,
    pub month_day: MonthDay,
    #[serde(rename = "type")]
    pub kind: String,
}

/// User-defined event. Recurring events match every year; others only `year`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomEvent {
    pub name: String,
    pub month_day: MonthDay,
    #[serde(default)]
    pub recurring: bool,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default = "default_glyph")]
    pub glyph: String,
}

pub fn default_glyph() -> String {
    "🎉".to_string()
}

/// Country / state / region codes for a holiday lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub country: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
}

impl Location {
    pub fn country(code: impl Into<String>) -> Self {
        Self {
            country: code.into(),
            state: None,
            region: None,
        }
    }

    /// Category id: non-empty codes joined by '-', e.g. "US-ca".
    pub fn category_id(&self) -> String {
        [Some(&self.country), self.state.as_ref(), self.region.as_ref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .cloned()
            .collect::<Vec<_>>()
            .join("-")
    }
}

/// Code + display name for a selectable country/state/region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationOption {
    pub code: String,
    pub name: String,
}

/// Resolved calendar span. `start` is always snapped to the week start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Start date before snapping (what the user asked for).
    pub requested_start: NaiveDate,
}

/// One day column on a week page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayCell {
    pub date: NaiveDate,
    /// Holidays first (with "!"), then custom events, each in selection order.
    pub labels: Vec<String>,
    /// False for tail days past the requested end date.
    pub in_range: bool,
}

/// One page = one calendar week. `days` is empty in pager skeletons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekPage {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub week_number: i64,
    pub days: Vec<DayCell>,
}

/// What to do with days of the final week that fall after the requested end date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TailPolicy {
    /// Render the whole final week, labels and writing lines included.
    #[default]
    FullWeek,
    /// Draw only the day header for days past the end date.
    #[serde(alias = "clip")]
    ClipToRange,
}

impl FromStr for TailPolicy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full-week" | "full" => Ok(TailPolicy::FullWeek),
            "clip" | "clip-to-range" => Ok(TailPolicy::ClipToRange),
            other => Err(DomainError::InvalidRange(format!(
                "unknown tail policy '{}'",
                other
            ))),
        }
    }
}

/// Caller-facing generation input. Exactly one of `year` or the
/// `start_date`/`end_date` pair is expected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub calendar_header: String,
    #[serde(default)]
    pub holidays: Vec<HolidayEvent>,
    #[serde(default)]
    pub custom_events: Vec<CustomEvent>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_day_parse_and_display() {
        let md: MonthDay = "07-04".parse().unwrap();
        assert_eq!(md.month(), 7);
        assert_eq!(md.day(), 4);
        assert_eq!(md.to_string(), "07-04");

        let from_iso: MonthDay = "2024-02-29".parse().unwrap();
        assert_eq!(from_iso.to_string(), "02-29");
    }

    #[test]
    fn test_month_day_rejects_garbage() {
        assert!("13-01".parse::<MonthDay>().is_err());
        assert!("02-30".parse::<MonthDay>().is_err());
        assert!("7-4".parse::<MonthDay>().is_err());
        assert!("ab-cd".parse::<MonthDay>().is_err());
    }

    #[test]
    fn test_leap_day_in_year() {
        let md = MonthDay::new(2, 29).unwrap();
        assert!(md.in_year(2024).is_some());
        assert!(md.in_year(2025).is_none());
    }

    #[test]
    fn test_custom_event_json_shape() {
        let json = r#"{"name":"Anniversary","month_day":"09-20","recurring":true}"#;
        let ev: CustomEvent = serde_json::from_str(json).unwrap();
        assert!(ev.recurring);
        assert_eq!(ev.year, None);
        assert_eq!(ev.glyph, "🎉");
        let back = serde_json::to_string(&ev).unwrap();
        assert!(back.contains("\"month_day\":\"09-20\""));
    }

    #[test]
    fn test_category_id_skips_empty_codes() {
        let loc = Location {
            country: "US".into(),
            state: Some("ca".into()),
            region: Some(String::new()),
        };
        assert_eq!(loc.category_id(), "US-ca");
        assert_eq!(Location::country("GB").category_id(), "GB");
    }

    #[test]
    fn test_tail_policy_parse() {
        assert_eq!("clip".parse::<TailPolicy>().unwrap(), TailPolicy::ClipToRange);
        assert_eq!(
            "full-week".parse::<TailPolicy>().unwrap(),
            TailPolicy::FullWeek
        );
        assert!("sideways".parse::<TailPolicy>().is_err());
    }
}
