//! Offline HolidayProvider backed by static rule tables.
//!
//! Covers US, CA and GB plus a handful of their subdivisions. Anything else is an
//! unsupported location and yields no holidays.

use super::rules::DateRule;
use crate::domain::{DomainError, HolidayRow, Location, LocationOption, MonthDay};
use crate::ports::HolidayProvider;
use chrono::Weekday;

const PUBLIC: &str = "public";
const BANK: &str = "bank";
const OBSERVANCE: &str = "observance";
const OPTIONAL: &str = "optional";

struct Rule {
    name: &'static str,
    date: DateRule,
    kind: &'static str,
}

const fn fixed(name: &'static str, month: u32, day: u32, kind: &'static str) -> Rule {
    Rule {
        name,
        date: DateRule::Fixed { month, day },
        kind,
    }
}

const fn nth(name: &'static str, n: u8, weekday: Weekday, month: u32, kind: &'static str) -> Rule {
    Rule {
        name,
        date: DateRule::NthWeekday { month, weekday, n },
        kind,
    }
}

const fn last(name: &'static str, weekday: Weekday, month: u32, kind: &'static str) -> Rule {
    Rule {
        name,
        date: DateRule::LastWeekday { month, weekday },
        kind,
    }
}

const fn easter(name: &'static str, offset: i64, kind: &'static str) -> Rule {
    Rule {
        name,
        date: DateRule::Easter(offset),
        kind,
    }
}

const US: &[Rule] = &[
    fixed("New Year's Day", 1, 1, PUBLIC),
    nth("Martin Luther King Jr. Day", 3, Weekday::Mon, 1, PUBLIC),
    fixed("Valentine's Day", 2, 14, OBSERVANCE),
    nth("Washington's Birthday", 3, Weekday::Mon, 2, PUBLIC),
    fixed("St. Patrick's Day", 3, 17, OBSERVANCE),
    easter("Easter Sunday", 0, OBSERVANCE),
    nth("Mother's Day", 2, Weekday::Sun, 5, OBSERVANCE),
    last("Memorial Day", Weekday::Mon, 5, PUBLIC),
    nth("Father's Day", 3, Weekday::Sun, 6, OBSERVANCE),
    fixed("Juneteenth", 6, 19, PUBLIC),
    fixed("Independence Day", 7, 4, PUBLIC),
    nth("Labor Day", 1, Weekday::Mon, 9, PUBLIC),
    nth("Columbus Day", 2, Weekday::Mon, 10, PUBLIC),
    fixed("Halloween", 10, 31, OBSERVANCE),
    fixed("Veterans Day", 11, 11, PUBLIC),
    nth("Thanksgiving", 4, Weekday::Thu, 11, PUBLIC),
    fixed("Christmas Eve", 12, 24, OPTIONAL),
    fixed("Christmas Day", 12, 25, PUBLIC),
    fixed("New Year's Eve", 12, 31, OBSERVANCE),
];

const US_CA: &[Rule] = &[fixed("César Chávez Day", 3, 31, PUBLIC)];

const US_MA: &[Rule] = &[nth("Patriots' Day", 3, Weekday::Mon, 4, PUBLIC)];

const US_NY: &[Rule] = &[fixed("Lincoln's Birthday", 2, 12, PUBLIC)];

const US_TX: &[Rule] = &[
    fixed("Texas Independence Day", 3, 2, PUBLIC),
    fixed("San Jacinto Day", 4, 21, PUBLIC),
];

const CA: &[Rule] = &[
    fixed("New Year's Day", 1, 1, PUBLIC),
    fixed("Valentine's Day", 2, 14, OBSERVANCE),
    easter("Good Friday", -2, PUBLIC),
    easter("Easter Sunday", 0, OBSERVANCE),
    nth("Mother's Day", 2, Weekday::Sun, 5, OBSERVANCE),
    Rule {
        name: "Victoria Day",
        date: DateRule::WeekdayBefore {
            month: 5,
            day: 25,
            weekday: Weekday::Mon,
        },
        kind: PUBLIC,
    },
    nth("Father's Day", 3, Weekday::Sun, 6, OBSERVANCE),
    fixed("Canada Day", 7, 1, PUBLIC),
    nth("Civic Holiday", 1, Weekday::Mon, 8, OPTIONAL),
    nth("Labour Day", 1, Weekday::Mon, 9, PUBLIC),
    fixed("National Day for Truth and Reconciliation", 9, 30, PUBLIC),
    nth("Thanksgiving", 2, Weekday::Mon, 10, PUBLIC),
    fixed("Halloween", 10, 31, OBSERVANCE),
    fixed("Remembrance Day", 11, 11, PUBLIC),
    fixed("Christmas Day", 12, 25, PUBLIC),
    fixed("Boxing Day", 12, 26, PUBLIC),
];

const CA_ON: &[Rule] = &[nth("Family Day", 3, Weekday::Mon, 2, PUBLIC)];

const CA_QC: &[Rule] = &[fixed("St. Jean Baptiste Day", 6, 24, PUBLIC)];

const GB: &[Rule] = &[
    fixed("New Year's Day", 1, 1, BANK),
    fixed("Valentine's Day", 2, 14, OBSERVANCE),
    easter("Mothering Sunday", -21, OBSERVANCE),
    easter("Good Friday", -2, BANK),
    easter("Easter Sunday", 0, OBSERVANCE),
    easter("Easter Monday", 1, BANK),
    nth("Early May bank holiday", 1, Weekday::Mon, 5, BANK),
    last("Spring bank holiday", Weekday::Mon, 5, BANK),
    nth("Father's Day", 3, Weekday::Sun, 6, OBSERVANCE),
    last("Summer bank holiday", Weekday::Mon, 8, BANK),
    fixed("Halloween", 10, 31, OBSERVANCE),
    fixed("Guy Fawkes Night", 11, 5, OBSERVANCE),
    fixed("Christmas Day", 12, 25, BANK),
    fixed("Boxing Day", 12, 26, BANK),
];

const GB_SCT: &[Rule] = &[fixed("St Andrew's Day", 11, 30, BANK)];

const GB_NIR: &[Rule] = &[
    fixed("St Patrick's Day", 3, 17, BANK),
    fixed("Battle of the Boyne", 7, 12, BANK),
];

struct Subdivision {
    code: &'static str,
    name: &'static str,
    rules: &'static [Rule],
}

struct Country {
    code: &'static str,
    name: &'static str,
    rules: &'static [Rule],
    states: &'static [Subdivision],
}

const COUNTRIES: &[Country] = &[
    Country {
        code: "CA",
        name: "Canada",
        rules: CA,
        states: &[
            Subdivision {
                code: "on",
                name: "Ontario",
                rules: CA_ON,
            },
            Subdivision {
                code: "qc",
                name: "Quebec",
                rules: CA_QC,
            },
        ],
    },
    Country {
        code: "GB",
        name: "United Kingdom",
        rules: GB,
        states: &[
            Subdivision {
                code: "nir",
                name: "Northern Ireland",
                rules: GB_NIR,
            },
            Subdivision {
                code: "sct",
                name: "Scotland",
                rules: GB_SCT,
            },
        ],
    },
    Country {
        code: "US",
        name: "United States of America",
        rules: US,
        states: &[
            Subdivision {
                code: "ca",
                name: "California",
                rules: US_CA,
            },
            Subdivision {
                code: "ma",
                name: "Massachusetts",
                rules: US_MA,
            },
            Subdivision {
                code: "ny",
                name: "New York",
                rules: US_NY,
            },
            Subdivision {
                code: "tx",
                name: "Texas",
                rules: US_TX,
            },
        ],
    },
];

fn find_country(code: &str) -> Option<&'static Country> {
    COUNTRIES.iter().find(|c| c.code.eq_ignore_ascii_case(code))
}

/// Rule-table holiday source. Needs no network.
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinHolidays;

impl BuiltinHolidays {
    pub fn new() -> Self {
        Self
    }

    /// Synchronous lookup; the trait method delegates here.
    pub fn rows_for(&self, location: &Location, year: i32) -> Vec<HolidayRow> {
        let Some(country) = find_country(&location.country) else {
            return Vec::new();
        };
        let state = match location.state.as_deref().filter(|s| !s.is_empty()) {
            None => None,
            Some(code) => match country
                .states
                .iter()
                .find(|s| s.code.eq_ignore_ascii_case(code))
            {
                Some(state) => Some(state),
                None => return Vec::new(),
            },
        };
        // No subdivision below state level is modelled.
        if location.region.as_deref().is_some_and(|r| !r.is_empty()) {
            return Vec::new();
        }

        let mut dated: Vec<_> = country
            .rules
            .iter()
            .chain(state.map(|s| s.rules).unwrap_or_default())
            .filter_map(|rule| rule.date.resolve(year).map(|date| (date, rule)))
            .collect();
        dated.sort_by_key(|(date, _)| *date);

        dated
            .into_iter()
            .map(|(date, rule)| HolidayRow {
                name: rule.name.to_string(),
                month_day: MonthDay::of(date),
                kind: rule.kind.to_string(),
            })
            .collect()
    }
}

#[async_trait::async_trait]
impl HolidayProvider for BuiltinHolidays {
    async fn countries(&self) -> Result<Vec<LocationOption>, DomainError> {
        Ok(COUNTRIES
            .iter()
            .map(|c| LocationOption {
                code: c.code.to_string(),
                name: c.name.to_string(),
            })
            .collect())
    }

    async fn states(&self, country: &str) -> Result<Vec<LocationOption>, DomainError> {
        Ok(find_country(country)
            .map(|c| {
                c.states
                    .iter()
                    .map(|s| LocationOption {
                        code: s.code.to_string(),
                        name: s.name.to_string(),
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn regions(
        &self,
        _country: &str,
        _state: &str,
    ) -> Result<Vec<LocationOption>, DomainError> {
        Ok(Vec::new())
    }

    async fn lookup(&self, location: &Location, year: i32) -> Result<Vec<HolidayRow>, DomainError> {
        Ok(self.rows_for(location, year))
    }
}
