//! Holiday use cases: location listings, multi-year lookup, selection by name.

use crate::domain::calendar::{ResolvedRange, WeekPager};
use crate::domain::{DomainError, HolidayEvent, HolidayRow, Location, LocationOption};
use crate::ports::HolidayProvider;
use chrono::{Datelike, Duration};
use std::collections::HashSet;
use std::ops::RangeInclusive;
use std::sync::Arc;
use tracing::{info, warn};

pub struct HolidayService {
    provider: Arc<dyn HolidayProvider>,
}

impl HolidayService {
    pub fn new(provider: Arc<dyn HolidayProvider>) -> Self {
        Self { provider }
    }

    pub async fn countries(&self) -> Result<Vec<LocationOption>, DomainError> {
        self.provider.countries().await
    }

    pub async fn states(&self, country: &str) -> Result<Vec<LocationOption>, DomainError> {
        self.provider.states(country).await
    }

    pub async fn regions(
        &self,
        country: &str,
        state: &str,
    ) -> Result<Vec<LocationOption>, DomainError> {
        self.provider.regions(country, state).await
    }

    /// Holidays offered for selection at `location` in `year`.
    pub async fn available(
        &self,
        location: &Location,
        year: i32,
    ) -> Result<Vec<HolidayRow>, DomainError> {
        self.provider.lookup(location, year).await
    }

    /// Looks up every year in `years` and pins each row to its year and category.
    /// A year whose lookup fails is logged and skipped; the calendar is still printable.
    pub async fn holidays_for(
        &self,
        location: &Location,
        years: RangeInclusive<i32>,
    ) -> Vec<HolidayEvent> {
        let category = location.category_id();
        let mut events = Vec::new();
        for year in years {
            match self.provider.lookup(location, year).await {
                Ok(rows) => events.extend(rows.into_iter().map(|row| HolidayEvent {
                    name: row.name,
                    month_day: row.month_day,
                    year,
                    category: category.clone(),
                })),
                Err(e) => {
                    warn!(location = %category, year, error = %e, "holiday lookup failed, skipping year")
                }
            }
        }
        info!(location = %category, count = events.len(), "holidays loaded");
        events
    }
}

/// Keeps the holidays named in `names`, grouped in selection order. Within one name the
/// incoming order is kept. Names repeated in the selection are used once.
pub fn select_by_names(names: &[String], events: &[HolidayEvent]) -> Vec<HolidayEvent> {
    let mut seen = HashSet::new();
    names
        .iter()
        .filter(|name| seen.insert(*name))
        .flat_map(|name| events.iter().filter(move |e| &e.name == name).cloned())
        .collect()
}

/// Calendar years that appear on any page of `resolved` (first page start to last page end).
pub fn years_displayed(resolved: ResolvedRange) -> RangeInclusive<i32> {
    let weeks = WeekPager::new(resolved).total_weeks().max(1) as i64;
    let last_day = resolved.range.start + Duration::days(weeks * 7 - 1);
    resolved.range.start.year()..=last_day.year()
}
