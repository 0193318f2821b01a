//! Week arithmetic: range resolution, week-start snapping, page enumeration.
//!
//! Weeks start on Sunday. Everything here is pure; no clock is consulted.

use crate::domain::{DateRange, DomainError, GenerationRequest, WeekPage};
use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// First day of every calendar week.
pub const WEEK_START: Weekday = Weekday::Sun;

/// How the caller asked for the calendar span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeRequest {
    Year(i32),
    Explicit { start: NaiveDate, end: NaiveDate },
}

impl RangeRequest {
    /// Picks the range form out of a request's optional fields.
    /// A complete start/end pair wins over `year`; a partial pair falls back to `year`.
    pub fn from_parts(
        year: Option<i32>,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Self, DomainError> {
        match (start, end, year) {
            (Some(start), Some(end), _) => Ok(RangeRequest::Explicit { start, end }),
            (_, _, Some(year)) => Ok(RangeRequest::Year(year)),
            _ => Err(DomainError::InvalidRange(
                "either a year or both start and end dates must be provided".into(),
            )),
        }
    }

    pub fn from_request(req: &GenerationRequest) -> Result<Self, DomainError> {
        Self::from_parts(req.year, req.start_date, req.end_date)
    }
}

/// Resolved range plus the year used for week numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedRange {
    pub range: DateRange,
    pub reference_year: i32,
}

/// Snaps `date` back to the week start on or before it.
pub fn snap_to_week_start(date: NaiveDate) -> NaiveDate {
    let offset = (7 + date.weekday().num_days_from_sunday()
        - WEEK_START.num_days_from_sunday())
        % 7;
    date - Duration::days(i64::from(offset))
}

/// Turns a year or an explicit span into a week-aligned [`DateRange`].
pub fn resolve_range(request: RangeRequest) -> Result<ResolvedRange, DomainError> {
    let (requested_start, end, reference_year) = match request {
        RangeRequest::Year(year) => {
            let first = NaiveDate::from_ymd_opt(year, 1, 1)
                .ok_or_else(|| DomainError::InvalidRange(format!("year {} out of range", year)))?;
            let last = NaiveDate::from_ymd_opt(year, 12, 31)
                .ok_or_else(|| DomainError::InvalidRange(format!("year {} out of range", year)))?;
            (first, last, year)
        }
        RangeRequest::Explicit { start, end } => {
            if start > end {
                return Err(DomainError::InvalidRange(format!(
                    "start {} is after end {}",
                    start, end
                )));
            }
            (start, end, start.year())
        }
    };

    Ok(ResolvedRange {
        range: DateRange {
            start: snap_to_week_start(requested_start),
            end,
            requested_start,
        },
        reference_year,
    })
}

/// 1-based week number relative to the week containing January 1 of `reference_year`.
pub fn week_number(week_start: NaiveDate, reference_year: i32) -> i64 {
    let anchor = NaiveDate::from_ymd_opt(reference_year, 1, 1)
        .map(snap_to_week_start)
        .unwrap_or(week_start);
    1 + (week_start - anchor).num_days().div_euclid(7)
}

/// Lazy, restartable enumeration of the week pages covering a range.
#[derive(Debug, Clone, Copy)]
pub struct WeekPager {
    range: DateRange,
    reference_year: i32,
}

impl WeekPager {
    pub fn new(resolved: ResolvedRange) -> Self {
        Self {
            range: resolved.range,
            reference_year: resolved.reference_year,
        }
    }

    /// Upper bound on the number of pages: ceil(inclusive days / 7).
    pub fn total_weeks(&self) -> usize {
        let days = (self.range.end - self.range.start).num_days() + 1;
        days.max(0).div_euclid(7) as usize + usize::from(days.rem_euclid(7) != 0)
    }

    pub fn range(&self) -> DateRange {
        self.range
    }

    pub fn reference_year(&self) -> i32 {
        self.reference_year
    }

    /// Fresh iterator from the first week. Can be called any number of times.
    pub fn iter(&self) -> Weeks {
        Weeks {
            pager: *self,
            index: 0,
            total: self.total_weeks(),
        }
    }
}

impl<'a> IntoIterator for &'a WeekPager {
    type Item = WeekPage;
    type IntoIter = Weeks;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over [`WeekPage`] skeletons (no day cells yet).
#[derive(Debug, Clone)]
pub struct Weeks {
    pager: WeekPager,
    index: usize,
    total: usize,
}

impl Iterator for Weeks {
    type Item = WeekPage;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.total {
            return None;
        }
        let week_start = self.pager.range.start + Duration::weeks(self.index as i64);
        // The count is only an upper bound.
        if week_start > self.pager.range.end {
            self.index = self.total;
            return None;
        }
        self.index += 1;
        Some(WeekPage {
            week_start,
            week_end: week_start + Duration::days(6),
            week_number: week_number(week_start, self.pager.reference_year),
            days: Vec::new(),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.total - self.index))
    }
}
