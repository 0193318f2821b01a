//! Date rules for recurring holidays: fixed dates, nth/last weekday of a month, Easter offsets.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRule {
    Fixed { month: u32, day: u32 },
    /// `n`-th (1-based) `weekday` of `month`.
    NthWeekday { month: u32, weekday: Weekday, n: u8 },
    LastWeekday { month: u32, weekday: Weekday },
    /// Last `weekday` strictly before `month`/`day`.
    WeekdayBefore { month: u32, day: u32, weekday: Weekday },
    /// Days relative to Easter Sunday.
    Easter(i64),
}

impl DateRule {
    /// Concrete date in `year`, or None when the rule has no occurrence.
    pub fn resolve(&self, year: i32) -> Option<NaiveDate> {
        match *self {
            DateRule::Fixed { month, day } => NaiveDate::from_ymd_opt(year, month, day),
            DateRule::NthWeekday { month, weekday, n } => {
                NaiveDate::from_weekday_of_month_opt(year, month, weekday, n)
            }
            DateRule::LastWeekday { month, weekday } => {
                let last = last_day_of_month(year, month)?;
                Some(step_back_to(last, weekday))
            }
            DateRule::WeekdayBefore {
                month,
                day,
                weekday,
            } => {
                let anchor = NaiveDate::from_ymd_opt(year, month, day)?.pred_opt()?;
                Some(step_back_to(anchor, weekday))
            }
            DateRule::Easter(offset) => Some(easter_sunday(year)? + Duration::days(offset)),
        }
    }
}

fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (y, m) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(y, m, 1)?.pred_opt()
}

/// Latest date on or before `date` that falls on `weekday`.
fn step_back_to(date: NaiveDate, weekday: Weekday) -> NaiveDate {
    let back = (7 + date.weekday().num_days_from_sunday() - weekday.num_days_from_sunday()) % 7;
    date - Duration::days(i64::from(back))
}

/// Gregorian Easter Sunday (anonymous computus).
pub fn easter_sunday(year: i32) -> Option<NaiveDate> {
    let a = year.rem_euclid(19);
    let b = year.div_euclid(100);
    let c = year.rem_euclid(100);
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15).rem_euclid(30);
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k).rem_euclid(7);
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;
    NaiveDate::from_ymd_opt(year, month as u32, day as u32)
}
