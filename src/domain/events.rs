//! Per-day label resolution: holidays (year-pinned) then custom events (recurring or dated).

use crate::domain::{CustomEvent, DayCell, HolidayEvent, MonthDay, TailPolicy, WeekPage};
use chrono::{Datelike, Duration, NaiveDate};

/// Suffix appended to every holiday label.
const HOLIDAY_EMPHASIS: &str = "!";

/// Returns the labels for `date`: matching holidays (with "!") first, then matching custom
/// events. Both groups keep their incoming order. Never fails; no match is an empty list.
pub fn resolve_day(
    date: NaiveDate,
    holidays: &[HolidayEvent],
    custom_events: &[CustomEvent],
) -> Vec<String> {
    let key = MonthDay::of(date);
    let year = date.year();

    let holiday_labels = holidays
        .iter()
        .filter(|h| h.month_day == key && h.year == year)
        .map(|h| format!("{}{}", h.name, HOLIDAY_EMPHASIS));

    let custom_labels = custom_events
        .iter()
        .filter(|e| custom_event_matches(e, key, year))
        .map(|e| e.name.clone());

    holiday_labels.chain(custom_labels).collect()
}

fn custom_event_matches(event: &CustomEvent, key: MonthDay, year: i32) -> bool {
    event.month_day == key && (event.recurring || event.year == Some(year))
}

/// Fills a pager skeleton with its seven day cells.
///
/// Days after `range_end` are still present (the page always shows the full week); under
/// [`TailPolicy::ClipToRange`] they are marked out of range and get no labels.
pub fn fill_week(
    mut page: WeekPage,
    range_end: NaiveDate,
    policy: TailPolicy,
    holidays: &[HolidayEvent],
    custom_events: &[CustomEvent],
) -> WeekPage {
    page.days = (0..7)
        .map(|offset| {
            let date = page.week_start + Duration::days(offset);
            let in_range = date <= range_end || policy == TailPolicy::FullWeek;
            let labels = if in_range {
                resolve_day(date, holidays, custom_events)
            } else {
                Vec::new()
            };
            DayCell {
                date,
                labels,
                in_range,
            }
        })
        .collect();
    page
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn holiday(name: &str, md: &str, year: i32) -> HolidayEvent {
        HolidayEvent {
            name: name.into(),
            month_day: md.parse().unwrap(),
            year,
            category: "US".into(),
        }
    }

    fn custom(name: &str, md: &str, recurring: bool, year: Option<i32>) -> CustomEvent {
        CustomEvent {
            name: name.into(),
            month_day: md.parse().unwrap(),
            recurring,
            year,
            glyph: "🎂".into(),
        }
    }

    #[test]
    fn test_holiday_gets_emphasis() {
        let holidays = vec![holiday("Independence Day", "07-04", 2025)];
        let customs = vec![custom("Anniversary", "09-20", true, None)];
        assert_eq!(
            resolve_day(d(2025, 7, 4), &holidays, &customs),
            vec!["Independence Day!".to_string()]
        );
    }

    #[test]
    fn test_recurring_ignores_year() {
        let holidays = vec![holiday("Independence Day", "07-04", 2025)];
        let customs = vec![custom("Anniversary", "09-20", true, None)];
        assert_eq!(
            resolve_day(d(2030, 9, 20), &holidays, &customs),
            vec!["Anniversary".to_string()]
        );
    }

    #[test]
    fn test_dated_event_needs_same_year() {
        let customs = vec![custom("Trip", "03-14", false, Some(2024))];
        assert!(resolve_day(d(2025, 3, 14), &[], &customs).is_empty());
        assert_eq!(resolve_day(d(2024, 3, 14), &[], &customs), vec!["Trip"]);
    }

    #[test]
    fn test_dated_event_without_year_never_matches() {
        let customs = vec![custom("Orphan", "03-14", false, None)];
        assert!(resolve_day(d(2025, 3, 14), &[], &customs).is_empty());
    }

    #[test]
    fn test_holiday_is_year_pinned() {
        let holidays = vec![holiday("Christmas Day", "12-25", 2025)];
        assert!(resolve_day(d(2026, 12, 25), &holidays, &[]).is_empty());
    }

    #[test]
    fn test_order_holidays_first_then_selection_order_no_dedup() {
        let holidays = vec![
            holiday("Zeta Fest", "05-05", 2025),
            holiday("Alpha Day", "05-05", 2025),
        ];
        let customs = vec![
            custom("Zeta Fest", "05-05", true, None),
            custom("Bday", "05-05", false, Some(2025)),
        ];
        assert_eq!(
            resolve_day(d(2025, 5, 5), &holidays, &customs),
            vec!["Zeta Fest!", "Alpha Day!", "Zeta Fest", "Bday"]
        );
    }

    #[test]
    fn test_fill_week_full_week_policy_resolves_tail() {
        let customs = vec![custom("Party", "07-12", true, None)];
        let page = WeekPage {
            week_start: d(2025, 7, 6),
            week_end: d(2025, 7, 12),
            week_number: 28,
            days: Vec::new(),
        };
        let filled = fill_week(page, d(2025, 7, 9), TailPolicy::FullWeek, &[], &customs);
        assert_eq!(filled.days.len(), 7);
        assert!(filled.days.iter().all(|c| c.in_range));
        assert_eq!(filled.days[6].labels, vec!["Party"]);
    }

    #[test]
    fn test_fill_week_clip_policy_blanks_tail() {
        let customs = vec![custom("Party", "07-12", true, None)];
        let page = WeekPage {
            week_start: d(2025, 7, 6),
            week_end: d(2025, 7, 12),
            week_number: 28,
            days: Vec::new(),
        };
        let filled = fill_week(page, d(2025, 7, 9), TailPolicy::ClipToRange, &[], &customs);
        assert!(filled.days[3].in_range);
        assert!(!filled.days[4].in_range);
        assert!(filled.days[6].labels.is_empty());
    }
}
