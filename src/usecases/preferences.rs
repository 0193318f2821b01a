//! Wizard selections and their persistence through the PreferenceStore port.
//!
//! Every field lives under its own key. Missing or unparseable values keep the default.

use crate::domain::{CustomEvent, DomainError, Location};
use crate::ports::PreferenceStore;
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{debug, warn};

pub const KEY_SELECTED_HOLIDAYS: &str = "weekly-calendar-selected-holidays";
pub const KEY_CUSTOM_EVENTS: &str = "weekly-calendar-custom-events";
pub const KEY_COUNTRY: &str = "weekly-calendar-selected-country";
pub const KEY_STATE: &str = "weekly-calendar-selected-state";
pub const KEY_REGION: &str = "weekly-calendar-selected-region";
pub const KEY_HEADER: &str = "weekly-calendar-header";
pub const KEY_YEAR: &str = "weekly-calendar-year";
pub const KEY_USE_CUSTOM_RANGE: &str = "weekly-calendar-use-custom-range";
pub const KEY_START_DATE: &str = "weekly-calendar-start-date";
pub const KEY_END_DATE: &str = "weekly-calendar-end-date";

pub const DEFAULT_HEADER: &str = "Family";
pub const DEFAULT_COUNTRY: &str = "US";

/// Holidays preselected on first run.
pub const DEFAULT_HOLIDAYS: &[&str] = &[
    "New Year's Day",
    "Valentine's Day",
    "Independence Day",
    "Halloween",
    "Thanksgiving",
    "Christmas Day",
];

/// Everything the wizard asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardState {
    pub header: String,
    pub year: i32,
    pub use_custom_range: bool,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub location: Location,
    /// Holiday names in the order they were picked.
    pub selected_holidays: Vec<String>,
    pub custom_events: Vec<CustomEvent>,
}

impl WizardState {
    /// First-run defaults. `year` is normally the current year.
    pub fn defaults(year: i32) -> Self {
        Self {
            header: DEFAULT_HEADER.to_string(),
            year,
            use_custom_range: false,
            start_date: None,
            end_date: None,
            location: Location::country(DEFAULT_COUNTRY),
            selected_holidays: DEFAULT_HOLIDAYS.iter().map(|s| s.to_string()).collect(),
            custom_events: Vec::new(),
        }
    }

    /// Appends events not already present (same name and month-day). Returns how many were added.
    pub fn merge_custom_events(&mut self, events: impl IntoIterator<Item = CustomEvent>) -> usize {
        let mut added = 0;
        for event in events {
            let exists = self
                .custom_events
                .iter()
                .any(|e| e.name == event.name && e.month_day == event.month_day);
            if !exists {
                self.custom_events.push(event);
                added += 1;
            }
        }
        added
    }
}

pub struct PreferencesService {
    store: Arc<dyn PreferenceStore>,
}

impl PreferencesService {
    pub fn new(store: Arc<dyn PreferenceStore>) -> Self {
        Self { store }
    }

    /// Overlays stored values on `defaults`.
    pub async fn load(&self, defaults: WizardState) -> Result<WizardState, DomainError> {
        let mut state = defaults;

        if let Some(header) = self.store.load(KEY_HEADER).await? {
            state.header = header;
        }
        if let Some(year) = self.parsed(KEY_YEAR, |s| s.parse::<i32>().ok()).await? {
            state.year = year;
        }
        if let Some(flag) = self.parsed(KEY_USE_CUSTOM_RANGE, |s| s.parse::<bool>().ok()).await? {
            state.use_custom_range = flag;
        }
        if let Some(date) = self.parsed(KEY_START_DATE, parse_date).await? {
            state.start_date = Some(date);
        }
        if let Some(date) = self.parsed(KEY_END_DATE, parse_date).await? {
            state.end_date = Some(date);
        }
        if let Some(country) = self.store.load(KEY_COUNTRY).await?.filter(|s| !s.is_empty()) {
            state.location.country = country;
        }
        if let Some(code) = self.store.load(KEY_STATE).await? {
            state.location.state = Some(code).filter(|s| !s.is_empty());
        }
        if let Some(code) = self.store.load(KEY_REGION).await? {
            state.location.region = Some(code).filter(|s| !s.is_empty());
        }
        if let Some(names) = self
            .parsed(KEY_SELECTED_HOLIDAYS, |s| serde_json::from_str::<Vec<String>>(s).ok())
            .await?
        {
            state.selected_holidays = names;
        }
        if let Some(events) = self
            .parsed(KEY_CUSTOM_EVENTS, |s| serde_json::from_str::<Vec<CustomEvent>>(s).ok())
            .await?
        {
            state.custom_events = events;
        }

        debug!(header = %state.header, year = state.year, "preferences loaded");
        Ok(state)
    }

    pub async fn save(&self, state: &WizardState) -> Result<(), DomainError> {
        let holidays = serde_json::to_string(&state.selected_holidays)
            .map_err(|e| DomainError::Preferences(e.to_string()))?;
        let events = serde_json::to_string(&state.custom_events)
            .map_err(|e| DomainError::Preferences(e.to_string()))?;
        let date = |d: Option<NaiveDate>| d.map(|d| d.to_string()).unwrap_or_default();

        let entries = [
            (KEY_HEADER, state.header.clone()),
            (KEY_YEAR, state.year.to_string()),
            (KEY_USE_CUSTOM_RANGE, state.use_custom_range.to_string()),
            (KEY_START_DATE, date(state.start_date)),
            (KEY_END_DATE, date(state.end_date)),
            (KEY_COUNTRY, state.location.country.clone()),
            (KEY_STATE, state.location.state.clone().unwrap_or_default()),
            (KEY_REGION, state.location.region.clone().unwrap_or_default()),
            (KEY_SELECTED_HOLIDAYS, holidays),
            (KEY_CUSTOM_EVENTS, events),
        ];
        for (key, value) in entries {
            self.store.save(key, &value).await?;
        }
        debug!("preferences saved");
        Ok(())
    }

    async fn parsed<T>(
        &self,
        key: &str,
        parse: impl Fn(&str) -> Option<T>,
    ) -> Result<Option<T>, DomainError> {
        let Some(raw) = self.store.load(key).await? else {
            return Ok(None);
        };
        if raw.is_empty() {
            return Ok(None);
        }
        let value = parse(&raw);
        if value.is_none() {
            warn!(key, value = %raw, "ignoring unreadable preference");
        }
        Ok(value)
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::persistence::prefs_json::JsonPreferenceStore;

    fn event(name: &str, md: &str) -> CustomEvent {
        CustomEvent {
            name: name.into(),
            month_day: md.parse().unwrap(),
            recurring: true,
            year: None,
            glyph: "🎂".into(),
        }
    }

    #[tokio::test]
    async fn test_empty_store_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let service = PreferencesService::new(Arc::new(JsonPreferenceStore::new(
            dir.path().join("prefs.json"),
        )));
        let state = service.load(WizardState::defaults(2025)).await.unwrap();
        assert_eq!(state, WizardState::defaults(2025));
        assert_eq!(state.header, "Family");
        assert_eq!(state.location.country, "US");
        assert_eq!(state.selected_holidays.len(), 6);
    }

    #[tokio::test]
    async fn test_round_trip_through_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        let mut state = WizardState::defaults(2025);
        state.header = "The Smiths".into();
        state.use_custom_range = true;
        state.start_date = NaiveDate::from_ymd_opt(2025, 6, 1);
        state.end_date = NaiveDate::from_ymd_opt(2025, 8, 31);
        state.location = Location {
            country: "CA".into(),
            state: Some("on".into()),
            region: None,
        };
        state.selected_holidays = vec!["Canada Day".into(), "Family Day".into()];
        state.custom_events = vec![event("Anniversary", "09-20")];

        PreferencesService::new(Arc::new(JsonPreferenceStore::new(&path)))
            .save(&state)
            .await
            .unwrap();
        let loaded = PreferencesService::new(Arc::new(JsonPreferenceStore::new(&path)))
            .load(WizardState::defaults(2030))
            .await
            .unwrap();
        assert_eq!(loaded, state);
    }

    #[tokio::test]
    async fn test_unreadable_values_keep_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(JsonPreferenceStore::new(dir.path().join("prefs.json")));
        store.save(KEY_YEAR, "next year").await.unwrap();
        store.save(KEY_SELECTED_HOLIDAYS, "[broken").await.unwrap();
        store.save(KEY_STATE, "").await.unwrap();

        let state = PreferencesService::new(store)
            .load(WizardState::defaults(2025))
            .await
            .unwrap();
        assert_eq!(state.year, 2025);
        assert_eq!(state.selected_holidays.len(), 6);
        assert_eq!(state.location.state, None);
    }

    #[test]
    fn test_merge_skips_duplicates() {
        let mut state = WizardState::defaults(2025);
        state.custom_events = vec![event("Anniversary", "09-20")];
        let added = state.merge_custom_events(vec![
            event("Anniversary", "09-20"),
            event("Anniversary", "10-01"),
            event("Game Night", "02-14"),
        ]);
        assert_eq!(added, 2);
        assert_eq!(state.custom_events.len(), 3);
    }
}
