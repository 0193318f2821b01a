//! Implements InputPort. Inquire-based calendar wizard.
//!
//! Walks through title, span, location, holidays and custom events, persists the answers,
//! then renders the calendar.

use crate::adapters::pdf::{PdfRenderer, RecordingRenderer};
use crate::adapters::ui::palette::{HOLIDAY_RED, MARIGOLD, RULING_GREY};
use crate::adapters::ui::progress::ProgressObserver;
use crate::domain::entities::default_glyph;
use crate::domain::{
    CustomEvent, DomainError, GenerationRequest, HolidayRow, Location, LocationOption, MonthDay,
};
use crate::ports::InputPort;
use crate::usecases::{CalendarService, HolidayService, PreferencesService, WizardState};
use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use inquire::ui::{Color, RenderConfig, StyleSheet, Styled};
use inquire::{Confirm, CustomType, InquireError, MultiSelect, Select, Text};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// Prompt theme in the calendar palette, installed globally for inquire.
pub fn apply_theme() {
    let color = |(r, g, b): (u8, u8, u8)| Color::Rgb { r, g, b };
    let config = RenderConfig::default()
        .with_prompt_prefix(Styled::new("▦").with_fg(color(HOLIDAY_RED)))
        .with_highlighted_option_prefix(Styled::new("›").with_fg(color(MARIGOLD)))
        .with_selected_checkbox(Styled::new("[x]").with_fg(color(MARIGOLD)))
        .with_help_message(StyleSheet::new().with_fg(color(RULING_GREY)))
        .with_answer(StyleSheet::new().with_fg(color(MARIGOLD)));
    inquire::set_global_render_config(config);
}

fn prompt_err(e: InquireError) -> DomainError {
    match e {
        InquireError::OperationCanceled | InquireError::OperationInterrupted => {
            DomainError::Wizard("cancelled".into())
        }
        other => DomainError::Wizard(other.to_string()),
    }
}

/// Where the finished calendar goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Pdf,
    /// Record draw calls and report a summary; nothing is written.
    DryRun,
}

/// Select option wrapping a location code. "(none)" when `code` is None.
#[derive(Debug, Clone)]
struct LocationChoice {
    code: Option<String>,
    name: String,
}

impl fmt::Display for LocationChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.code {
            Some(code) => write!(f, "{} ({})", self.name, code),
            None => write!(f, "{}", self.name),
        }
    }
}

fn choices(options: Vec<LocationOption>, allow_none: bool) -> Vec<LocationChoice> {
    let none = allow_none.then(|| LocationChoice {
        code: None,
        name: "(none)".into(),
    });
    none.into_iter()
        .chain(options.into_iter().map(|o| LocationChoice {
            code: Some(o.code),
            name: o.name,
        }))
        .collect()
}

fn cursor_for(choices: &[LocationChoice], current: Option<&str>) -> usize {
    choices
        .iter()
        .position(|c| c.code.as_deref() == current)
        .unwrap_or(0)
}

/// Holiday names in row order without repeats.
fn holiday_names(rows: &[HolidayRow]) -> Vec<String> {
    let mut names: Vec<String> = Vec::with_capacity(rows.len());
    for row in rows {
        if !names.contains(&row.name) {
            names.push(row.name.clone());
        }
    }
    names
}

fn describe_event(e: &CustomEvent) -> String {
    match (e.recurring, e.year) {
        (true, _) => format!("{} {} ({}, yearly)", e.glyph, e.name, e.month_day),
        (false, Some(year)) => format!("{} {} ({}-{})", e.glyph, e.name, year, e.month_day),
        (false, None) => format!("{} {} ({})", e.glyph, e.name, e.month_day),
    }
}

/// TUI adapter. Inquire prompts.
pub struct TuiInputPort {
    calendar: Arc<CalendarService>,
    holidays: Arc<HolidayService>,
    preferences: Arc<PreferencesService>,
    imported_events: Vec<CustomEvent>,
    output: OutputMode,
    current_year: i32,
}

impl TuiInputPort {
    pub fn new(
        calendar: Arc<CalendarService>,
        holidays: Arc<HolidayService>,
        preferences: Arc<PreferencesService>,
        output: OutputMode,
        current_year: i32,
    ) -> Self {
        Self {
            calendar,
            holidays,
            preferences,
            imported_events: Vec::new(),
            output,
            current_year,
        }
    }

    /// Events merged into the saved list before prompting.
    pub fn with_imported_events(mut self, events: Vec<CustomEvent>) -> Self {
        self.imported_events = events;
        self
    }

    fn ask_span(&self, state: &mut WizardState) -> Result<(), DomainError> {
        let modes = vec!["Full year", "Custom date range"];
        let cursor = usize::from(state.use_custom_range);
        let mode = Select::new("Calendar span:", modes)
            .with_starting_cursor(cursor)
            .prompt()
            .map_err(prompt_err)?;
        state.use_custom_range = mode == "Custom date range";

        if !state.use_custom_range {
            state.year = CustomType::<i32>::new("Year:")
                .with_default(state.year)
                .with_error_message("Please type a year, e.g. 2026")
                .prompt()
                .map_err(prompt_err)?;
            return Ok(());
        }

        let start_default = state
            .start_date
            .or_else(|| NaiveDate::from_ymd_opt(state.year, 1, 1));
        let mut start_prompt = CustomType::<NaiveDate>::new("Start date (YYYY-MM-DD):")
            .with_error_message("Please type a date as YYYY-MM-DD");
        if let Some(d) = start_default {
            start_prompt = start_prompt.with_default(d);
        }
        let start = start_prompt.prompt().map_err(prompt_err)?;

        let end = loop {
            let mut end_prompt = CustomType::<NaiveDate>::new("End date (YYYY-MM-DD):")
                .with_error_message("Please type a date as YYYY-MM-DD");
            if let Some(d) = state.end_date.filter(|d| *d >= start) {
                end_prompt = end_prompt.with_default(d);
            }
            let end = end_prompt.prompt().map_err(prompt_err)?;
            if end >= start {
                break end;
            }
            println!("End date must not be before {}.", start);
        };

        state.start_date = Some(start);
        state.end_date = Some(end);
        Ok(())
    }

    async fn ask_location(&self, state: &mut WizardState) -> Result<(), DomainError> {
        let countries = match self.holidays.countries().await {
            Ok(list) if !list.is_empty() => list,
            Ok(_) => vec![LocationOption {
                code: state.location.country.clone(),
                name: state.location.country.clone(),
            }],
            Err(e) => {
                warn!(error = %e, "country list unavailable");
                vec![LocationOption {
                    code: state.location.country.clone(),
                    name: state.location.country.clone(),
                }]
            }
        };
        let options = choices(countries, false);
        let cursor = cursor_for(&options, Some(&state.location.country));
        let country = Select::new("Country:", options)
            .with_starting_cursor(cursor)
            .prompt()
            .map_err(prompt_err)?;
        let country_code = country.code.unwrap_or_default();
        let mut location = Location::country(country_code.clone());

        let states = self.holidays.states(&country_code).await.unwrap_or_else(|e| {
            warn!(error = %e, "state list unavailable");
            Vec::new()
        });
        if !states.is_empty() {
            let options = choices(states, true);
            let previous = (state.location.country == country_code)
                .then(|| state.location.state.as_deref())
                .flatten();
            let cursor = cursor_for(&options, previous);
            location.state = Select::new("State / province:", options)
                .with_starting_cursor(cursor)
                .prompt()
                .map_err(prompt_err)?
                .code;
        }

        if let Some(state_code) = location.state.clone() {
            let regions = self
                .holidays
                .regions(&country_code, &state_code)
                .await
                .unwrap_or_default();
            if !regions.is_empty() {
                let options = choices(regions, true);
                let cursor = cursor_for(&options, state.location.region.as_deref());
                location.region = Select::new("Region:", options)
                    .with_starting_cursor(cursor)
                    .prompt()
                    .map_err(prompt_err)?
                    .code;
            }
        }

        state.location = location;
        Ok(())
    }

    async fn ask_holidays(&self, state: &mut WizardState) -> Result<(), DomainError> {
        let year = match (state.use_custom_range, state.start_date) {
            (true, Some(start)) => start.year(),
            _ => state.year,
        };
        let rows = self
            .holidays
            .available(&state.location, year)
            .await
            .unwrap_or_else(|e| {
                warn!(error = %e, "holiday lookup failed, continuing without holidays");
                Vec::new()
            });
        let names = holiday_names(&rows);
        if names.is_empty() {
            println!("No holidays available for {}.", state.location.category_id());
            state.selected_holidays.clear();
            return Ok(());
        }

        let defaults: Vec<usize> = state
            .selected_holidays
            .iter()
            .filter_map(|s| names.iter().position(|n| n == s))
            .collect();
        let picked = MultiSelect::new("Holidays to print:", names)
            .with_default(&defaults)
            .prompt()
            .map_err(prompt_err)?;

        // Previously chosen names keep their position; new picks go after them.
        let mut ordered: Vec<String> = state
            .selected_holidays
            .iter()
            .filter(|s| picked.contains(s))
            .cloned()
            .collect();
        for name in picked {
            if !ordered.contains(&name) {
                ordered.push(name);
            }
        }
        state.selected_holidays = ordered;
        Ok(())
    }

    fn ask_custom_events(&self, state: &mut WizardState) -> Result<(), DomainError> {
        if !state.custom_events.is_empty() {
            let labels: Vec<String> = state.custom_events.iter().map(describe_event).collect();
            let all: Vec<usize> = (0..labels.len()).collect();
            let keep: Vec<usize> = MultiSelect::new("Custom events to keep:", labels)
                .with_default(&all)
                .raw_prompt()
                .map_err(prompt_err)?
                .into_iter()
                .map(|option| option.index)
                .collect();
            let events = std::mem::take(&mut state.custom_events);
            state.custom_events = keep_indices(events, &keep);
        }

        while Confirm::new("Add a custom event?")
            .with_default(false)
            .prompt()
            .map_err(prompt_err)?
        {
            let name = Text::new("Event name:").prompt().map_err(prompt_err)?;
            let name = name.trim().to_string();
            if name.is_empty() {
                println!("Event name cannot be empty.");
                continue;
            }
            let month_day = CustomType::<MonthDay>::new("Date (MM-DD):")
                .with_error_message("Please type a date as MM-DD")
                .prompt()
                .map_err(prompt_err)?;
            let recurring = Confirm::new("Repeat every year?")
                .with_default(true)
                .prompt()
                .map_err(prompt_err)?;
            let year = if recurring {
                None
            } else {
                Some(
                    CustomType::<i32>::new("Year:")
                        .with_default(state.year)
                        .prompt()
                        .map_err(prompt_err)?,
                )
            };
            let glyph = Text::new("Emoji:")
                .with_default(&default_glyph())
                .prompt()
                .map_err(prompt_err)?;
            let event = CustomEvent {
                name,
                month_day,
                recurring,
                year,
                glyph,
            };
            println!("Added {}", describe_event(&event));
            state.custom_events.push(event);
        }
        Ok(())
    }

    fn render(&self, request: &GenerationRequest) -> Result<PathBuf, DomainError> {
        let observer = ProgressObserver::new();
        match self.output {
            OutputMode::Pdf => {
                let mut renderer = PdfRenderer::new(&request.calendar_header);
                self.calendar
                    .generate(request, &mut renderer, Some(&observer))
            }
            OutputMode::DryRun => {
                let mut renderer = RecordingRenderer::new();
                let path = self
                    .calendar
                    .generate(request, &mut renderer, Some(&observer))?;
                info!(
                    pages = renderer.page_count(),
                    texts = renderer.texts().len(),
                    lines = renderer.line_count(),
                    path = %path.display(),
                    "dry run, nothing written"
                );
                Ok(path)
            }
        }
    }
}

#[async_trait]
impl InputPort for TuiInputPort {
    async fn run(&self) -> Result<Option<PathBuf>, DomainError> {
        let mut state = self
            .preferences
            .load(WizardState::defaults(self.current_year))
            .await?;
        let imported = state.merge_custom_events(self.imported_events.iter().cloned());
        if imported > 0 {
            info!(imported, "custom events merged from import");
        }

        state.header = Text::new("Calendar title:")
            .with_default(&state.header)
            .prompt()
            .map_err(prompt_err)?;
        self.ask_span(&mut state)?;
        self.ask_location(&mut state).await?;
        self.ask_holidays(&mut state).await?;
        self.ask_custom_events(&mut state)?;

        self.preferences.save(&state).await?;

        let go = Confirm::new("Generate the calendar now?")
            .with_default(true)
            .prompt()
            .map_err(prompt_err)?;
        if !go {
            info!("selections saved, generation skipped");
            return Ok(None);
        }

        let request = self.calendar.request_for(&state).await?;
        let path = self.render(&request)?;
        println!("Calendar saved to {}", path.display());
        Ok(Some(path))
    }
}

/// Keeps the events at `indices`, in their original order.
fn keep_indices<T>(items: Vec<T>, indices: &[usize]) -> Vec<T> {
    items
        .into_iter()
        .enumerate()
        .filter(|(i, _)| indices.contains(i))
        .map(|(_, item)| item)
        .collect()
}
