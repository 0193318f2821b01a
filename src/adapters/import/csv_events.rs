//! Custom-event import from CSV. Uses the `csv` crate.
//!
//! Columns: `name,date[,recurring][,glyph]`. `date` is `MM-DD` or `YYYY-MM-DD`; a full
//! date pins the event to that year. When `recurring` is blank it defaults to true for
//! `MM-DD` dates and false for full dates.

use crate::domain::entities::default_glyph;
use crate::domain::{CustomEvent, DomainError, MonthDay};
use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use tracing::info;

#[derive(Debug, Deserialize)]
struct EventRow {
    name: String,
    date: String,
    #[serde(default)]
    recurring: Option<String>,
    #[serde(default)]
    glyph: Option<String>,
}

/// Reads custom events from any CSV source. Row numbers in errors are 1-based data rows.
pub fn read_custom_events<R: Read>(reader: R) -> Result<Vec<CustomEvent>, DomainError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut events = Vec::new();
    for (index, record) in rdr.deserialize::<EventRow>().enumerate() {
        let row = record.map_err(|e| DomainError::Import(format!("row {}: {}", index + 1, e)))?;
        events.push(
            row_to_event(row).map_err(|e| DomainError::Import(format!("row {}: {}", index + 1, e)))?,
        );
    }
    Ok(events)
}

pub fn import_custom_events(path: &Path) -> Result<Vec<CustomEvent>, DomainError> {
    let file = std::fs::File::open(path)
        .map_err(|e| DomainError::Import(format!("open {}: {}", path.display(), e)))?;
    let events = read_custom_events(file)?;
    info!(path = %path.display(), count = events.len(), "custom events imported");
    Ok(events)
}

fn row_to_event(row: EventRow) -> Result<CustomEvent, String> {
    let name = row.name.trim().to_string();
    if name.is_empty() {
        return Err("empty event name".into());
    }

    let (month_day, year) = match NaiveDate::parse_from_str(&row.date, "%Y-%m-%d") {
        Ok(date) => (MonthDay::of(date), Some(date.year())),
        Err(_) => (
            row.date.parse::<MonthDay>().map_err(|e| e.to_string())?,
            None,
        ),
    };

    let recurring = match row.recurring.as_deref().map(str::trim) {
        None | Some("") => year.is_none(),
        Some(flag) => parse_flag(flag)?,
    };
    if !recurring && year.is_none() {
        return Err(format!("'{}' is not recurring but has no year", name));
    }

    let glyph = row
        .glyph
        .filter(|g| !g.trim().is_empty())
        .unwrap_or_else(default_glyph);

    Ok(CustomEvent {
        name,
        month_day,
        recurring,
        year,
        glyph,
    })
}

fn parse_flag(s: &str) -> Result<bool, String> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "1" => Ok(true),
        "false" | "no" | "n" | "0" => Ok(false),
        other => Err(format!("invalid recurring flag '{}'", other)),
    }
}
