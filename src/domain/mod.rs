//! Core domain layer. No external I/O dependencies.
//!
//! Entities, week arithmetic, event resolution and page layout live here.

pub mod calendar;
pub mod entities;
pub mod errors;
pub mod events;
pub mod layout;

pub use entities::{
    CustomEvent, DateRange, DayCell, GenerationRequest, HolidayEvent, HolidayRow, Location,
    LocationOption, MonthDay, TailPolicy, WeekPage,
};
pub use errors::DomainError;
