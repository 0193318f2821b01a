//! Infrastructure adapters. Implement outbound ports.
//!
//! PDF output, holiday sources, filesystem, terminal UI. Map errors to DomainError.

pub mod holidays;
pub mod import;
pub mod pdf;
pub mod persistence;
pub mod ui;
