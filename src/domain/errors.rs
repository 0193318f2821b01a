//! Domain errors. Used by ports and use cases.
//!
//! Adapters map infrastructure errors into these.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Neither a year nor a full start/end pair was supplied, or start > end.
    #[error("Invalid date range: {0}")]
    InvalidRange(String),

    /// Custom display font could not be loaded. Non-fatal: the assembler falls back
    /// to the standard font and only logs this.
    #[error("Font unavailable: {0}")]
    FontUnavailable(String),

    /// The renderer rejected an operation. Generation aborts and nothing is saved.
    #[error("Render failure: {0}")]
    RenderFailure(String),

    #[error("Holiday lookup failed: {0}")]
    Holiday(String),

    #[error("Preference store error: {0}")]
    Preferences(String),

    #[error("Custom event import failed: {0}")]
    Import(String),

    #[error("Wizard aborted: {0}")]
    Wizard(String),
}
