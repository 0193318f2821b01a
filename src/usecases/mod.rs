//! Application use cases. Orchestrate domain logic via ports.

pub mod calendar_service;
pub mod document_assembler;
pub mod holiday_service;
pub mod preferences;

pub use calendar_service::CalendarService;
pub use document_assembler::{AssemblerOptions, DocumentAssembler};
pub use holiday_service::HolidayService;
pub use preferences::{PreferencesService, WizardState};
