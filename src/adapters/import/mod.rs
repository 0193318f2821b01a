//! Bulk import of user data.

pub mod csv_events;

pub use csv_events::import_custom_events;
