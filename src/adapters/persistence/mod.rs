//! Filesystem persistence.

pub mod prefs_json;

pub use prefs_json::JsonPreferenceStore;
