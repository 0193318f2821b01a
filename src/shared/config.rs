//! Application configuration. Output paths, font, holiday source.

use crate::domain::TailPolicy;
use serde::Deserialize;
use std::path::PathBuf;

/// Default location of the wizard's preference file.
pub const DEFAULT_PREFERENCES_PATH: &str = "./data/preferences.json";

/// Public holiday REST API used when `holiday_source = "nager"`.
pub const DEFAULT_HOLIDAY_API_URL: &str = "https://date.nager.at/api/v3";

/// Family name the display font is registered under.
pub const DEFAULT_DISPLAY_FONT_NAME: &str = "Chewy";

/// Which holiday collaborator to wire up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HolidaySource {
    /// Offline rule table.
    Builtin,
    /// HTTP lookup against the public holiday API.
    Nager,
}

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    /// Directory generated PDFs are written to. Read from WALLCAL_OUTPUT_DIR.
    #[serde(default)]
    pub output_dir: Option<String>,

    /// Wizard preference file. Read from WALLCAL_PREFERENCES_PATH.
    #[serde(default)]
    pub preferences_path: Option<String>,

    // ─────────────────────────────────────────────────────────────────────────
    // Rendering
    // ─────────────────────────────────────────────────────────────────────────
    /// TTF/OTF used for all page text. Unset means Helvetica. Read from WALLCAL_DISPLAY_FONT_PATH.
    #[serde(default)]
    pub display_font_path: Option<String>,

    /// Read from WALLCAL_DISPLAY_FONT_NAME.
    #[serde(default)]
    pub display_font_name: Option<String>,

    /// "full-week" (default) or "clip". Read from WALLCAL_TAIL_POLICY.
    #[serde(default)]
    pub tail_policy: Option<String>,

    /// Record draw calls instead of writing a PDF. Read from WALLCAL_DRY_RUN.
    #[serde(default)]
    pub dry_run: Option<bool>,

    // ─────────────────────────────────────────────────────────────────────────
    // Holidays and events
    // ─────────────────────────────────────────────────────────────────────────
    /// "builtin" (default) or "nager". Read from WALLCAL_HOLIDAY_SOURCE.
    #[serde(default)]
    pub holiday_source: Option<String>,

    /// Read from WALLCAL_HOLIDAY_API_URL.
    #[serde(default)]
    pub holiday_api_url: Option<String>,

    /// CSV of custom events merged into the wizard's list. Read from WALLCAL_EVENTS_CSV.
    #[serde(default)]
    pub events_csv: Option<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();
        let mut c = config::Config::builder();
        c = c.add_source(config::Environment::with_prefix("WALLCAL").try_parsing(true));
        if let Ok(path) = std::env::var("WALLCAL_CONFIG") {
            c = c.add_source(config::File::with_name(&path));
        }
        c.build()?.try_deserialize()
    }

    pub fn output_dir_or_default(&self) -> PathBuf {
        PathBuf::from(self.output_dir.as_deref().unwrap_or("."))
    }

    pub fn preferences_path_or_default(&self) -> PathBuf {
        PathBuf::from(
            self.preferences_path
                .as_deref()
                .unwrap_or(DEFAULT_PREFERENCES_PATH),
        )
    }

    pub fn display_font_path(&self) -> Option<PathBuf> {
        self.display_font_path
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
    }

    pub fn display_font_name_or_default(&self) -> String {
        self.display_font_name
            .clone()
            .unwrap_or_else(|| DEFAULT_DISPLAY_FONT_NAME.to_string())
    }

    /// Unknown values fall back to [`TailPolicy::FullWeek`].
    pub fn tail_policy_or_default(&self) -> TailPolicy {
        self.tail_policy
            .as_deref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run.unwrap_or(false)
    }

    /// Returns the configured holiday source. Anything but "nager" means builtin.
    pub fn holiday_source_or_default(&self) -> HolidaySource {
        match self
            .holiday_source
            .as_deref()
            .map(|s| s.trim().to_ascii_lowercase())
            .as_deref()
        {
            Some("nager") => HolidaySource::Nager,
            _ => HolidaySource::Builtin,
        }
    }

    pub fn holiday_api_url_or_default(&self) -> String {
        self.holiday_api_url
            .clone()
            .unwrap_or_else(|| DEFAULT_HOLIDAY_API_URL.to_string())
    }

    pub fn events_csv(&self) -> Option<PathBuf> {
        self.events_csv.as_deref().map(PathBuf::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.output_dir_or_default(), PathBuf::from("."));
        assert_eq!(
            cfg.preferences_path_or_default(),
            PathBuf::from(DEFAULT_PREFERENCES_PATH)
        );
        assert_eq!(cfg.display_font_name_or_default(), "Chewy");
        assert_eq!(cfg.tail_policy_or_default(), TailPolicy::FullWeek);
        assert_eq!(cfg.holiday_source_or_default(), HolidaySource::Builtin);
        assert!(!cfg.is_dry_run());
        assert!(cfg.display_font_path().is_none());
    }

    #[test]
    fn test_overrides() {
        let cfg = AppConfig {
            tail_policy: Some("clip".into()),
            holiday_source: Some(" Nager ".into()),
            display_font_path: Some("  ".into()),
            ..Default::default()
        };
        assert_eq!(cfg.tail_policy_or_default(), TailPolicy::ClipToRange);
        assert_eq!(cfg.holiday_source_or_default(), HolidaySource::Nager);
        assert!(cfg.display_font_path().is_none());
    }

    #[test]
    fn test_unknown_tail_policy_falls_back() {
        let cfg = AppConfig {
            tail_policy: Some("sideways".into()),
            ..Default::default()
        };
        assert_eq!(cfg.tail_policy_or_default(), TailPolicy::FullWeek);
    }
}
