//! Wiring & DI. Entry point: bootstrap adapters, inject into services, run UI.
//! No business logic here; generation is delegated to CalendarService.

use chrono::Datelike;
use dotenv::dotenv;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use wallcal::adapters::holidays::{BuiltinHolidays, NagerHolidays};
use wallcal::adapters::import::import_custom_events;
use wallcal::adapters::pdf::FsFontSource;
use wallcal::adapters::persistence::JsonPreferenceStore;
use wallcal::adapters::ui::tui::{OutputMode, TuiInputPort};
use wallcal::ports::{FontSource, HolidayProvider, InputPort, PreferenceStore};
use wallcal::shared::config::{AppConfig, HolidaySource};
use wallcal::usecases::{AssemblerOptions, CalendarService, HolidayService, PreferencesService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let env_loaded = dotenv();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match &env_loaded {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(_) => info!(cwd = %cwd.display(), "no .env found (check CWD)"),
    }

    wallcal::adapters::ui::init_ui();

    let cfg = AppConfig::load().unwrap_or_else(|e| {
        warn!(error = %e, "config unreadable, using defaults");
        AppConfig::default()
    });
    let current_year = chrono::Local::now().year();

    let output_dir = cfg.output_dir_or_default();
    tokio::fs::create_dir_all(&output_dir)
        .await
        .map_err(|e| anyhow::anyhow!("create output dir {}: {}", output_dir.display(), e))?;
    info!(path = %output_dir.display(), "output directory");

    // --- Holiday source ---
    let provider: Arc<dyn HolidayProvider> = match cfg.holiday_source_or_default() {
        HolidaySource::Nager => {
            let url = cfg.holiday_api_url_or_default();
            info!(url = %url, "holidays from public holiday API");
            Arc::new(NagerHolidays::new(url, current_year))
        }
        HolidaySource::Builtin => {
            info!("holidays from built-in rule tables");
            Arc::new(BuiltinHolidays::new())
        }
    };
    let holiday_service = Arc::new(HolidayService::new(provider));

    // --- Preferences ---
    let prefs_path = cfg.preferences_path_or_default();
    info!(path = %prefs_path.display(), "preferences file");
    let store: Arc<dyn PreferenceStore> = Arc::new(JsonPreferenceStore::new(&prefs_path));
    let preferences = Arc::new(PreferencesService::new(store));

    // --- Rendering ---
    let fonts: Arc<dyn FontSource> = Arc::new(FsFontSource::new(
        cfg.display_font_path(),
        cfg.display_font_name_or_default(),
    ));
    let tail_policy = cfg.tail_policy_or_default();
    info!(?tail_policy, dry_run = cfg.is_dry_run(), "render settings");
    let calendar = Arc::new(CalendarService::new(
        Arc::clone(&holiday_service),
        fonts,
        AssemblerOptions {
            tail_policy,
            output_dir,
            ..Default::default()
        },
    ));

    // --- Custom events import (optional) ---
    let imported = match cfg.events_csv() {
        Some(path) => import_custom_events(&path).map_err(|e| anyhow::anyhow!("{}", e))?,
        None => Vec::new(),
    };

    let output = if cfg.is_dry_run() {
        OutputMode::DryRun
    } else {
        OutputMode::Pdf
    };
    let input_port: Arc<dyn InputPort> = Arc::new(
        TuiInputPort::new(calendar, holiday_service, preferences, output, current_year)
            .with_imported_events(imported),
    );

    // --- Run (wizard -> generate) ---
    match input_port
        .run()
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?
    {
        Some(path) => info!(path = %path.display(), "done"),
        None => info!("no calendar generated"),
    }

    Ok(())
}
