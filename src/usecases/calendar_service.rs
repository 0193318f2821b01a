//! Top-level calendar generation: wizard state -> request -> rendered artifact.

use crate::domain::calendar::{RangeRequest, resolve_range};
use crate::domain::{DomainError, GenerationRequest};
use crate::ports::{FontSource, GenerationObserver, Renderer};
use crate::usecases::document_assembler::{AssemblerOptions, DocumentAssembler};
use crate::usecases::holiday_service::{HolidayService, select_by_names, years_displayed};
use crate::usecases::preferences::{DEFAULT_HEADER, WizardState};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

pub struct CalendarService {
    holidays: Arc<HolidayService>,
    fonts: Arc<dyn FontSource>,
    options: AssemblerOptions,
}

impl CalendarService {
    pub fn new(
        holidays: Arc<HolidayService>,
        fonts: Arc<dyn FontSource>,
        options: AssemblerOptions,
    ) -> Self {
        Self {
            holidays,
            fonts,
            options,
        }
    }

    pub fn options(&self) -> &AssemblerOptions {
        &self.options
    }

    /// Builds the generation request for `state`: resolves the span, loads holidays for
    /// every year shown on a page and keeps the selected ones in selection order.
    pub async fn request_for(&self, state: &WizardState) -> Result<GenerationRequest, DomainError> {
        // Exactly one form is sent: the date pair when complete, otherwise the year.
        let (year, start_date, end_date) =
            match (state.use_custom_range, state.start_date, state.end_date) {
                (true, Some(start), Some(end)) => (None, Some(start), Some(end)),
                _ => (Some(state.year), None, None),
            };
        let resolved = resolve_range(RangeRequest::from_parts(year, start_date, end_date)?)?;

        let available = self
            .holidays
            .holidays_for(&state.location, years_displayed(resolved))
            .await;
        let holidays = select_by_names(&state.selected_holidays, &available);

        Ok(GenerationRequest {
            calendar_header: header_or_default(&state.header),
            holidays,
            custom_events: state.custom_events.clone(),
            year,
            start_date,
            end_date,
        })
    }

    /// Renders `request` through `renderer` and returns the artifact path.
    pub fn generate<R: Renderer + ?Sized>(
        &self,
        request: &GenerationRequest,
        renderer: &mut R,
        observer: Option<&dyn GenerationObserver>,
    ) -> Result<PathBuf, DomainError> {
        let started = Instant::now();
        let mut assembler =
            DocumentAssembler::new(renderer, self.fonts.as_ref()).with_options(self.options.clone());
        if let Some(observer) = observer {
            assembler = assembler.with_observer(observer);
        }
        let path = assembler.assemble(request)?;
        info!(
            path = %path.display(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "calendar generated"
        );
        Ok(path)
    }
}

fn header_or_default(header: &str) -> String {
    match header.trim() {
        "" => DEFAULT_HEADER.to_string(),
        trimmed => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::holidays::BuiltinHolidays;
    use crate::adapters::pdf::{FsFontSource, PdfRenderer, RecordingRenderer};
    use crate::domain::{CustomEvent, TailPolicy};
    use chrono::NaiveDate;

    fn service(output_dir: PathBuf, tail_policy: TailPolicy) -> CalendarService {
        CalendarService::new(
            Arc::new(HolidayService::new(Arc::new(BuiltinHolidays::new()))),
            Arc::new(FsFontSource::new(None, "Chewy")),
            AssemblerOptions {
                tail_policy,
                output_dir,
                ..Default::default()
            },
        )
    }

    #[tokio::test]
    async fn test_request_for_year_selects_in_order() {
        let svc = service(PathBuf::from("."), TailPolicy::FullWeek);
        let mut state = WizardState::defaults(2025);
        state.selected_holidays = vec!["Independence Day".into(), "New Year's Day".into()];

        let req = svc.request_for(&state).await.unwrap();
        assert_eq!(req.year, Some(2025));
        assert_eq!(req.start_date, None);
        let got: Vec<_> = req
            .holidays
            .iter()
            .map(|h| (h.name.as_str(), h.year))
            .collect();
        assert_eq!(
            got,
            vec![
                ("Independence Day", 2024),
                ("Independence Day", 2025),
                ("Independence Day", 2026),
                ("New Year's Day", 2024),
                ("New Year's Day", 2025),
                ("New Year's Day", 2026),
            ]
        );
    }

    #[tokio::test]
    async fn test_year_calendar_shows_next_new_year_on_last_page() {
        let svc = service(PathBuf::from("."), TailPolicy::FullWeek);
        let mut state = WizardState::defaults(2025);
        state.custom_events = vec![CustomEvent {
            name: "Anniversary".into(),
            month_day: "09-20".parse().unwrap(),
            recurring: true,
            year: None,
            glyph: "💍".into(),
        }];
        let req = svc.request_for(&state).await.unwrap();

        let mut renderer = RecordingRenderer::new();
        let path = svc.generate(&req, &mut renderer, None).unwrap();
        assert_eq!(path, PathBuf::from("./Family-Calendar-2025.pdf"));
        assert_eq!(renderer.page_count(), 53);
        let new_years = renderer
            .texts()
            .iter()
            .filter(|t| **t == "New Year's Day!")
            .count();
        assert_eq!(new_years, 2);
        assert!(renderer.texts().contains(&"Thanksgiving!"));
        assert!(renderer.texts().contains(&"Anniversary"));
    }

    #[tokio::test]
    async fn test_custom_range_uses_dates() {
        let svc = service(PathBuf::from("out"), TailPolicy::ClipToRange);
        let mut state = WizardState::defaults(2025);
        state.use_custom_range = true;
        state.start_date = NaiveDate::from_ymd_opt(2025, 11, 20);
        state.end_date = NaiveDate::from_ymd_opt(2025, 11, 26);

        let req = svc.request_for(&state).await.unwrap();
        assert_eq!(req.year, None);
        assert_eq!(req.start_date, NaiveDate::from_ymd_opt(2025, 11, 20));
        let mut renderer = RecordingRenderer::new();
        let path = svc.generate(&req, &mut renderer, None).unwrap();
        assert_eq!(
            path,
            PathBuf::from("out/Family-Calendar-2025-11-20-to-2025-11-26.pdf")
        );
        // Nov 16 .. Nov 29; Thanksgiving (Nov 27) is past the end and clipped.
        assert_eq!(renderer.page_count(), 2);
        assert!(!renderer.texts().contains(&"Thanksgiving!"));
    }

    #[tokio::test]
    async fn test_incomplete_custom_range_falls_back_to_year() {
        let svc = service(PathBuf::from("."), TailPolicy::FullWeek);
        let mut state = WizardState::defaults(2026);
        state.use_custom_range = true;
        state.start_date = NaiveDate::from_ymd_opt(2026, 3, 1);

        let req = svc.request_for(&state).await.unwrap();
        assert_eq!((req.year, req.start_date, req.end_date), (Some(2026), None, None));
    }

    #[tokio::test]
    async fn test_blank_header_falls_back_to_default() {
        let svc = service(PathBuf::from("."), TailPolicy::FullWeek);
        let mut state = WizardState::defaults(2025);
        state.header = "   \t ".into();

        let req = svc.request_for(&state).await.unwrap();
        assert_eq!(req.calendar_header, "Family");
        let mut renderer = RecordingRenderer::new();
        let path = svc.generate(&req, &mut renderer, None).unwrap();
        assert_eq!(path, PathBuf::from("./Family-Calendar-2025.pdf"));
        assert!(renderer.texts().contains(&"Family"));
    }

    #[tokio::test]
    async fn test_inverted_range_is_rejected() {
        let svc = service(PathBuf::from("."), TailPolicy::FullWeek);
        let mut state = WizardState::defaults(2025);
        state.use_custom_range = true;
        state.start_date = NaiveDate::from_ymd_opt(2025, 5, 1);
        state.end_date = NaiveDate::from_ymd_opt(2025, 4, 1);
        assert!(matches!(
            svc.request_for(&state).await,
            Err(DomainError::InvalidRange(_))
        ));
    }

    #[tokio::test]
    async fn test_writes_real_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(dir.path().to_path_buf(), TailPolicy::FullWeek);
        let mut state = WizardState::defaults(2025);
        state.header = "Smith Family".into();
        state.use_custom_range = true;
        state.start_date = NaiveDate::from_ymd_opt(2025, 7, 1);
        state.end_date = NaiveDate::from_ymd_opt(2025, 7, 14);

        let req = svc.request_for(&state).await.unwrap();
        let mut renderer = PdfRenderer::new(&req.calendar_header);
        let path = svc.generate(&req, &mut renderer, None).unwrap();
        assert_eq!(
            path.file_name().unwrap(),
            "Smith-Family-Calendar-2025-07-01-to-2025-07-14.pdf"
        );
        assert!(std::fs::read(&path).unwrap().starts_with(b"%PDF"));
    }
}
