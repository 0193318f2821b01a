//! Drives a [`Renderer`] through every week page of one calendar.
//!
//! - Resolves the range and pages it week by week
//! - Picks the display font once, falling back to Helvetica when it cannot be loaded
//! - Saves exactly one artifact after the last page; a failure before that saves nothing

use crate::domain::calendar::{RangeRequest, ResolvedRange, WeekPager, resolve_range};
use crate::domain::events::fill_week;
use crate::domain::layout::{DrawCommand, LayoutGeometry, PageLayout, PageLayoutBuilder};
use crate::domain::{DomainError, GenerationRequest, TailPolicy};
use crate::ports::{FontFace, FontSource, GenerationObserver, Orientation, PageSize, Renderer};
use crate::usecases::preferences::DEFAULT_HEADER;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Knobs for one assembly run.
#[derive(Debug, Clone)]
pub struct AssemblerOptions {
    pub tail_policy: TailPolicy,
    pub geometry: LayoutGeometry,
    /// Directory the artifact is saved into.
    pub output_dir: PathBuf,
}

impl Default for AssemblerOptions {
    fn default() -> Self {
        Self {
            tail_policy: TailPolicy::default(),
            geometry: LayoutGeometry::default(),
            output_dir: PathBuf::from("."),
        }
    }
}

/// One-shot document assembler. Borrows the renderer exclusively for the whole run.
pub struct DocumentAssembler<'a, R: Renderer + ?Sized> {
    renderer: &'a mut R,
    fonts: &'a dyn FontSource,
    observer: Option<&'a dyn GenerationObserver>,
    options: AssemblerOptions,
}

impl<'a, R: Renderer + ?Sized> DocumentAssembler<'a, R> {
    pub fn new(renderer: &'a mut R, fonts: &'a dyn FontSource) -> Self {
        Self {
            renderer,
            fonts,
            observer: None,
            options: AssemblerOptions::default(),
        }
    }

    pub fn with_options(mut self, options: AssemblerOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_observer(mut self, observer: &'a dyn GenerationObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Renders every page of `request` and saves the artifact. Returns its path.
    pub fn assemble(mut self, request: &GenerationRequest) -> Result<PathBuf, DomainError> {
        let range_request = RangeRequest::from_request(request)?;
        let resolved = resolve_range(range_request)?;
        let pager = WeekPager::new(resolved);
        let builder = PageLayoutBuilder::with_geometry(
            request.calendar_header.clone(),
            resolved.reference_year,
            self.options.geometry.clone(),
        );

        info!(
            start = %resolved.range.start,
            end = %resolved.range.end,
            reference_year = resolved.reference_year,
            weeks = pager.total_weeks(),
            holidays = request.holidays.len(),
            custom_events = request.custom_events.len(),
            "assembling calendar"
        );

        self.renderer
            .begin_document(PageSize::TABLOID, Orientation::Landscape)?;
        let face = self.select_title_font()?;

        if let Some(observer) = self.observer {
            observer.started(pager.total_weeks());
        }

        let mut pages = 0usize;
        for (index, skeleton) in pager.iter().enumerate() {
            if index > 0 {
                self.renderer.add_page()?;
            }
            let page = fill_week(
                skeleton,
                resolved.range.end,
                self.options.tail_policy,
                &request.holidays,
                &request.custom_events,
            );
            let layout = builder.build(&page);
            self.draw(&face, &layout)?;
            debug!(week = page.week_number, start = %page.week_start, "page drawn");
            if let Some(observer) = self.observer {
                observer.page_done(&page);
            }
            pages += 1;
        }

        let filename = artifact_name(&request.calendar_header, range_request, &resolved);
        let path = self.renderer.save(&self.options.output_dir.join(filename))?;
        info!(pages, path = %path.display(), "calendar saved");

        if let Some(observer) = self.observer {
            observer.finished(&path);
        }
        Ok(path)
    }

    /// Registers the custom display font if the source can provide it. Only
    /// `FontUnavailable` triggers the fallback; other renderer errors abort.
    fn select_title_font(&mut self) -> Result<FontFace, DomainError> {
        let loaded = self
            .fonts
            .display_font()
            .and_then(|font| self.renderer.register_font(&font).map(|_| font.name));
        match loaded {
            Ok(name) => {
                info!(font = %name, "using custom display font");
                Ok(FontFace::Custom(name))
            }
            Err(DomainError::FontUnavailable(reason)) => {
                warn!(reason = %reason, "display font unavailable, falling back to Helvetica");
                Ok(FontFace::Standard)
            }
            Err(e) => Err(e),
        }
    }

    fn draw(&mut self, face: &FontFace, layout: &PageLayout) -> Result<(), DomainError> {
        // Font state is re-selected on every page.
        let mut current_size: Option<f32> = None;
        for command in &layout.commands {
            match command {
                DrawCommand::Text {
                    text,
                    at,
                    size,
                    align,
                } => {
                    if current_size != Some(*size) {
                        self.renderer.set_font(face, *size)?;
                        current_size = Some(*size);
                    }
                    self.renderer.draw_text(text, at.x, at.y, *align)?;
                }
                DrawCommand::Line { from, to, stroke } => {
                    self.renderer.draw_line(*from, *to, *stroke)?;
                }
                DrawCommand::Circle {
                    center,
                    radius,
                    paint,
                } => {
                    self.renderer.draw_circle(*center, *radius, *paint)?;
                }
            }
        }
        Ok(())
    }
}

/// Deterministic file name: "<Title-With-Hyphens>-Calendar-<year>.pdf" or
/// "<Title-With-Hyphens>-Calendar-<start>-to-<end>.pdf" (requested dates, ISO format).
pub fn artifact_name(header: &str, request: RangeRequest, resolved: &ResolvedRange) -> String {
    let stem = file_stem(header);
    match request {
        RangeRequest::Year(year) => format!("{}-Calendar-{}.pdf", stem, year),
        RangeRequest::Explicit { .. } => format!(
            "{}-Calendar-{}-to-{}.pdf",
            stem,
            resolved.range.requested_start.format("%Y-%m-%d"),
            resolved.range.end.format("%Y-%m-%d")
        ),
    }
}

/// File-name stem for a title: runs of whitespace, path separators and control
/// characters become a single '-', and leading dots or hyphens are dropped so the
/// name stays one plain component inside the output directory.
fn file_stem(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    let mut in_gap = false;
    for c in title.chars() {
        if c.is_whitespace() || c.is_control() || c == '/' || c == '\\' {
            if !in_gap {
                out.push('-');
            }
            in_gap = true;
        } else {
            out.push(c);
            in_gap = false;
        }
    }
    let stem = out.trim_start_matches(['.', '-']);
    if stem.is_empty() {
        DEFAULT_HEADER.to_string()
    } else {
        stem.to_string()
    }
}

/// Convenience wrapper for callers that only need the file name of a request.
pub fn artifact_name_for(request: &GenerationRequest) -> Result<String, DomainError> {
    let range_request = RangeRequest::from_request(request)?;
    let resolved = resolve_range(range_request)?;
    Ok(artifact_name(&request.calendar_header, range_request, &resolved))
}

/// Path an artifact would be written to.
pub fn artifact_path(output_dir: &Path, request: &GenerationRequest) -> Result<PathBuf, DomainError> {
    Ok(output_dir.join(artifact_name_for(request)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::pdf::recording::{RecordingRenderer, RenderCall};
    use crate::domain::{CustomEvent, HolidayEvent, WeekPage};
    use crate::ports::FontData;
    use chrono::NaiveDate;
    use std::sync::Mutex;

    struct NoFont;

    impl FontSource for NoFont {
        fn display_font(&self) -> Result<FontData, DomainError> {
            Err(DomainError::FontUnavailable("not bundled".into()))
        }
    }

    struct FakeFont;

    impl FontSource for FakeFont {
        fn display_font(&self) -> Result<FontData, DomainError> {
            Ok(FontData {
                name: "Chewy".into(),
                bytes: vec![0, 1, 0, 0],
            })
        }
    }

    #[derive(Default)]
    struct CountingObserver {
        pages: Mutex<Vec<i64>>,
        finished: Mutex<Option<PathBuf>>,
    }

    impl GenerationObserver for CountingObserver {
        fn started(&self, _total_pages: usize) {}

        fn page_done(&self, page: &WeekPage) {
            self.pages.lock().unwrap().push(page.week_number);
        }

        fn finished(&self, artifact: &Path) {
            *self.finished.lock().unwrap() = Some(artifact.to_path_buf());
        }
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn year_request(year: i32) -> GenerationRequest {
        GenerationRequest {
            calendar_header: "Smith Family".into(),
            holidays: vec![HolidayEvent {
                name: "Independence Day".into(),
                month_day: "07-04".parse().unwrap(),
                year: 2025,
                category: "US".into(),
            }],
            custom_events: vec![CustomEvent {
                name: "Anniversary".into(),
                month_day: "09-20".parse().unwrap(),
                recurring: true,
                year: None,
                glyph: "💍".into(),
            }],
            year: Some(year),
            ..Default::default()
        }
    }

    #[test]
    fn test_year_2025_renders_53_pages_and_saves_once() {
        let mut renderer = RecordingRenderer::new();
        let path = DocumentAssembler::new(&mut renderer, &NoFont)
            .assemble(&year_request(2025))
            .unwrap();

        assert_eq!(path, PathBuf::from("./Smith-Family-Calendar-2025.pdf"));
        assert_eq!(renderer.page_count(), 53);
        let add_pages = renderer
            .calls()
            .iter()
            .filter(|c| matches!(c, RenderCall::AddPage))
            .count();
        assert_eq!(add_pages, 52);
        let saves = renderer
            .calls()
            .iter()
            .filter(|c| matches!(c, RenderCall::Save(_)))
            .count();
        assert_eq!(saves, 1);
        assert!(matches!(renderer.calls().last(), Some(RenderCall::Save(_))));
    }

    #[test]
    fn test_labels_reach_the_renderer() {
        let mut renderer = RecordingRenderer::new();
        DocumentAssembler::new(&mut renderer, &NoFont)
            .assemble(&year_request(2025))
            .unwrap();
        let texts = renderer.texts();
        assert!(texts.contains(&"Independence Day!"));
        assert!(texts.contains(&"Anniversary"));
        assert!(texts.contains(&"2025 - Week 1 (Dec. 29 - Jan. 4)"));
    }

    #[test]
    fn test_font_fallback_when_source_fails() {
        let mut renderer = RecordingRenderer::new();
        DocumentAssembler::new(&mut renderer, &NoFont)
            .assemble(&year_request(2025))
            .unwrap();
        let faces: Vec<_> = renderer
            .calls()
            .iter()
            .filter_map(|c| match c {
                RenderCall::SetFont(face, _) => Some(face.clone()),
                _ => None,
            })
            .collect();
        assert!(!faces.is_empty());
        assert!(faces.iter().all(|f| *f == FontFace::Standard));
    }

    #[test]
    fn test_font_fallback_when_renderer_rejects_font() {
        let mut renderer = RecordingRenderer::new().rejecting_fonts();
        let result = DocumentAssembler::new(&mut renderer, &FakeFont).assemble(&year_request(2025));
        assert!(result.is_ok());
        assert!(
            renderer
                .calls()
                .iter()
                .all(|c| !matches!(c, RenderCall::SetFont(FontFace::Custom(_), _)))
        );
    }

    #[test]
    fn test_custom_font_used_when_available() {
        let mut renderer = RecordingRenderer::new();
        DocumentAssembler::new(&mut renderer, &FakeFont)
            .assemble(&year_request(2025))
            .unwrap();
        assert!(renderer.calls().iter().any(|c| matches!(
            c,
            RenderCall::SetFont(FontFace::Custom(name), _) if name == "Chewy"
        )));
    }

    #[test]
    fn test_render_failure_aborts_without_save() {
        let mut renderer = RecordingRenderer::new().failing_on_text("Anniversary");
        let err = DocumentAssembler::new(&mut renderer, &NoFont)
            .assemble(&year_request(2025))
            .unwrap_err();
        assert!(matches!(err, DomainError::RenderFailure(_)));
        assert!(
            renderer
                .calls()
                .iter()
                .all(|c| !matches!(c, RenderCall::Save(_)))
        );
    }

    #[test]
    fn test_invalid_request_touches_nothing() {
        let mut renderer = RecordingRenderer::new();
        let req = GenerationRequest {
            calendar_header: "X".into(),
            ..Default::default()
        };
        let err = DocumentAssembler::new(&mut renderer, &NoFont)
            .assemble(&req)
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidRange(_)));
        assert!(renderer.calls().is_empty());
    }

    #[test]
    fn test_explicit_range_name_and_partial_tail_week() {
        let req = GenerationRequest {
            calendar_header: "Our  Summer\tPlans".into(),
            start_date: Some(d(2025, 6, 4)),
            end_date: Some(d(2025, 7, 9)),
            ..Default::default()
        };
        let options = AssemblerOptions {
            output_dir: PathBuf::from("out"),
            ..Default::default()
        };
        let mut renderer = RecordingRenderer::new();
        let observer = CountingObserver::default();
        let path = DocumentAssembler::new(&mut renderer, &NoFont)
            .with_options(options)
            .with_observer(&observer)
            .assemble(&req)
            .unwrap();

        assert_eq!(
            path,
            PathBuf::from("out/Our-Summer-Plans-Calendar-2025-06-04-to-2025-07-09.pdf")
        );
        // Jun 1 .. Jul 12: six weeks, the last one extends past the end date.
        assert_eq!(renderer.page_count(), 6);
        assert!(renderer.texts().contains(&"Saturday - Jul 12"));
        assert_eq!(observer.pages.lock().unwrap().len(), 6);
        assert_eq!(*observer.finished.lock().unwrap(), Some(path));
    }

    #[test]
    fn test_generation_is_idempotent() {
        let mut first = RecordingRenderer::new();
        let mut second = RecordingRenderer::new();
        DocumentAssembler::new(&mut first, &NoFont)
            .assemble(&year_request(2025))
            .unwrap();
        DocumentAssembler::new(&mut second, &NoFont)
            .assemble(&year_request(2025))
            .unwrap();
        assert_eq!(first.calls(), second.calls());
    }

    #[test]
    fn test_file_stem_hyphenates_whitespace_runs() {
        assert_eq!(file_stem("Smith Family"), "Smith-Family");
        assert_eq!(file_stem(" a \t b "), "a-b-");
        assert_eq!(file_stem("Solo"), "Solo");
    }

    #[test]
    fn test_artifact_path_for_year() {
        let req = year_request(2026);
        assert_eq!(
            artifact_path(Path::new("/tmp/cal"), &req).unwrap(),
            PathBuf::from("/tmp/cal/Smith-Family-Calendar-2026.pdf")
        );
    }

    #[test]
    fn test_titles_with_separators_stay_inside_output_dir() {
        for (title, expected) in [
            ("Q1/Q2 Plans", "Q1-Q2-Plans-Calendar-2025.pdf"),
            ("../x", "x-Calendar-2025.pdf"),
            ("../../etc/x", "etc-x-Calendar-2025.pdf"),
            ("C:\\Users\\me", "C:-Users-me-Calendar-2025.pdf"),
            ("..", "Family-Calendar-2025.pdf"),
        ] {
            let mut req = year_request(2025);
            req.calendar_header = title.into();
            let path = artifact_path(Path::new("out"), &req).unwrap();
            assert_eq!(path.parent(), Some(Path::new("out")), "title {:?}", title);
            assert_eq!(path.file_name().unwrap(), expected);
        }
    }
}
