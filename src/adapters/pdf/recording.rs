//! Renderer that records every call instead of drawing. Used for dry runs and tests.

use crate::domain::DomainError;
use crate::domain::layout::{CirclePaint, Point, Stroke, TextAlign};
use crate::ports::{FontData, FontFace, Orientation, PageSize, Renderer};
use std::path::{Path, PathBuf};

/// One recorded renderer call.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCall {
    BeginDocument(PageSize, Orientation),
    RegisterFont(String),
    AddPage,
    SetFont(FontFace, f32),
    Text {
        text: String,
        x: f32,
        y: f32,
        align: TextAlign,
    },
    Line {
        from: Point,
        to: Point,
        stroke: Stroke,
    },
    Circle {
        center: Point,
        radius: f32,
        paint: CirclePaint,
    },
    Save(PathBuf),
}

#[derive(Debug, Default)]
pub struct RecordingRenderer {
    calls: Vec<RenderCall>,
    started: bool,
    reject_fonts: bool,
    fail_on_text: Option<String>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `register_font` fails with `FontUnavailable`.
    pub fn rejecting_fonts(mut self) -> Self {
        self.reject_fonts = true;
        self
    }

    /// `draw_text` fails with `RenderFailure` for text containing `needle`.
    pub fn failing_on_text(mut self, needle: impl Into<String>) -> Self {
        self.fail_on_text = Some(needle.into());
        self
    }

    pub fn calls(&self) -> &[RenderCall] {
        &self.calls
    }

    /// Pages in the recorded document (0 before `begin_document`).
    pub fn page_count(&self) -> usize {
        if !matches!(self.calls.first(), Some(RenderCall::BeginDocument(..))) {
            return 0;
        }
        1 + self
            .calls
            .iter()
            .filter(|c| matches!(c, RenderCall::AddPage))
            .count()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                RenderCall::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn line_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, RenderCall::Line { .. }))
            .count()
    }

    fn record(&mut self, call: RenderCall) -> Result<(), DomainError> {
        if !self.started {
            return Err(DomainError::RenderFailure("document not started".into()));
        }
        self.calls.push(call);
        Ok(())
    }
}

impl Renderer for RecordingRenderer {
    fn begin_document(
        &mut self,
        size: PageSize,
        orientation: Orientation,
    ) -> Result<(), DomainError> {
        self.calls.clear();
        self.started = true;
        self.calls
            .push(RenderCall::BeginDocument(size, orientation));
        Ok(())
    }

    fn register_font(&mut self, font: &FontData) -> Result<(), DomainError> {
        if self.reject_fonts {
            return Err(DomainError::FontUnavailable(format!(
                "font '{}' rejected",
                font.name
            )));
        }
        self.record(RenderCall::RegisterFont(font.name.clone()))
    }

    fn add_page(&mut self) -> Result<(), DomainError> {
        self.record(RenderCall::AddPage)
    }

    fn set_font(&mut self, face: &FontFace, size: f32) -> Result<(), DomainError> {
        self.record(RenderCall::SetFont(face.clone(), size))
    }

    fn draw_text(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
        align: TextAlign,
    ) -> Result<(), DomainError> {
        if self
            .fail_on_text
            .as_deref()
            .is_some_and(|needle| text.contains(needle))
        {
            return Err(DomainError::RenderFailure(format!(
                "refused to draw '{}'",
                text
            )));
        }
        self.record(RenderCall::Text {
            text: text.to_string(),
            x,
            y,
            align,
        })
    }

    fn draw_line(&mut self, from: Point, to: Point, stroke: Stroke) -> Result<(), DomainError> {
        self.record(RenderCall::Line { from, to, stroke })
    }

    fn draw_circle(
        &mut self,
        center: Point,
        radius: f32,
        paint: CirclePaint,
    ) -> Result<(), DomainError> {
        self.record(RenderCall::Circle {
            center,
            radius,
            paint,
        })
    }

    /// Records the path without touching the filesystem.
    fn save(&mut self, filename: &Path) -> Result<PathBuf, DomainError> {
        self.record(RenderCall::Save(filename.to_path_buf()))?;
        self.started = false;
        Ok(filename.to_path_buf())
    }
}
