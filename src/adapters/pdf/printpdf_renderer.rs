//! Implements Renderer with printpdf.
//!
//! Ops are buffered per page and flushed into the document on `add_page`/`save`.
//! Coordinates arrive in inches from the top-left and are flipped to PDF points here.

use super::metrics::{shaped_width_in, text_width_in};
use crate::domain::DomainError;
use crate::domain::layout::{CirclePaint, Point, Rgb, Stroke, TextAlign};
use crate::ports::{FontData, FontFace, Orientation, PageSize, Renderer};
use printpdf::font::{BuiltinFont, ParsedFont};
use printpdf::graphics::{
    LinePoint, PaintMode, Point as PdfPoint, Polygon, PolygonRing, WindingOrder,
};
use printpdf::matrix::TextMatrix;
use printpdf::ops::Op;
use printpdf::text::TextItem;
use printpdf::{FontId, Mm, PdfDocument, PdfPage, PdfSaveOptions, Pt};
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

const PT_PER_INCH: f32 = 72.0;
const MM_PER_INCH: f32 = 25.4;
/// Segments used to approximate a circle.
const CIRCLE_SEGMENTS: usize = 32;

/// An embedded font and the bytes it was parsed from, kept for measuring.
#[derive(Debug, Clone)]
struct RegisteredFont {
    id: FontId,
    bytes: Arc<Vec<u8>>,
}

/// Font resolved for the current text run.
#[derive(Debug, Clone)]
enum ActiveFont {
    External(RegisteredFont),
    Builtin(BuiltinFont),
}

impl ActiveFont {
    /// Width of `text` in inches at `size` in this font.
    fn text_width_in(&self, text: &str, size: f32) -> f32 {
        match self {
            ActiveFont::External(font) => rustybuzz::Face::from_slice(&font.bytes, 0)
                .map(|face| shaped_width_in(&face, text, size))
                .unwrap_or_else(|| text_width_in(text, size)),
            ActiveFont::Builtin(_) => text_width_in(text, size),
        }
    }
}

/// printpdf-backed renderer. One instance per document.
pub struct PdfRenderer {
    title: String,
    document: Option<PdfDocument>,
    width_in: f32,
    height_in: f32,
    ops: Vec<Op>,
    fonts: HashMap<String, RegisteredFont>,
    font: Option<(ActiveFont, f32)>,
}

impl PdfRenderer {
    /// `title` becomes the PDF document title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            document: None,
            width_in: 0.0,
            height_in: 0.0,
            ops: Vec::new(),
            fonts: HashMap::new(),
            font: None,
        }
    }

    fn document_mut(&mut self) -> Result<&mut PdfDocument, DomainError> {
        self.document
            .as_mut()
            .ok_or_else(|| DomainError::RenderFailure("document not started".into()))
    }

    fn ensure_started(&self) -> Result<(), DomainError> {
        if self.document.is_none() {
            return Err(DomainError::RenderFailure("document not started".into()));
        }
        Ok(())
    }

    fn pt(&self, p: Point) -> PdfPoint {
        PdfPoint {
            x: Pt(p.x * PT_PER_INCH),
            y: Pt((self.height_in - p.y) * PT_PER_INCH),
        }
    }

    /// Moves the buffered ops into a finished page.
    fn flush_page(&mut self) -> Result<(), DomainError> {
        let ops = std::mem::take(&mut self.ops);
        let (w, h) = (self.width_in, self.height_in);
        let doc = self.document_mut()?;
        doc.pages
            .push(PdfPage::new(Mm(w * MM_PER_INCH), Mm(h * MM_PER_INCH), ops));
        Ok(())
    }

    fn push_polygon(&mut self, points: Vec<PdfPoint>, mode: PaintMode) {
        let polygon = Polygon {
            rings: vec![PolygonRing {
                points: points
                    .into_iter()
                    .map(|p| LinePoint { p, bezier: false })
                    .collect(),
            }],
            mode,
            winding_order: WindingOrder::NonZero,
        };
        self.ops.push(Op::DrawPolygon { polygon });
    }
}

fn to_pdf_color(c: Rgb) -> printpdf::color::Color {
    printpdf::color::Color::Rgb(printpdf::Rgb::new(
        c.0 as f32 / 255.0,
        c.1 as f32 / 255.0,
        c.2 as f32 / 255.0,
        None,
    ))
}

impl Renderer for PdfRenderer {
    fn begin_document(
        &mut self,
        size: PageSize,
        orientation: Orientation,
    ) -> Result<(), DomainError> {
        let (short, long) = if size.width_in <= size.height_in {
            (size.width_in, size.height_in)
        } else {
            (size.height_in, size.width_in)
        };
        (self.width_in, self.height_in) = match orientation {
            Orientation::Portrait => (short, long),
            Orientation::Landscape => (long, short),
        };
        self.document = Some(PdfDocument::new(&self.title));
        self.ops.clear();
        self.fonts.clear();
        self.font = None;
        debug!(width_in = self.width_in, height_in = self.height_in, "pdf document started");
        Ok(())
    }

    fn register_font(&mut self, font: &FontData) -> Result<(), DomainError> {
        if rustybuzz::Face::from_slice(&font.bytes, 0).is_none() {
            return Err(DomainError::FontUnavailable(format!(
                "could not read glyph metrics of font '{}'",
                font.name
            )));
        }
        let mut warnings = Vec::new();
        let parsed = ParsedFont::from_bytes(&font.bytes, 0, &mut warnings).ok_or_else(|| {
            DomainError::FontUnavailable(format!("could not parse font '{}'", font.name))
        })?;
        if !warnings.is_empty() {
            warn!(font = %font.name, count = warnings.len(), "font parsed with warnings");
        }
        let id = self.document_mut()?.add_font(&parsed);
        self.fonts.insert(
            font.name.clone(),
            RegisteredFont {
                id,
                bytes: Arc::new(font.bytes.clone()),
            },
        );
        Ok(())
    }

    fn add_page(&mut self) -> Result<(), DomainError> {
        self.flush_page()?;
        self.font = None;
        Ok(())
    }

    fn set_font(&mut self, face: &FontFace, size: f32) -> Result<(), DomainError> {
        self.ensure_started()?;
        let active = match face {
            FontFace::Custom(name) => ActiveFont::External(
                self.fonts
                    .get(name)
                    .cloned()
                    .ok_or_else(|| DomainError::RenderFailure(format!("font '{}' not registered", name)))?,
            ),
            FontFace::Standard => ActiveFont::Builtin(BuiltinFont::Helvetica),
        };
        self.font = Some((active, size));
        Ok(())
    }

    fn draw_text(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
        align: TextAlign,
    ) -> Result<(), DomainError> {
        self.ensure_started()?;
        let (font, size) = self
            .font
            .clone()
            .ok_or_else(|| DomainError::RenderFailure("no font selected".into()))?;
        if text.is_empty() {
            return Ok(());
        }

        let left = match align {
            TextAlign::Left => x,
            TextAlign::Center => x - font.text_width_in(text, size) / 2.0,
        };
        let origin = self.pt(Point::new(left, y));
        let items = vec![TextItem::Text(text.to_string())];

        self.ops.push(Op::StartTextSection);
        self.ops.push(Op::SetFillColor {
            col: to_pdf_color(Rgb::BLACK),
        });
        match font {
            ActiveFont::External(RegisteredFont { id, .. }) => {
                self.ops.push(Op::SetFontSize {
                    size: Pt(size),
                    font: id.clone(),
                });
                self.ops.push(Op::SetTextMatrix {
                    matrix: TextMatrix::Translate(origin.x, origin.y),
                });
                self.ops.push(Op::WriteText { items, font: id });
            }
            ActiveFont::Builtin(builtin) => {
                self.ops.push(Op::SetFontSizeBuiltinFont {
                    size: Pt(size),
                    font: builtin.clone(),
                });
                self.ops.push(Op::SetTextMatrix {
                    matrix: TextMatrix::Translate(origin.x, origin.y),
                });
                self.ops.push(Op::WriteTextBuiltinFont {
                    items,
                    font: builtin,
                });
            }
        }
        self.ops.push(Op::EndTextSection);
        Ok(())
    }

    fn draw_line(&mut self, from: Point, to: Point, stroke: Stroke) -> Result<(), DomainError> {
        self.ensure_started()?;
        self.ops.push(Op::SetOutlineColor {
            col: to_pdf_color(stroke.color),
        });
        self.ops.push(Op::SetOutlineThickness {
            pt: Pt(stroke.width * PT_PER_INCH),
        });
        let points = vec![self.pt(from), self.pt(to)];
        self.push_polygon(points, PaintMode::Stroke);
        Ok(())
    }

    fn draw_circle(
        &mut self,
        center: Point,
        radius: f32,
        paint: CirclePaint,
    ) -> Result<(), DomainError> {
        self.ensure_started()?;
        if radius <= 0.0 {
            return Err(DomainError::RenderFailure(format!(
                "circle radius must be positive, got {}",
                radius
            )));
        }
        self.ops.push(Op::SetFillColor {
            col: to_pdf_color(paint.fill),
        });
        self.ops.push(Op::SetOutlineColor {
            col: to_pdf_color(paint.stroke.color),
        });
        self.ops.push(Op::SetOutlineThickness {
            pt: Pt(paint.stroke.width * PT_PER_INCH),
        });
        let points = (0..CIRCLE_SEGMENTS)
            .map(|i| {
                let theta = i as f32 / CIRCLE_SEGMENTS as f32 * std::f32::consts::TAU;
                self.pt(Point::new(
                    center.x + radius * theta.cos(),
                    center.y + radius * theta.sin(),
                ))
            })
            .collect();
        self.push_polygon(points, PaintMode::FillStroke);
        Ok(())
    }

    fn save(&mut self, filename: &Path) -> Result<PathBuf, DomainError> {
        self.flush_page()?;
        let document = self
            .document
            .take()
            .ok_or_else(|| DomainError::RenderFailure("document not started".into()))?;

        let mut bytes = Vec::new();
        let mut warnings = Vec::new();
        document.save_writer(&mut bytes, &PdfSaveOptions::default(), &mut warnings);
        if !warnings.is_empty() {
            debug!(count = warnings.len(), "pdf serialized with warnings");
        }

        write_atomically(filename, &bytes)?;
        info!(path = %filename.display(), bytes = bytes.len(), "pdf written");
        Ok(filename.to_path_buf())
    }
}

/// Write-replace: temp file, sync, rename. A failed save leaves no artifact behind.
fn write_atomically(path: &Path, bytes: &[u8]) -> Result<(), DomainError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| DomainError::RenderFailure(format!("create output dir: {}", e)))?;
    }
    let temp_path = path.with_extension("pdf.tmp");
    let result = (|| -> std::io::Result<()> {
        let mut f = fs::File::create(&temp_path)?;
        f.write_all(bytes)?;
        f.sync_all()?;
        drop(f);
        fs::rename(&temp_path, path)
    })();
    if let Err(e) = result {
        let _ = fs::remove_file(&temp_path);
        return Err(DomainError::RenderFailure(format!(
            "write {}: {}",
            path.display(),
            e
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::layout::LayoutGeometry;

    fn started() -> PdfRenderer {
        let mut r = PdfRenderer::new("Test");
        r.begin_document(PageSize::TABLOID, Orientation::Landscape)
            .unwrap();
        r
    }

    #[test]
    fn test_landscape_swaps_dimensions() {
        let r = started();
        assert_eq!((r.width_in, r.height_in), (17.0, 11.0));
    }

    #[test]
    fn test_draw_before_begin_fails() {
        let mut r = PdfRenderer::new("Test");
        let err = r.set_font(&FontFace::Standard, 12.0).unwrap_err();
        assert!(matches!(err, DomainError::RenderFailure(_)));
    }

    #[test]
    fn test_text_without_font_fails() {
        let mut r = started();
        let err = r.draw_text("hi", 1.0, 1.0, TextAlign::Left).unwrap_err();
        assert!(matches!(err, DomainError::RenderFailure(_)));
    }

    #[test]
    fn test_garbage_font_is_unavailable() {
        let mut r = started();
        let err = r
            .register_font(&FontData {
                name: "Broken".into(),
                bytes: vec![1, 2, 3],
            })
            .unwrap_err();
        assert!(matches!(err, DomainError::FontUnavailable(_)));
    }

    #[test]
    fn test_unregistered_custom_font_fails() {
        let mut r = started();
        let err = r
            .set_font(&FontFace::Custom("Nope".into()), 12.0)
            .unwrap_err();
        assert!(matches!(err, DomainError::RenderFailure(_)));
    }

    #[test]
    fn test_y_axis_is_flipped() {
        let r = started();
        let p = r.pt(Point::new(1.0, 1.0));
        assert_eq!(p.x, Pt(72.0));
        assert_eq!(p.y, Pt(720.0));
    }

    #[test]
    fn test_save_writes_pdf_and_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("Test-Calendar-2025.pdf");
        let g = LayoutGeometry::default();

        let mut r = started();
        r.set_font(&FontFace::Standard, 24.0).unwrap();
        r.draw_text("Family", 8.5, 0.8, TextAlign::Center).unwrap();
        r.draw_line(Point::new(0.5, 2.3), Point::new(0.5, 9.8), g.separator)
            .unwrap();
        r.draw_circle(Point::new(2.0, 0.4), 0.1, g.hole_paint).unwrap();
        r.add_page().unwrap();
        r.set_font(&FontFace::Standard, 14.0).unwrap();
        r.draw_text("Sunday - Jan 5", 1.6, 2.5, TextAlign::Center)
            .unwrap();

        let saved = r.save(&path).unwrap();
        assert_eq!(saved, path);
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(!path.with_extension("pdf.tmp").exists());
    }

    fn text_start_pt(r: &PdfRenderer) -> f32 {
        r.ops
            .iter()
            .find_map(|op| match op {
                Op::SetTextMatrix {
                    matrix: TextMatrix::Translate(x, _),
                } => Some(x.0),
                _ => None,
            })
            .unwrap()
    }

    #[test]
    fn test_centered_title_measured_in_custom_font() {
        let mut r = started();
        r.register_font(&FontData {
            name: "Courier Bold".into(),
            bytes: BuiltinFont::CourierBold.get_subset_font().bytes,
        })
        .unwrap();
        r.set_font(&FontFace::Custom("Courier Bold".into()), 24.0)
            .unwrap();
        r.draw_text("Smith Family", 8.5, 0.8, TextAlign::Center)
            .unwrap();

        // 12 glyphs at 1229/2048 em, 24pt: 2.4in wide, so it starts at 7.3in.
        let start_in = text_start_pt(&r) / PT_PER_INCH;
        assert!((start_in - 7.3).abs() < 0.005, "starts at {}", start_in);
    }

    #[test]
    fn test_centered_text_in_helvetica_uses_afm_widths() {
        let mut r = started();
        r.set_font(&FontFace::Standard, 24.0).unwrap();
        r.draw_text("Smith Family", 8.5, 0.8, TextAlign::Center)
            .unwrap();

        let expected = 8.5 - text_width_in("Smith Family", 24.0) / 2.0;
        let start_in = text_start_pt(&r) / PT_PER_INCH;
        assert!((start_in - expected).abs() < 1e-4);
    }
}
