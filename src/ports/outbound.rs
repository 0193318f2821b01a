//! Outbound ports. Application calls into infrastructure.
//!
//! Implemented by adapters.

use crate::domain::layout::{CirclePaint, Point, Stroke, TextAlign};
use crate::domain::{DomainError, HolidayRow, Location, LocationOption, WeekPage};
use std::path::{Path, PathBuf};

/// Holiday data source. Unsupported locations return an empty list, not an error.
#[async_trait::async_trait]
pub trait HolidayProvider: Send + Sync {
    /// Countries this source knows about.
    async fn countries(&self) -> Result<Vec<LocationOption>, DomainError>;

    /// States/provinces of a country. Empty when the source has none.
    async fn states(&self, country: &str) -> Result<Vec<LocationOption>, DomainError>;

    /// Regions of a state. Empty when the source has none.
    async fn regions(&self, country: &str, state: &str)
    -> Result<Vec<LocationOption>, DomainError>;

    /// Holidays observed at `location` during `year`, as (name, MM-DD, type) rows.
    async fn lookup(&self, location: &Location, year: i32) -> Result<Vec<HolidayRow>, DomainError>;
}

/// Key-value store for wizard selections. Owned by the surrounding application.
#[async_trait::async_trait]
pub trait PreferenceStore: Send + Sync {
    /// Value stored under `key`, or None.
    async fn load(&self, key: &str) -> Result<Option<String>, DomainError>;

    async fn save(&self, key: &str, value: &str) -> Result<(), DomainError>;
}

/// Raw bytes of a TrueType/OpenType font plus the family name to register it under.
#[derive(Debug, Clone)]
pub struct FontData {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Supplies the custom display font. Failing with `FontUnavailable` is expected and
/// handled by falling back to the standard font.
pub trait FontSource: Send + Sync {
    fn display_font(&self) -> Result<FontData, DomainError>;
}

/// Font selected for text drawing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontFace {
    /// A font previously registered with [`Renderer::register_font`].
    Custom(String),
    /// The renderer's built-in Helvetica.
    Standard,
}

/// Physical sheet size in inches (width x height before orientation is applied).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width_in: f32,
    pub height_in: f32,
}

impl PageSize {
    /// 11x17 ("tabloid") sheet.
    pub const TABLOID: PageSize = PageSize {
        width_in: 11.0,
        height_in: 17.0,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Portrait,
    Landscape,
}

/// Drawing capability set the assembler drives. Coordinates are inches from the top-left
/// corner. One renderer instance serves one generation call; it is not shared.
pub trait Renderer {
    /// Starts the document with its first page.
    fn begin_document(&mut self, size: PageSize, orientation: Orientation)
    -> Result<(), DomainError>;

    /// Registers a font for later `set_font(FontFace::Custom(name))`.
    /// Unparseable data fails with `FontUnavailable`.
    fn register_font(&mut self, font: &FontData) -> Result<(), DomainError>;

    fn add_page(&mut self) -> Result<(), DomainError>;

    /// `size` is in points.
    fn set_font(&mut self, face: &FontFace, size: f32) -> Result<(), DomainError>;

    fn draw_text(&mut self, text: &str, x: f32, y: f32, align: TextAlign)
    -> Result<(), DomainError>;

    fn draw_line(&mut self, from: Point, to: Point, stroke: Stroke) -> Result<(), DomainError>;

    fn draw_circle(&mut self, center: Point, radius: f32, paint: CirclePaint)
    -> Result<(), DomainError>;

    /// Emits the finished artifact as `filename` and returns where it went.
    fn save(&mut self, filename: &Path) -> Result<PathBuf, DomainError>;
}

/// Progress callbacks during generation.
pub trait GenerationObserver: Send + Sync {
    fn started(&self, total_pages: usize);

    fn page_done(&self, page: &WeekPage);

    fn finished(&self, artifact: &Path);
}
