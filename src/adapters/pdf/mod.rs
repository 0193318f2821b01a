//! Rendering adapters: printpdf output, call recording, font loading.

pub mod font_source;
pub mod metrics;
pub mod printpdf_renderer;
pub mod recording;

pub use font_source::FsFontSource;
pub use printpdf_renderer::PdfRenderer;
pub use recording::{RecordingRenderer, RenderCall};
