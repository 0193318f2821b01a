//! Implements FontSource by reading a font file from disk.

use crate::domain::DomainError;
use crate::ports::{FontData, FontSource};
use std::path::PathBuf;
use tracing::debug;

/// Loads the display font from a configured path. No path means no custom font.
pub struct FsFontSource {
    path: Option<PathBuf>,
    name: String,
}

impl FsFontSource {
    pub fn new(path: Option<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            path,
            name: name.into(),
        }
    }
}

impl FontSource for FsFontSource {
    fn display_font(&self) -> Result<FontData, DomainError> {
        let path = self
            .path
            .as_ref()
            .ok_or_else(|| DomainError::FontUnavailable("no display font configured".into()))?;
        let bytes = std::fs::read(path).map_err(|e| {
            DomainError::FontUnavailable(format!("read {}: {}", path.display(), e))
        })?;
        if bytes.is_empty() {
            return Err(DomainError::FontUnavailable(format!(
                "{} is empty",
                path.display()
            )));
        }
        debug!(path = %path.display(), bytes = bytes.len(), "display font loaded");
        Ok(FontData {
            name: self.name.clone(),
            bytes,
        })
    }
}
