//! Inbound port. UI (adapter) calls into the application.

use crate::domain::DomainError;
use std::path::PathBuf;

/// Input port: UI/CLI collects the calendar inputs and invokes generation.
#[async_trait::async_trait]
pub trait InputPort: Send + Sync {
    /// Run the interactive wizard. Returns the written artifact, or None when the
    /// user backed out before generating.
    async fn run(&self) -> Result<Option<PathBuf>, DomainError>;
}
