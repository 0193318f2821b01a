//! Implements PreferenceStore using a single JSON file.
//!
//! One flat object of key -> string value. Loaded lazily on first access.

use crate::domain::DomainError;
use crate::ports::PreferenceStore;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// JSON file-based preference storage.
pub struct JsonPreferenceStore {
    path: PathBuf,
    cache: RwLock<Option<BTreeMap<String, String>>>,
}

impl JsonPreferenceStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            cache: RwLock::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the file. Missing file is an empty store; a corrupt one is logged and ignored.
    async fn read_file(&self) -> Result<BTreeMap<String, String>, DomainError> {
        match fs::read_to_string(&self.path).await {
            Ok(s) => Ok(serde_json::from_str(&s).unwrap_or_else(|e| {
                warn!(path = %self.path.display(), error = %e, "preference file unreadable, starting fresh");
                BTreeMap::new()
            })),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(DomainError::Preferences(format!(
                "read {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    async fn ensure_loaded(&self) -> Result<(), DomainError> {
        if self.cache.read().await.is_some() {
            return Ok(());
        }
        let data = self.read_file().await?;
        let mut cache = self.cache.write().await;
        if cache.is_none() {
            *cache = Some(data);
        }
        Ok(())
    }

    /// Write-replace: temp file, sync, rename.
    async fn persist(&self, data: &BTreeMap<String, String>) -> Result<(), DomainError> {
        let json = serde_json::to_string_pretty(data)
            .map_err(|e| DomainError::Preferences(e.to_string()))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| DomainError::Preferences(format!("create dir: {}", e)))?;
        }

        let temp_path = self.path.with_extension("json.tmp");
        let mut f = fs::File::create(&temp_path)
            .await
            .map_err(|e| DomainError::Preferences(format!("create temp file: {}", e)))?;
        f.write_all(json.as_bytes())
            .await
            .map_err(|e| DomainError::Preferences(format!("write temp file: {}", e)))?;
        f.sync_all()
            .await
            .map_err(|e| DomainError::Preferences(format!("sync temp file: {}", e)))?;
        drop(f);

        fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| DomainError::Preferences(format!("atomic rename failed: {}", e)))?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl PreferenceStore for JsonPreferenceStore {
    async fn load(&self, key: &str) -> Result<Option<String>, DomainError> {
        self.ensure_loaded().await?;
        let cache = self.cache.read().await;
        Ok(cache.as_ref().and_then(|m| m.get(key).cloned()))
    }

    async fn save(&self, key: &str, value: &str) -> Result<(), DomainError> {
        self.ensure_loaded().await?;
        let mut cache = self.cache.write().await;
        let data = cache.get_or_insert_with(BTreeMap::new);
        data.insert(key.to_string(), value.to_string());
        self.persist(data).await?;
        debug!(key, "preference saved");
        Ok(())
    }
}
