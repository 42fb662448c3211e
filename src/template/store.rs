//! Template metadata persistence
//!
//! Metadata is cached per template id. A missing or unreadable entry is
//! treated as absent so the caller recomputes it.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::models::TemplateMetadata;
use crate::error::Result;

pub trait MetadataStore {
    fn load(&self, template_id: &str) -> Result<Option<TemplateMetadata>>;
    fn save(&self, template_id: &str, metadata: &TemplateMetadata) -> Result<()>;
}

/// Pretty-printed JSON files, one per template: `<dir>/<template_id>.json`
#[derive(Debug, Clone)]
pub struct FsMetadataStore {
    dir: PathBuf,
}

impl FsMetadataStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, template_id: &str) -> PathBuf {
        self.dir.join(format!("{template_id}.json"))
    }
}

impl MetadataStore for FsMetadataStore {
    fn load(&self, template_id: &str) -> Result<Option<TemplateMetadata>> {
        let path = self.path_for(template_id);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)?;
        match serde_json::from_str(&content) {
            Ok(metadata) => Ok(Some(metadata)),
            Err(e) => {
                log::warn!("Discarding unreadable metadata {}: {e}", path.display());
                Ok(None)
            }
        }
    }

    fn save(&self, template_id: &str, metadata: &TemplateMetadata) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let content = serde_json::to_string_pretty(metadata)?;
        fs::write(self.path_for(template_id), content)?;
        Ok(())
    }
}

/// Process-local store, mostly for tests and embedding
#[derive(Debug, Default)]
pub struct MemoryMetadataStore {
    entries: Mutex<HashMap<String, TemplateMetadata>>,
}

impl MemoryMetadataStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MetadataStore for MemoryMetadataStore {
    fn load(&self, template_id: &str) -> Result<Option<TemplateMetadata>> {
        let entries = self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(entries.get(template_id).cloned())
    }

    fn save(&self, template_id: &str, metadata: &TemplateMetadata) -> Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        entries.insert(template_id.to_string(), metadata.clone());
        Ok(())
    }
}
