//! Template library and the upload / fields / generate operations

use std::fs;
use std::path::{Path, PathBuf};

use super::analyze::{analyze_bytes, render_bytes};
use super::models::{
    GenerateRequest, GeneratedDocument, TemplateFields, TemplateMetadata, UploadedTemplate,
    DOCX_CONTENT_TYPE,
};
use super::store::{FsMetadataStore, MetadataStore};
use crate::document::validate_docx_name;
use crate::error::{Result, TemplateError};

pub const METADATA_DIR_NAME: &str = "_meta";

/// Directory of uploaded template documents, keyed by template id
#[derive(Debug, Clone)]
pub struct TemplateLibrary {
    dir: PathBuf,
}

impl TemplateLibrary {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Template id for an uploaded file name: spaces become underscores
    pub fn template_id_for(file_name: &str) -> Result<String> {
        validate_docx_name(file_name)?;
        let id = file_name.replace(' ', "_");
        Self::validate_id(&id)?;
        Ok(id)
    }

    pub fn validate_id(template_id: &str) -> Result<()> {
        let invalid = template_id.is_empty()
            || template_id.contains(['/', '\\'])
            || template_id.contains("..")
            || template_id == METADATA_DIR_NAME;
        if invalid {
            return Err(TemplateError::InvalidTemplateId(template_id.to_string()));
        }
        Ok(())
    }

    pub fn path(&self, template_id: &str) -> Result<PathBuf> {
        Self::validate_id(template_id)?;
        Ok(self.dir.join(template_id))
    }

    pub fn save(&self, template_id: &str, bytes: &[u8]) -> Result<PathBuf> {
        let path = self.path(template_id)?;
        fs::create_dir_all(&self.dir)?;
        fs::write(&path, bytes)?;
        Ok(path)
    }

    pub fn read(&self, template_id: &str) -> Result<Vec<u8>> {
        let path = self.path(template_id)?;
        if !path.is_file() {
            return Err(TemplateError::NotFound(template_id.to_string()));
        }
        Ok(fs::read(path)?)
    }

    /// Stored template ids, sorted
    pub fn list(&self) -> Result<Vec<String>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.to_lowercase().ends_with(".docx") {
                ids.push(name);
            }
        }
        ids.sort();
        Ok(ids)
    }
}

pub struct TemplateService<S = FsMetadataStore> {
    library: TemplateLibrary,
    store: S,
}

impl TemplateService<FsMetadataStore> {
    /// Templates in `dir`, metadata cached in `dir/_meta`
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        let library = TemplateLibrary::new(dir);
        let store = FsMetadataStore::new(library.dir().join(METADATA_DIR_NAME));
        Self::new(library, store)
    }
}

impl<S: MetadataStore> TemplateService<S> {
    pub fn new(library: TemplateLibrary, store: S) -> Self {
        Self { library, store }
    }

    pub fn library(&self) -> &TemplateLibrary {
        &self.library
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Store an uploaded document and analyze it
    pub fn upload(&self, file_name: &str, bytes: &[u8]) -> Result<UploadedTemplate> {
        let template_id = TemplateLibrary::template_id_for(file_name)?;
        let metadata = analyze_bytes(bytes)?;
        self.library.save(&template_id, bytes)?;
        self.store.save(&template_id, &metadata)?;
        log::info!("Uploaded template {template_id}");

        Ok(UploadedTemplate {
            template_id,
            fields: metadata.fields(),
        })
    }

    pub fn list(&self) -> Result<Vec<String>> {
        self.library.list()
    }

    /// Re-run analysis on the stored document and cache the result
    pub fn analyze(&self, template_id: &str) -> Result<TemplateMetadata> {
        let bytes = self.library.read(template_id)?;
        let metadata = analyze_bytes(&bytes)?;
        self.store.save(template_id, &metadata)?;
        Ok(metadata)
    }

    /// Cached metadata when present and current, otherwise a fresh analysis
    pub fn ensure_metadata(&self, template_id: &str) -> Result<TemplateMetadata> {
        TemplateLibrary::validate_id(template_id)?;
        match self.store.load(template_id)? {
            Some(metadata) if metadata.is_current() => Ok(metadata),
            Some(stale) => {
                log::info!(
                    "Metadata for {template_id} has schema version {}; recomputing",
                    stale.schema_version
                );
                self.analyze(template_id)
            }
            None => self.analyze(template_id),
        }
    }

    pub fn fields(&self, template_id: &str) -> Result<TemplateFields> {
        if !self.library.path(template_id)?.is_file() {
            return Err(TemplateError::NotFound(template_id.to_string()));
        }
        Ok(self.ensure_metadata(template_id)?.fields())
    }

    pub fn generate(&self, request: &GenerateRequest) -> Result<GeneratedDocument> {
        let bytes = self.library.read(&request.template_id)?;
        let metadata = self.ensure_metadata(&request.template_id)?;
        let payload = request.payload();
        log::info!(
            "Generating {} from {} with {} values",
            request.output_filename,
            request.template_id,
            payload.len()
        );

        Ok(GeneratedDocument {
            bytes: render_bytes(&bytes, &metadata, &payload)?,
            filename: request.output_filename.clone(),
            content_type: DOCX_CONTENT_TYPE,
        })
    }
}
