//! Error types shared by the document model and the template engine

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TemplateError>;

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template not found: {0}")]
    NotFound(String),

    #[error("Only .docx files supported, got {0}")]
    UnsupportedFormat(String),

    #[error("Invalid template id: {0}")]
    InvalidTemplateId(String),

    #[error("Invalid .docx file: {0}")]
    InvalidDocument(String),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Metadata error: {0}")]
    Metadata(#[from] serde_json::Error),
}

impl TemplateError {
    /// Errors caused by the caller's request rather than by the server side
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            TemplateError::NotFound(_)
                | TemplateError::UnsupportedFormat(_)
                | TemplateError::InvalidTemplateId(_)
        )
    }
}

impl From<quick_xml::events::attributes::AttrError> for TemplateError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        TemplateError::Xml(err.into())
    }
}
