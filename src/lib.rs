//! doxfill: reusable .docx templates
//!
//! This library infers a fillable schema (sections, tables, placeholders)
//! from an ordinary Word document and regenerates the document from field
//! values while keeping its paragraph styling, numbering and table layout.

pub mod config;
pub mod document;
pub mod error;
pub mod template;

// Re-export commonly used types
pub use config::Config;
pub use document::Document;
pub use error::{Result, TemplateError};
pub use template::{
    GenerateRequest, GeneratedDocument, TemplateMetadata, TemplateService, SCHEMA_VERSION,
};
