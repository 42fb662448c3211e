//! Template inference and regeneration
//!
//! Analysis turns a document into sections, table summaries, a public
//! schema and a field map. Rendering applies field values back onto a fresh
//! copy of the same document.

pub mod analyze;
pub mod apply;
pub mod formatting;
pub mod heading;
pub mod models;
pub mod placeholder;
pub mod schema;
pub mod service;
pub mod store;
pub mod table;

pub use analyze::{analyze, analyze_bytes, render, render_bytes};
pub use apply::{apply_field, apply_fields};
pub use formatting::PropertyBlob;
pub use heading::{infer_sections, looks_like_heading, ParagraphSnapshot, RunSnapshot};
pub use models::*;
pub use placeholder::{extract_placeholders, replace_placeholders};
pub use schema::build_schema;
pub use service::{TemplateLibrary, TemplateService};
pub use store::{FsMetadataStore, MemoryMetadataStore, MetadataStore};
pub use table::summarize_tables;
