//! Analysis artifacts and request/response types
//!
//! Everything here is derived from one analysis pass over one uploaded
//! document and persisted as JSON next to the template.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::formatting::PropertyBlob;

/// Bump whenever inference output changes incompatibly; cached metadata
/// with a different version is recomputed
pub const SCHEMA_VERSION: u32 = 1;

pub const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Field values supplied for generation, keyed by field name or placeholder
pub type FieldValues = Map<String, Value>;

/// Representative run formatting, taken from a paragraph's first run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunFormat {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    /// `ST_Underline` value such as `single` or `double`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub underline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size_pt: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_color: Option<FontColor>,
    /// `ST_HighlightColor` value such as `yellow`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight: Option<String>,
}

impl RunFormat {
    pub fn is_empty(&self) -> bool {
        *self == RunFormat::default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontColor {
    /// Six hex digits, no leading `#`
    Rgb(String),
    /// `ST_ThemeColor` value such as `accent1`
    Theme(String),
}

/// Paragraph-level formatting that can be restored onto a new paragraph
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParagraphFormat {
    #[serde(default)]
    pub style: Option<String>,
    #[serde(default)]
    pub paragraph_properties: Option<PropertyBlob>,
    #[serde(default)]
    pub list_properties: Option<PropertyBlob>,
    #[serde(default)]
    pub run_format: RunFormat,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParagraphMeta {
    pub index: usize,
    #[serde(flatten)]
    pub format: ParagraphFormat,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    pub heading: String,
    pub heading_index: usize,
    /// Half-open paragraph range of the section body
    pub content_start: usize,
    pub content_end: usize,
    pub paragraphs: Vec<ParagraphMeta>,
    pub default_text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellRef {
    pub row: usize,
    pub col: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSummary {
    pub table_index: usize,
    pub rows: Vec<Vec<String>>,
    pub cell_meta: Vec<Vec<CellRef>>,
    pub section_id: Option<String>,
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldKind {
    Textarea,
    Table,
    CheckboxGroup,
    Text,
    Date,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldDefault {
    Text(String),
    Rows(Vec<Vec<String>>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaField {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    pub label: String,
    pub default: FieldDefault,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polishable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<Vec<Vec<String>>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaGroup {
    pub section: String,
    pub fields: Vec<SchemaField>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckboxOption {
    pub value: String,
    pub paragraph_index: usize,
    #[serde(default)]
    pub style: Option<String>,
    #[serde(default)]
    pub text: String,
}

/// Everything needed to apply one field's value to the document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum FieldMeta {
    Section {
        section: Section,
    },
    Table {
        table_index: usize,
        rows: Vec<Vec<CellRef>>,
    },
    CheckboxGroup {
        options: Vec<CheckboxOption>,
    },
    Text {
        start: usize,
        end: usize,
        #[serde(default)]
        heading_index: Option<usize>,
        #[serde(default)]
        paragraphs: Vec<ParagraphMeta>,
    },
}

impl FieldMeta {
    /// First body paragraph this field edits. Fields are applied from the
    /// highest anchor down so pending anchors stay valid; tables edit no
    /// body paragraphs and have none.
    pub fn paragraph_anchor(&self) -> Option<usize> {
        match self {
            FieldMeta::Section { section } => Some(section.content_start),
            FieldMeta::Text { start, .. } => Some(*start),
            FieldMeta::CheckboxGroup { options } => {
                options.iter().map(|option| option.paragraph_index).min()
            }
            FieldMeta::Table { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateMetadata {
    pub schema_version: u32,
    pub placeholders: Vec<String>,
    pub auto_sections: Vec<Section>,
    pub schema: Vec<SchemaGroup>,
    pub field_map: BTreeMap<String, FieldMeta>,
    pub tables: Vec<TableSummary>,
}

impl TemplateMetadata {
    pub fn is_current(&self) -> bool {
        self.schema_version == SCHEMA_VERSION
    }

    pub fn public_sections(&self) -> Vec<PublicSection> {
        self.auto_sections
            .iter()
            .map(|section| PublicSection {
                id: section.id.clone(),
                heading: section.heading.clone(),
                default_text: section.default_text.clone(),
            })
            .collect()
    }

    /// Client-facing field listing; when the document has no inline
    /// placeholders the section ids stand in for them
    pub fn fields(&self) -> TemplateFields {
        let placeholders = if self.placeholders.is_empty() {
            self.auto_sections.iter().map(|s| s.id.clone()).collect()
        } else {
            self.placeholders.clone()
        };
        TemplateFields {
            placeholders,
            auto_sections: self.public_sections(),
            schema: self.schema.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicSection {
    pub id: String,
    pub heading: String,
    pub default_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateFields {
    pub placeholders: Vec<String>,
    pub auto_sections: Vec<PublicSection>,
    pub schema: Vec<SchemaGroup>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadedTemplate {
    pub template_id: String,
    #[serde(flatten)]
    pub fields: TemplateFields,
}

fn default_output_filename() -> String {
    "generated.docx".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub template_id: String,
    #[serde(default)]
    pub data: Option<FieldValues>,
    #[serde(default)]
    pub fields: Option<FieldValues>,
    #[serde(default = "default_output_filename")]
    pub output_filename: String,
}

impl GenerateRequest {
    pub fn new(template_id: impl Into<String>, fields: FieldValues) -> Self {
        Self {
            template_id: template_id.into(),
            data: None,
            fields: Some(fields),
            output_filename: default_output_filename(),
        }
    }

    /// `fields` wins over the legacy `data` payload
    pub fn payload(&self) -> FieldValues {
        self.fields
            .clone()
            .or_else(|| self.data.clone())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone)]
pub struct GeneratedDocument {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub content_type: &'static str,
}
