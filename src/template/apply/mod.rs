//! Field application engine
//!
//! Mutates a loaded document according to field values. Fields that edit
//! body paragraphs run from the last anchor in the document to the first,
//! so edits never shift an index another pending field still relies on.

pub mod blocks;
pub mod checkbox;
pub mod plan;
pub mod table;
pub mod text;

use std::collections::BTreeMap;

use serde_json::Value;

use super::models::{FieldMeta, FieldValues};
use crate::document::Document;

pub use checkbox::apply_checkbox_field;
pub use table::apply_table_field;
pub use text::{apply_text_region, replace_section_content, TextRegion};

/// Text for a single scalar slot: `null` is empty, strings are taken as-is,
/// anything else is written as its JSON text
pub(crate) fn scalar_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Text for a free-text field; lists become blank-line separated blocks
pub fn coerce_text(value: &Value) -> String {
    match value {
        Value::Array(items) => items
            .iter()
            .map(scalar_text)
            .collect::<Vec<_>>()
            .join("\n\n"),
        other => scalar_text(other),
    }
}

pub fn apply_field(document: &mut Document, meta: &FieldMeta, value: &Value) {
    match meta {
        FieldMeta::Section { section } => {
            replace_section_content(document, section, &coerce_text(value));
        }
        FieldMeta::Text {
            start,
            end,
            heading_index,
            paragraphs,
        } => {
            let region = TextRegion {
                start: *start,
                end: *end,
                heading_index: *heading_index,
                paragraphs,
            };
            apply_text_region(document, region, &coerce_text(value));
        }
        FieldMeta::Table { table_index, .. } => apply_table_field(document, *table_index, value),
        FieldMeta::CheckboxGroup { options } => apply_checkbox_field(document, options, value),
    }
}

/// Apply every supplied field that the field map knows, highest paragraph
/// anchor first; fields without an anchor go last
pub fn apply_fields(
    document: &mut Document,
    field_map: &BTreeMap<String, FieldMeta>,
    values: &FieldValues,
) -> usize {
    let mut pending: Vec<(&String, &FieldMeta, &Value)> = field_map
        .iter()
        .filter_map(|(name, meta)| values.get(name).map(|value| (name, meta, value)))
        .collect();
    pending.sort_by(|a, b| b.1.paragraph_anchor().cmp(&a.1.paragraph_anchor()));

    for (name, meta, value) in &pending {
        log::debug!("Applying field {name}");
        apply_field(document, meta, value);
    }
    pending.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coerce_text() {
        assert_eq!(coerce_text(&json!(null)), "");
        assert_eq!(coerce_text(&json!("as is")), "as is");
        assert_eq!(coerce_text(&json!(12.5)), "12.5");
        assert_eq!(coerce_text(&json!(false)), "false");
        assert_eq!(coerce_text(&json!(["a", "b", null])), "a\n\nb\n\n");
    }
}
