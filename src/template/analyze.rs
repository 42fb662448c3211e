use super::apply::{apply_fields, coerce_text, replace_section_content};
use super::heading::infer_sections;
use super::models::{FieldValues, TemplateMetadata, SCHEMA_VERSION};
use super::placeholder::{extract_placeholders, replace_placeholders};
use super::schema::build_schema;
use super::table::summarize_tables;
use crate::document::Document;
use crate::error::Result;

/// Run the full inference pass over a loaded document
pub fn analyze(document: &Document) -> TemplateMetadata {
    let placeholders = extract_placeholders(document);
    let sections = infer_sections(document);
    let tables = summarize_tables(document, &sections);
    let (schema, field_map) = build_schema(&sections, &tables);

    log::info!(
        "Analyzed template: {} sections, {} tables, {} placeholders",
        sections.len(),
        tables.len(),
        placeholders.len()
    );

    TemplateMetadata {
        schema_version: SCHEMA_VERSION,
        placeholders,
        auto_sections: sections,
        schema,
        field_map,
        tables,
    }
}

pub fn analyze_bytes(bytes: &[u8]) -> Result<TemplateMetadata> {
    Ok(analyze(&Document::from_bytes(bytes)?))
}

/// Apply `values` to a freshly loaded document: placeholders first, then
/// structured fields. With an empty field map, keys naming a section id
/// replace that section's content instead.
pub fn render(document: &mut Document, metadata: &TemplateMetadata, values: &FieldValues) {
    replace_placeholders(document, values);

    if !metadata.field_map.is_empty() {
        apply_fields(document, &metadata.field_map, values);
        return;
    }

    let mut sections: Vec<_> = metadata
        .auto_sections
        .iter()
        .filter_map(|section| values.get(&section.id).map(|value| (section, value)))
        .collect();
    sections.sort_by(|a, b| b.0.content_start.cmp(&a.0.content_start));
    for (section, value) in sections {
        replace_section_content(document, section, &coerce_text(value));
    }
}

pub fn render_bytes(bytes: &[u8], metadata: &TemplateMetadata, values: &FieldValues) -> Result<Vec<u8>> {
    let mut document = Document::from_bytes(bytes)?;
    render(&mut document, metadata, values);
    document.to_bytes()
}
