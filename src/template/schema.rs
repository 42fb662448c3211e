//! Schema and field-map construction
//!
//! The public schema lists what a client can fill in; the field map keeps,
//! under the same names, what the engine needs to apply each value.

use std::collections::{BTreeMap, HashSet};

use super::models::{
    FieldDefault, FieldKind, FieldMeta, SchemaField, SchemaGroup, Section, TableSummary,
};
use super::table::friendly_label_from_name;

fn table_field(
    name: String,
    table: &TableSummary,
    field_map: &mut BTreeMap<String, FieldMeta>,
) -> SchemaField {
    let label = if table.label.is_empty() {
        friendly_label_from_name(&name)
    } else {
        table.label.clone()
    };
    field_map.insert(
        name.clone(),
        FieldMeta::Table {
            table_index: table.table_index,
            rows: table.cell_meta.clone(),
        },
    );
    SchemaField {
        name,
        kind: FieldKind::Table,
        label,
        default: FieldDefault::Rows(table.rows.clone()),
        polishable: None,
        rows: Some(table.rows.clone()),
    }
}

pub fn build_schema(
    sections: &[Section],
    tables: &[TableSummary],
) -> (Vec<SchemaGroup>, BTreeMap<String, FieldMeta>) {
    let mut schema = Vec::with_capacity(sections.len());
    let mut field_map = BTreeMap::new();
    let mut attached = HashSet::new();

    for section in sections {
        let content_name = format!("{}_content", section.id);
        field_map.insert(
            content_name.clone(),
            FieldMeta::Section {
                section: section.clone(),
            },
        );

        let mut fields = vec![SchemaField {
            name: content_name,
            kind: FieldKind::Textarea,
            label: section.heading.clone(),
            default: FieldDefault::Text(section.default_text.clone()),
            polishable: Some(true),
            rows: None,
        }];

        let owned = tables
            .iter()
            .filter(|t| t.section_id.as_deref() == Some(section.id.as_str()));
        for (n, table) in owned.enumerate() {
            let name = format!("{}_table_{}", section.id, n + 1);
            fields.push(table_field(name, table, &mut field_map));
            attached.insert(table.table_index);
        }

        schema.push(SchemaGroup {
            section: section.heading.clone(),
            fields,
        });
    }

    for table in tables {
        if attached.contains(&table.table_index) {
            continue;
        }
        let field = table_field(
            format!("table_{}", table.table_index + 1),
            table,
            &mut field_map,
        );
        schema.push(SchemaGroup {
            section: field.label.clone(),
            fields: vec![field],
        });
    }

    (schema, field_map)
}
