//! Table summarizer
//!
//! Extracts every body table's cell text and ties it to the section whose
//! content (or heading) precedes it in the body.

use std::collections::HashMap;

use super::models::{CellRef, Section, TableSummary};
use crate::document::table as tbl;
use crate::document::{BodyItem, Document};

/// Humanize a field name: `_`, `-` and `.` become spaces, words capitalized
pub fn friendly_label_from_name(name: &str) -> String {
    name.replace(['_', '-', '.'], " ")
        .split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Section owning body paragraph `index`, by content range first and then
/// by heading
fn section_for_paragraph<'a>(
    index: usize,
    sections: &'a [Section],
    by_heading: &HashMap<usize, &'a str>,
) -> Option<&'a str> {
    sections
        .iter()
        .find(|s| s.content_start <= index && index < s.content_end)
        .map(|s| s.id.as_str())
        .or_else(|| by_heading.get(&index).copied())
}

pub fn summarize_tables(document: &Document, sections: &[Section]) -> Vec<TableSummary> {
    let by_heading: HashMap<usize, &str> = sections
        .iter()
        .map(|s| (s.heading_index, s.id.as_str()))
        .collect();
    let items = document.body_items();

    let mut summaries = Vec::with_capacity(document.table_count());
    for (position, item) in items.iter().enumerate() {
        let BodyItem::Table(table_index) = *item else {
            continue;
        };
        let Some(table) = document.table(table_index) else {
            continue;
        };

        let mut rows = Vec::new();
        let mut cell_meta = Vec::new();
        for (r, row) in tbl::rows(table).enumerate() {
            let mut values = Vec::new();
            let mut refs = Vec::new();
            for (c, cell) in tbl::cells(row).enumerate() {
                values.push(tbl::cell_text(cell).trim().to_string());
                refs.push(CellRef { row: r, col: c });
            }
            rows.push(values);
            cell_meta.push(refs);
        }

        let section_id = items[..position].iter().rev().find_map(|prev| match prev {
            BodyItem::Paragraph(index) => section_for_paragraph(*index, sections, &by_heading),
            _ => None,
        });

        let label = rows
            .first()
            .and_then(|row| row.first())
            .filter(|cell| !cell.is_empty())
            .cloned()
            .unwrap_or_else(|| format!("Table {}", table_index + 1));

        log::debug!(
            "Table {table_index}: {} rows, section {:?}",
            rows.len(),
            section_id
        );

        summaries.push(TableSummary {
            table_index,
            rows,
            cell_meta,
            section_id: section_id.map(str::to_string),
            label,
        });
    }

    summaries
}
