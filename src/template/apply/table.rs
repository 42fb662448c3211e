//! Table fields: resize to the supplied row count, then overwrite every cell

use serde_json::Value;

use super::scalar_text;
use crate::document::paragraph::{self, PARAGRAPH};
use crate::document::table as tbl;
use crate::document::xml::XmlElement;
use crate::document::{Document, StyleSheet};
use crate::template::formatting::{capture_paragraph_format, replace_paragraph_text};

/// Coerce a loosely shaped value into rows of cell text.
///
/// Lists of lists are taken as-is, mapping rows are read by stringified
/// column index, any other row becomes a single cell, and a bare scalar is
/// one single-cell row.
pub fn coerce_rows(value: &Value, columns: usize) -> Vec<Vec<String>> {
    let Value::Array(rows) = value else {
        return vec![vec![scalar_text(value)]];
    };
    rows.iter()
        .map(|row| match row {
            Value::Array(cells) => cells.iter().map(scalar_text).collect(),
            Value::Object(map) => (0..columns)
                .map(|col| map.get(&col.to_string()).map(scalar_text).unwrap_or_default())
                .collect(),
            other => vec![scalar_text(other)],
        })
        .collect()
}

/// Single paragraph, single run per cell; extra paragraphs are deleted
pub fn set_cell_text(cell: &mut XmlElement, styles: &StyleSheet, text: &str) {
    if cell.child(PARAGRAPH).is_none() {
        cell.push(paragraph::new_paragraph());
    }
    while cell.count_named(PARAGRAPH) > 1 {
        cell.remove_named(PARAGRAPH, 1);
    }
    if let Some(primary) = cell.child_mut(PARAGRAPH) {
        let format = capture_paragraph_format(styles, primary);
        replace_paragraph_text(primary, styles, text, &format);
    }
}

pub fn apply_table_field(document: &mut Document, table_index: usize, value: &Value) {
    let styles = document.styles().clone();
    let Some(table) = document.table_mut(table_index) else {
        log::debug!("Table {table_index} not present; skipping");
        return;
    };

    let values = coerce_rows(value, tbl::column_count(table));
    let target = values.len().max(1);

    while tbl::row_count(table) < target {
        tbl::append_row(table);
    }
    while tbl::row_count(table) > target {
        let last = tbl::row_count(table) - 1;
        tbl::remove_row(table, last);
    }

    for (r, row) in tbl::rows_mut(table).enumerate() {
        let row_values = values.get(r);
        for (c, cell) in tbl::cells_mut(row).enumerate() {
            let text = row_values
                .and_then(|vals| vals.get(c))
                .map_or("", String::as_str);
            set_cell_text(cell, &styles, text);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coerce_rows_shapes() {
        assert_eq!(
            coerce_rows(&json!([["a", 1], [null, true]]), 2),
            vec![vec!["a", "1"], vec!["", "true"]]
        );
        assert_eq!(
            coerce_rows(&json!([{"0": "x", "2": "z"}]), 3),
            vec![vec!["x", "", "z"]]
        );
        assert_eq!(coerce_rows(&json!(["solo", 7]), 2), vec![vec!["solo"], vec!["7"]]);
        assert_eq!(coerce_rows(&json!("scalar"), 4), vec![vec!["scalar"]]);
        assert!(coerce_rows(&json!([]), 2).is_empty());
    }

    #[test]
    fn test_set_cell_text_collapses_paragraphs() {
        let mut cell = XmlElement::new(tbl::CELL)
            .with_child(paragraph::new_paragraph().with_child(paragraph::new_run("one")))
            .with_child(paragraph::new_paragraph().with_child(paragraph::new_run("two")));
        set_cell_text(&mut cell, &StyleSheet::default(), "fresh");

        assert_eq!(cell.count_named(PARAGRAPH), 1);
        assert_eq!(tbl::cell_text(&cell), "fresh");
    }
}
