//! Table accessors: rows, cells and the structural edits applied to them

use super::paragraph::{self, PARAGRAPH};
use super::xml::{XmlElement, XmlNode};

pub const TABLE: &str = "w:tbl";
pub const ROW: &str = "w:tr";
pub const CELL: &str = "w:tc";

pub fn rows(table: &XmlElement) -> impl Iterator<Item = &XmlElement> {
    table.children_named(ROW)
}

pub fn rows_mut(table: &mut XmlElement) -> impl Iterator<Item = &mut XmlElement> {
    table.children_named_mut(ROW)
}

pub fn row_count(table: &XmlElement) -> usize {
    table.count_named(ROW)
}

pub fn cells(row: &XmlElement) -> impl Iterator<Item = &XmlElement> {
    row.children_named(CELL)
}

pub fn cells_mut(row: &mut XmlElement) -> impl Iterator<Item = &mut XmlElement> {
    row.children_named_mut(CELL)
}

/// Cell text: its paragraphs joined by newlines
pub fn cell_text(cell: &XmlElement) -> String {
    cell.children_named(PARAGRAPH)
        .map(paragraph::paragraph_text)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Column count from `w:tblGrid`, or the widest row when the grid is missing
pub fn column_count(table: &XmlElement) -> usize {
    let grid = table
        .child("w:tblGrid")
        .map(|grid| grid.count_named("w:gridCol"))
        .unwrap_or(0);
    if grid > 0 {
        return grid;
    }
    rows(table).map(|row| cells(row).count()).max().unwrap_or(0)
}

/// Append a row shaped like the current last row, with every cell emptied.
/// Row and cell properties (widths, merges, shading) are carried over.
pub fn append_row(table: &mut XmlElement) {
    let template = rows(table).last().cloned();
    let row = match template {
        Some(mut row) => {
            for cell in cells_mut(&mut row) {
                blank_cell(cell);
            }
            row
        }
        None => {
            let mut row = XmlElement::new(ROW);
            for _ in 0..column_count(table).max(1) {
                row.push(XmlElement::new(CELL).with_child(paragraph::new_paragraph()));
            }
            row
        }
    };

    let insert_at = match row_count(table) {
        0 => table.children.len(),
        n => table
            .position_of(ROW, n - 1)
            .map_or(table.children.len(), |pos| pos + 1),
    };
    table.children.insert(insert_at, XmlNode::Element(row));
}

/// Remove the row at `index`; out-of-range indices are ignored
pub fn remove_row(table: &mut XmlElement, index: usize) -> bool {
    table.remove_named(ROW, index).is_some()
}

/// Keep one paragraph per cell, holding only its paragraph properties
fn blank_cell(cell: &mut XmlElement) {
    while cell.count_named(PARAGRAPH) > 1 {
        cell.remove_named(PARAGRAPH, 1);
    }
    match cell.child_mut(PARAGRAPH) {
        Some(p) => paragraph::clear_content(p),
        None => cell.push(paragraph::new_paragraph()),
    }
}
