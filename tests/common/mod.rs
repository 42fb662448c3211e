//! Fixture builders shared by the integration tests

#![allow(dead_code)]

use std::io::Cursor;

use docx_rs::*;
use doxfill::document::{paragraph, table as tbl};
use doxfill::Document;

pub fn pack(docx: Docx) -> Vec<u8> {
    let mut buffer = Vec::new();
    docx.build()
        .pack(&mut Cursor::new(&mut buffer))
        .expect("Failed to pack fixture document");
    buffer
}

pub fn with_heading_styles(docx: Docx) -> Docx {
    docx.add_style(
        Style::new("Heading1", StyleType::Paragraph)
            .name("Heading 1")
            .size(32)
            .bold(),
    )
}

pub fn with_bullets(docx: Docx) -> Docx {
    let level = Level::new(
        0,
        Start::new(1),
        NumberFormat::new("bullet"),
        LevelText::new("•"),
        LevelJc::new("left"),
    );
    docx.add_abstract_numbering(AbstractNumbering::new(1).add_level(level))
        .add_numbering(Numbering::new(1, 1))
}

pub fn text(value: &str) -> Paragraph {
    Paragraph::new().add_run(Run::new().add_text(value))
}

pub fn italic(value: &str) -> Paragraph {
    Paragraph::new().add_run(Run::new().add_text(value).italic())
}

pub fn bold(value: &str) -> Paragraph {
    Paragraph::new().add_run(Run::new().add_text(value).bold())
}

pub fn heading(value: &str) -> Paragraph {
    text(value).style("Heading1")
}

pub fn bullet(value: &str) -> Paragraph {
    text(value).numbering(NumberingId::new(1), IndentLevel::new(0))
}

pub fn blank() -> Paragraph {
    Paragraph::new()
}

pub fn table(rows: &[&[&str]]) -> Table {
    Table::new(
        rows.iter()
            .map(|row| {
                TableRow::new(
                    row.iter()
                        .map(|cell| {
                            TableCell::new()
                                .width(2400, WidthType::Dxa)
                                .add_paragraph(text(cell))
                        })
                        .collect(),
                )
            })
            .collect(),
    )
}

pub fn load(bytes: &[u8]) -> Document {
    Document::from_bytes(bytes).expect("Failed to load document")
}

/// Trimmed text of every body paragraph
pub fn paragraph_texts(document: &Document) -> Vec<String> {
    document
        .paragraphs()
        .map(|p| paragraph::paragraph_text(p).trim().to_string())
        .collect()
}

/// Body paragraph texts with blanks removed
pub fn visible_texts(document: &Document) -> Vec<String> {
    paragraph_texts(document)
        .into_iter()
        .filter(|t| !t.is_empty())
        .collect()
}

pub fn table_texts(document: &Document, index: usize) -> Vec<Vec<String>> {
    let table = document.table(index).expect("table exists");
    tbl::rows(table)
        .map(|row| {
            tbl::cells(row)
                .map(|cell| tbl::cell_text(cell).trim().to_string())
                .collect()
        })
        .collect()
}

pub fn header_texts(document: &Document) -> Vec<String> {
    document
        .header_footer_roots()
        .flat_map(|root| root.children_named(paragraph::PARAGRAPH))
        .map(paragraph::paragraph_text)
        .collect()
}

/// A small project plan: three headed sections, a table in the budget
/// section, and a bulleted deliverables list
pub fn project_plan() -> Vec<u8> {
    let docx = with_bullets(with_heading_styles(Docx::new()))
        .add_paragraph(heading("Overview"))
        .add_paragraph(text("This plan covers the migration of the billing system."))
        .add_paragraph(text("Work starts in the first quarter."))
        .add_paragraph(italic("Owners are listed in the appendix."))
        .add_paragraph(blank())
        .add_paragraph(heading("Budget"))
        .add_paragraph(text("Costs are estimated per phase."))
        .add_table(table(&[
            &["Phase", "Cost"],
            &["Design", "10"],
            &["Build", "40"],
            &["Launch", "5"],
        ]))
        .add_paragraph(heading("Deliverables"))
        .add_paragraph(bullet("Migration runbook"))
        .add_paragraph(bullet("Rollback procedure"));
    pack(docx)
}
