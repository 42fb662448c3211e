//! Writes a few sample templates for trying out doxfill by hand
//!
//! Usage: generate_sample_templates [OUTPUT_DIR]

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use docx_rs::*;

fn text(value: &str) -> Paragraph {
    Paragraph::new().add_run(Run::new().add_text(value))
}

fn heading(value: &str) -> Paragraph {
    text(value).style("Heading1")
}

fn bullet(value: &str) -> Paragraph {
    text(value).numbering(NumberingId::new(1), IndentLevel::new(0))
}

fn table(rows: &[&[&str]]) -> Table {
    Table::new(
        rows.iter()
            .map(|row| {
                TableRow::new(
                    row.iter()
                        .map(|cell| {
                            TableCell::new()
                                .width(3000, WidthType::Dxa)
                                .add_paragraph(text(cell))
                        })
                        .collect(),
                )
            })
            .collect(),
    )
}

fn base_document() -> Docx {
    let bullet_level = Level::new(
        0,
        Start::new(1),
        NumberFormat::new("bullet"),
        LevelText::new("•"),
        LevelJc::new("left"),
    )
    .indent(Some(720), Some(SpecialIndentType::Hanging(360)), None, None);

    Docx::new()
        .add_style(
            Style::new("Heading1", StyleType::Paragraph)
                .name("Heading 1")
                .size(32)
                .bold(),
        )
        .add_abstract_numbering(AbstractNumbering::new(1).add_level(bullet_level))
        .add_numbering(Numbering::new(1, 1))
}

/// Headed sections with a budget table and a bulleted list
fn project_plan() -> Docx {
    base_document()
        .header(Header::new().add_paragraph(text("Project plan for {{client}}")))
        .add_paragraph(heading("Overview"))
        .add_paragraph(text("Summarize the goals of the project here."))
        .add_paragraph(text("Describe who is involved and when work starts."))
        .add_paragraph(heading("Budget"))
        .add_paragraph(text("Costs are estimated per phase."))
        .add_table(table(&[
            &["Phase", "Cost", "Owner"],
            &["Design", "10", "{{owner}}"],
            &["Build", "40", "{{owner}}"],
        ]))
        .add_paragraph(heading("Deliverables"))
        .add_paragraph(bullet("Migration runbook"))
        .add_paragraph(bullet("Rollback procedure"))
        .add_paragraph(bullet("Training material"))
}

/// Numbered headings typed into the text, as in many statements of work
fn statement_of_work() -> Docx {
    base_document()
        .add_paragraph(text("1 Purpose"))
        .add_paragraph(text("State why the work is needed."))
        .add_paragraph(text("2 Scope"))
        .add_paragraph(text("List what is included."))
        .add_paragraph(text("List what is excluded."))
        .add_paragraph(text("2.1 Assumptions"))
        .add_paragraph(text("Record assumptions made while scoping."))
        .add_paragraph(text("3 Acceptance"))
        .add_paragraph(text("Signed by {{approver}} on {{date}}."))
}

fn write(dir: &Path, name: &str, docx: Docx) -> Result<()> {
    let mut buffer = Vec::new();
    docx.build()
        .pack(&mut Cursor::new(&mut buffer))
        .with_context(|| format!("Failed to pack {name}"))?;
    let path = dir.join(name);
    fs::write(&path, buffer).with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Wrote {}", path.display());
    Ok(())
}

fn main() -> Result<()> {
    let dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("samples"));
    fs::create_dir_all(&dir)?;

    write(&dir, "project_plan.docx", project_plan())?;
    write(&dir, "statement_of_work.docx", statement_of_work())?;
    Ok(())
}
