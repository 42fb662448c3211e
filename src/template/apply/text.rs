//! Free-text region rewriting for section and text fields

use super::blocks::{clean_bullet_text, split_paragraph_blocks, text_looks_like_list_item};
use super::plan::{EditOp, EditPlan};
use crate::document::paragraph::{self, new_paragraph};
use crate::document::Document;
use crate::template::formatting::{
    build_paragraph, capture_paragraph_format, replace_paragraph_text,
};
use crate::template::models::{ParagraphFormat, ParagraphMeta, Section};

/// Paragraph range to rewrite plus the formatting captured for it
#[derive(Debug, Clone, Copy)]
pub struct TextRegion<'a> {
    pub start: usize,
    pub end: usize,
    pub heading_index: Option<usize>,
    pub paragraphs: &'a [ParagraphMeta],
}

impl<'a> From<&'a Section> for TextRegion<'a> {
    fn from(section: &'a Section) -> Self {
        Self {
            start: section.content_start,
            end: section.content_end,
            heading_index: Some(section.heading_index),
            paragraphs: &section.paragraphs,
        }
    }
}

/// A block ready to be written: final text and the formatting to restore
#[derive(Debug, Clone)]
struct PlannedBlock {
    text: String,
    format: ParagraphFormat,
}

/// Blocks past the captured metas reuse the last one. A plain block only
/// loses the numbering splice; numbering inside the paragraph properties
/// travels with them.
fn plan_block(index: usize, block: &str, metas: &[ParagraphMeta], fallback: &ParagraphFormat) -> PlannedBlock {
    let mut format = metas
        .get(index)
        .or_else(|| metas.last())
        .map_or_else(|| fallback.clone(), |meta| meta.format.clone());

    let had_numbering = format.list_properties.is_some();
    if had_numbering && !text_looks_like_list_item(block) {
        format.list_properties = None;
    }

    let text = if had_numbering {
        clean_bullet_text(block)
    } else {
        block.to_string()
    };

    PlannedBlock { text, format }
}

/// Resolve the region against the live document, creating a paragraph to
/// write into when the range is empty or out of bounds
fn resolve_range(document: &mut Document, region: &TextRegion) -> (usize, usize) {
    if document.paragraph_count() == 0 {
        let start = document.append_paragraph(new_paragraph());
        return (start, start + 1);
    }
    let count = document.paragraph_count();
    let heading = region.heading_index.filter(|h| *h < count);

    if region.start >= count || region.start >= region.end {
        let start = match heading {
            Some(h) => document
                .insert_paragraph_after(h, new_paragraph())
                .unwrap_or_else(|| document.append_paragraph(new_paragraph())),
            None if region.start >= count => document.append_paragraph(new_paragraph()),
            None => document.insert_paragraph_before(region.start, new_paragraph()),
        };
        return (start, start + 1);
    }

    let end = region.end.max(region.start + 1).min(count);
    (region.start, end)
}

/// Rewrite a paragraph range so it holds exactly the blocks of `text`,
/// reusing captured formatting block by block
pub fn apply_text_region(document: &mut Document, region: TextRegion, text: &str) {
    let styles = document.styles().clone();
    let (start, end) = resolve_range(document, &region);

    let target = (!region.paragraphs.is_empty()).then_some(region.paragraphs.len());
    let blocks = split_paragraph_blocks(text, target);

    let fallback = document
        .paragraph(start)
        .map(|p| capture_paragraph_format(&styles, p))
        .unwrap_or_default();
    let planned: Vec<PlannedBlock> = blocks
        .iter()
        .enumerate()
        .map(|(i, block)| plan_block(i, block, region.paragraphs, &fallback))
        .collect();

    log::debug!(
        "Rewriting paragraphs {start}..{end} with {} blocks (target {:?})",
        planned.len(),
        target
    );

    if let Some(primary) = document.paragraph_mut(start) {
        let original = paragraph::paragraph_text(primary).trim().to_string();
        let first = planned[0].text.trim();
        let unchanged = matches!(target, None | Some(1)) && !first.is_empty() && first == original;
        if !unchanged {
            replace_paragraph_text(primary, &styles, &planned[0].text, &planned[0].format);
        }
    }

    for op in EditPlan::for_region(start, end, planned.len()).ops() {
        match *op {
            EditOp::Delete { index } => {
                document.remove_paragraph(index);
            }
            EditOp::InsertAfter { anchor, block } => {
                let planned = &planned[block];
                let p = build_paragraph(&styles, &planned.text, &planned.format);
                if document.insert_paragraph_after(anchor, p).is_none() {
                    log::warn!("Paragraph {anchor} vanished while inserting block {block}");
                }
            }
        }
    }
}

/// Replace a section's body text
pub fn replace_section_content(document: &mut Document, section: &Section, text: &str) {
    apply_text_region(document, TextRegion::from(section), text);
}
