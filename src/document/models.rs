//! In-memory word-processing document
//!
//! A `Document` owns one loaded package. The body is kept detached from the
//! main part so paragraph and table edits work on it directly; it is spliced
//! back into `w:document` when the package is serialized.

use super::paragraph::{self, PARAGRAPH};
use super::styles::StyleSheet;
use super::table::TABLE;
use super::xml::{XmlElement, XmlNode, XmlPart};

pub(crate) const SECTION_PROPERTIES: &str = "w:sectPr";

/// Position of a body-level element, expressed in the paragraph or table
/// sequence it belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyItem {
    Paragraph(usize),
    Table(usize),
    Other,
}

#[derive(Debug, Clone)]
pub(crate) struct PackageEntry {
    pub(crate) name: String,
    pub(crate) data: Vec<u8>,
    pub(crate) compression: zip::CompressionMethod,
}

/// Header or footer part that parsed cleanly
#[derive(Debug, Clone)]
pub(crate) struct AuxiliaryPart {
    pub(crate) entry: usize,
    pub(crate) part: XmlPart,
}

#[derive(Debug, Clone)]
pub struct Document {
    pub(crate) entries: Vec<PackageEntry>,
    /// `word/document.xml` with the body taken out
    pub(crate) main: XmlPart,
    pub(crate) main_entry: usize,
    pub(crate) body: XmlElement,
    pub(crate) body_slot: usize,
    pub(crate) auxiliary: Vec<AuxiliaryPart>,
    pub(crate) styles: StyleSheet,
}

impl Document {
    pub fn styles(&self) -> &StyleSheet {
        &self.styles
    }

    /// Body-level paragraphs in document order
    pub fn paragraphs(&self) -> impl Iterator<Item = &XmlElement> {
        self.body.children_named(PARAGRAPH)
    }

    pub fn paragraph_count(&self) -> usize {
        self.body.count_named(PARAGRAPH)
    }

    pub fn paragraph(&self, index: usize) -> Option<&XmlElement> {
        self.paragraphs().nth(index)
    }

    pub fn paragraph_mut(&mut self, index: usize) -> Option<&mut XmlElement> {
        self.body.children_named_mut(PARAGRAPH).nth(index)
    }

    /// Resolved style name of a paragraph (default paragraph style when unset)
    pub fn paragraph_style_name(&self, paragraph: &XmlElement) -> Option<String> {
        self.styles
            .paragraph_style_name(paragraph::style_id(paragraph))
    }

    /// Remove the body paragraph at `index`; returns false when out of range
    pub fn remove_paragraph(&mut self, index: usize) -> bool {
        self.body.remove_named(PARAGRAPH, index).is_some()
    }

    /// Insert `new` directly after the paragraph at `index` and return the
    /// new paragraph's index, or `None` when `index` is out of range
    pub fn insert_paragraph_after(&mut self, index: usize, new: XmlElement) -> Option<usize> {
        let pos = self.body.position_of(PARAGRAPH, index)?;
        self.body.children.insert(pos + 1, XmlNode::Element(new));
        Some(index + 1)
    }

    /// Insert `new` so that it becomes paragraph `index`; appends when
    /// `index` is past the last paragraph
    pub fn insert_paragraph_before(&mut self, index: usize, new: XmlElement) -> usize {
        match self.body.position_of(PARAGRAPH, index) {
            Some(pos) => {
                self.body.children.insert(pos, XmlNode::Element(new));
                index
            }
            None => self.append_paragraph(new),
        }
    }

    /// Append a paragraph at the end of the body, ahead of the trailing
    /// section properties, and return its index
    pub fn append_paragraph(&mut self, new: XmlElement) -> usize {
        let pos = self
            .body
            .children
            .iter()
            .rposition(|node| matches!(node, XmlNode::Element(el) if el.is(SECTION_PROPERTIES)))
            .unwrap_or(self.body.children.len());
        self.body.children.insert(pos, XmlNode::Element(new));
        self.paragraph_count() - 1
    }

    pub fn tables(&self) -> impl Iterator<Item = &XmlElement> {
        self.body.children_named(TABLE)
    }

    pub fn table_count(&self) -> usize {
        self.body.count_named(TABLE)
    }

    pub fn table(&self, index: usize) -> Option<&XmlElement> {
        self.tables().nth(index)
    }

    pub fn table_mut(&mut self, index: usize) -> Option<&mut XmlElement> {
        self.body.children_named_mut(TABLE).nth(index)
    }

    /// Body children as positions in the paragraph/table sequences
    pub fn body_items(&self) -> Vec<BodyItem> {
        let mut paragraphs = 0;
        let mut tables = 0;
        self.body
            .elements()
            .map(|el| match el.name.as_str() {
                PARAGRAPH => {
                    paragraphs += 1;
                    BodyItem::Paragraph(paragraphs - 1)
                }
                TABLE => {
                    tables += 1;
                    BodyItem::Table(tables - 1)
                }
                _ => BodyItem::Other,
            })
            .collect()
    }

    /// Root elements of every header and footer part
    pub fn header_footer_roots(&self) -> impl Iterator<Item = &XmlElement> {
        self.auxiliary.iter().map(|aux| &aux.part.root)
    }

    pub fn header_footer_roots_mut(&mut self) -> impl Iterator<Item = &mut XmlElement> {
        self.auxiliary.iter_mut().map(|aux| &mut aux.part.root)
    }
}
