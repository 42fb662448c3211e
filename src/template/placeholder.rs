//! Inline `{{identifier}}` substitution
//!
//! Placeholders are found in body paragraphs, table cells, and header and
//! footer parts. Only scalar values are substituted; structured values
//! belong to the field application engine.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::Value;

use super::formatting::{capture_paragraph_format, replace_paragraph_text};
use super::models::FieldValues;
use crate::document::paragraph::{self, PARAGRAPH};
use crate::document::xml::{XmlElement, XmlNode};
use crate::document::{Document, StyleSheet};

pub static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{\s*([a-zA-Z0-9_.-]+)\s*\}\}").unwrap());

/// Visit every paragraph under `root` without descending into paragraphs
fn visit_paragraphs<'a>(root: &'a XmlElement, found: &mut Vec<&'a XmlElement>) {
    for el in root.elements() {
        if el.is(PARAGRAPH) {
            found.push(el);
        } else {
            visit_paragraphs(el, found);
        }
    }
}

fn visit_paragraphs_mut(root: &mut XmlElement, f: &mut dyn FnMut(&mut XmlElement)) {
    for node in root.children.iter_mut() {
        if let XmlNode::Element(el) = node {
            if el.is(PARAGRAPH) {
                f(el);
            } else {
                visit_paragraphs_mut(el, f);
            }
        }
    }
}

/// Sorted, de-duplicated placeholder identifiers used anywhere in the document
pub fn extract_placeholders(document: &Document) -> Vec<String> {
    let mut paragraphs = Vec::new();
    visit_paragraphs(&document.body, &mut paragraphs);
    for root in document.header_footer_roots() {
        visit_paragraphs(root, &mut paragraphs);
    }

    let found: BTreeSet<String> = paragraphs
        .into_iter()
        .flat_map(|p| {
            let text = paragraph::paragraph_text(p);
            PLACEHOLDER
                .captures_iter(&text)
                .map(|caps| caps[1].to_string())
                .collect::<Vec<_>>()
        })
        .collect();
    found.into_iter().collect()
}

/// Replacement text for a placeholder, or `None` to leave it in place
fn replacement(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => Some(String::new()),
        Value::String(s) => Some(s.clone()),
        Value::Array(_) | Value::Object(_) => None,
        other => Some(other.to_string()),
    }
}

/// Substitute placeholders in `text`; `None` when nothing changed
pub fn substitute(text: &str, values: &FieldValues) -> Option<String> {
    let mut changed = false;
    let result = PLACEHOLDER.replace_all(text, |caps: &Captures| match replacement(values.get(&caps[1])) {
        Some(value) => {
            changed = true;
            value
        }
        None => caps[0].to_string(),
    });
    changed.then(|| result.into_owned())
}

fn replace_in_paragraph(p: &mut XmlElement, styles: &StyleSheet, values: &FieldValues) -> bool {
    let text = paragraph::paragraph_text(p);
    let Some(new_text) = substitute(&text, values) else {
        return false;
    };
    let format = capture_paragraph_format(styles, p);
    replace_paragraph_text(p, styles, &new_text, &format);
    true
}

/// Replace placeholders with scalar values everywhere; returns how many
/// paragraphs were rewritten
pub fn replace_placeholders(document: &mut Document, values: &FieldValues) -> usize {
    if values.is_empty() {
        return 0;
    }
    let styles = document.styles().clone();
    let mut rewritten = 0;
    let mut replace = |p: &mut XmlElement| {
        if replace_in_paragraph(p, &styles, values) {
            rewritten += 1;
        }
    };

    visit_paragraphs_mut(&mut document.body, &mut replace);
    for root in document.header_footer_roots_mut() {
        visit_paragraphs_mut(root, &mut replace);
    }

    log::debug!("Placeholder substitution rewrote {rewritten} paragraphs");
    rewritten
}
