//! Style sheet lookup from `word/styles.xml`
//!
//! Paragraphs reference styles by id (`Heading1`) while heading detection and
//! stored metadata work with display names (`heading 1`). This maps between
//! the two.

use std::collections::HashMap;

use super::xml::XmlElement;

#[derive(Debug, Clone, Default)]
pub struct StyleSheet {
    names_by_id: HashMap<String, String>,
    default_paragraph: Option<String>,
}

impl StyleSheet {
    pub fn from_root(root: &XmlElement) -> Self {
        let mut sheet = StyleSheet::default();

        for style in root.children_named("w:style") {
            let Some(id) = style.attr("w:styleId") else {
                continue;
            };
            let name = style
                .child("w:name")
                .and_then(|n| n.attr("w:val"))
                .unwrap_or(id);
            sheet.names_by_id.insert(id.to_string(), name.to_string());

            let is_paragraph = style.attr("w:type") == Some("paragraph");
            let is_default = matches!(style.attr("w:default"), Some("1" | "true" | "on"));
            if is_paragraph && is_default {
                sheet.default_paragraph = Some(id.to_string());
            }
        }

        sheet
    }

    /// Display name for a style id, falling back to the id itself
    pub fn name_for_id<'a>(&'a self, id: &'a str) -> &'a str {
        self.names_by_id.get(id).map(String::as_str).unwrap_or(id)
    }

    /// Style name applied to a paragraph with the given `w:pStyle` value
    pub fn paragraph_style_name(&self, style_id: Option<&str>) -> Option<String> {
        match style_id {
            Some(id) => Some(self.name_for_id(id).to_string()),
            None => self
                .default_paragraph
                .as_deref()
                .map(|id| self.name_for_id(id).to_string()),
        }
    }

    /// Resolve a style name (or id) back to the id to write into `w:pStyle`
    pub fn id_for_name(&self, name: &str) -> Option<&str> {
        if self.names_by_id.contains_key(name) {
            return self.names_by_id.get_key_value(name).map(|(id, _)| id.as_str());
        }
        self.names_by_id
            .iter()
            .find(|(_, style_name)| style_name.eq_ignore_ascii_case(name))
            .map(|(id, _)| id.as_str())
    }

    pub fn is_default_paragraph(&self, id: &str) -> bool {
        self.default_paragraph.as_deref() == Some(id)
    }
}
