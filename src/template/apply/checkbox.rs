//! Checkbox groups: each option is one paragraph that is kept (and
//! optionally re-worded) when selected and deleted otherwise

use std::collections::HashMap;

use serde_json::Value;

use super::scalar_text;
use crate::document::Document;
use crate::template::formatting::{apply_style, capture_paragraph_format, replace_paragraph_text};
use crate::template::models::CheckboxOption;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Choice {
    selected: bool,
    text: String,
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Accepts `[{value, selected, text?}]` entries or bare selected values
fn parse_choices(value: &Value) -> HashMap<String, Choice> {
    let Value::Array(entries) = value else {
        return HashMap::new();
    };
    entries
        .iter()
        .filter_map(|entry| match entry {
            Value::Object(map) => map.get("value").map(|key| {
                let choice = Choice {
                    selected: map.get("selected").is_some_and(truthy),
                    text: map.get("text").map(scalar_text).unwrap_or_default(),
                };
                (scalar_text(key), choice)
            }),
            Value::String(key) => Some((
                key.clone(),
                Choice {
                    selected: true,
                    text: String::new(),
                },
            )),
            _ => None,
        })
        .collect()
}

pub fn apply_checkbox_field(document: &mut Document, options: &[CheckboxOption], value: &Value) {
    let styles = document.styles().clone();
    let choices = parse_choices(value);

    let mut ordered: Vec<&CheckboxOption> = options.iter().collect();
    ordered.sort_by(|a, b| b.paragraph_index.cmp(&a.paragraph_index));

    for option in ordered {
        let index = option.paragraph_index;
        let Some(paragraph) = document.paragraph_mut(index) else {
            log::debug!("Checkbox option {:?} points past the document", option.value);
            continue;
        };

        if let Some(style) = option.style.as_deref().filter(|s| !s.is_empty()) {
            apply_style(paragraph, &styles, style);
        }

        let choice = choices.get(&option.value);
        if choice.is_some_and(|c| !c.selected) {
            document.remove_paragraph(index);
            continue;
        }

        let text = choice
            .map(|c| c.text.as_str())
            .filter(|t| !t.is_empty())
            .unwrap_or(option.text.as_str());
        let format = capture_paragraph_format(&styles, paragraph);
        replace_paragraph_text(paragraph, &styles, text, &format);
    }
}
