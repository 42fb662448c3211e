//! Heading detection and section inference
//!
//! Sections are found in one of two document-wide modes. When any paragraph
//! opens with dotted numbering (`4 Scope`, `5.1 Layout`) only such
//! paragraphs start sections; otherwise a formatting heuristic decides.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use super::formatting::capture_paragraph_format;
use super::models::{ParagraphMeta, Section};
use crate::document::paragraph;
use crate::document::xml::XmlElement;
use crate::document::Document;

static NUMBERED_HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+(\.\d+)*\s+").unwrap());
static NON_SLUG_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

pub(crate) const BULLET_GLYPHS: [char; 6] = ['•', '-', '*', '–', '—', '·'];

const HEADING_STYLE_TOKENS: [&str; 3] = ["heading", "title", "subtitle"];
const MAX_HEADING_CHARS: usize = 120;
const LARGE_FONT_PT: f32 = 13.5;

/// Formatting facts about one run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSnapshot {
    pub bold: bool,
    pub size_pt: Option<f32>,
}

/// What heading detection needs to know about a paragraph
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParagraphSnapshot {
    /// Trimmed paragraph text
    pub text: String,
    pub style_name: Option<String>,
    pub runs: Vec<RunSnapshot>,
}

impl ParagraphSnapshot {
    pub fn capture(document: &Document, p: &XmlElement) -> Self {
        Self {
            text: paragraph::paragraph_text(p).trim().to_string(),
            style_name: document.paragraph_style_name(p),
            runs: paragraph::runs(p)
                .map(|run| RunSnapshot {
                    bold: paragraph::is_bold(run),
                    size_pt: paragraph::font_size_pt(run),
                })
                .collect(),
        }
    }
}

/// Numbered-mode heading test on trimmed text
pub fn is_numbered_heading(text: &str) -> bool {
    NUMBERED_HEADING.is_match(text.trim())
}

/// Heuristic-mode heading test
pub fn looks_like_heading(snapshot: &ParagraphSnapshot) -> bool {
    let text = snapshot.text.as_str();
    if text.is_empty() {
        return false;
    }

    if let Some(style) = &snapshot.style_name {
        let style = style.to_lowercase();
        if HEADING_STYLE_TOKENS.iter().any(|token| style.contains(token)) {
            return true;
        }
    }

    if text.starts_with(BULLET_GLYPHS) {
        return false;
    }

    let word_count = text.split_whitespace().count();

    if text.chars().count() <= MAX_HEADING_CHARS && !snapshot.runs.is_empty() {
        let bold_runs = snapshot.runs.iter().filter(|run| run.bold).count();
        if bold_runs > 0 && bold_runs >= (snapshot.runs.len() / 2).max(1) {
            return true;
        }
        if snapshot.runs[0].bold && word_count <= 8 {
            return true;
        }
    }

    if snapshot
        .runs
        .first()
        .and_then(|run| run.size_pt)
        .is_some_and(|size| size >= LARGE_FONT_PT)
    {
        return true;
    }

    let (alpha, upper) = text
        .chars()
        .filter(|c| c.is_alphabetic())
        .fold((0usize, 0usize), |(alpha, upper), c| {
            (alpha + 1, upper + usize::from(c.is_uppercase()))
        });
    if alpha > 0 && upper as f64 / alpha as f64 > 0.7 && word_count <= 6 {
        return true;
    }

    text.ends_with(':') && word_count <= 8
}

/// Lowercase slug with non-alphanumeric runs collapsed to `_`
pub fn slugify(text: &str) -> String {
    let lowered = text.trim().to_lowercase();
    let slug = NON_SLUG_CHARS.replace_all(&lowered, "_");
    let slug = slug.trim_matches('_');
    if slug.is_empty() {
        "section".to_string()
    } else {
        slug.to_string()
    }
}

fn unique_id(candidate: String, seen: &mut HashSet<String>) -> String {
    let mut unique = candidate.clone();
    let mut counter = 2;
    while seen.contains(&unique) {
        unique = format!("{candidate}_{counter}");
        counter += 1;
    }
    seen.insert(unique.clone());
    unique
}

/// Find section headings and compute each section's trimmed content range,
/// capturing formatting for every paragraph inside it
pub fn infer_sections(document: &Document) -> Vec<Section> {
    let paragraphs: Vec<&XmlElement> = document.paragraphs().collect();
    let texts: Vec<String> = paragraphs
        .iter()
        .map(|p| paragraph::paragraph_text(p).trim().to_string())
        .collect();

    let numbered_mode = texts.iter().any(|text| is_numbered_heading(text));
    log::debug!(
        "Inferring sections over {} paragraphs ({} mode)",
        paragraphs.len(),
        if numbered_mode { "numbered" } else { "heuristic" }
    );

    let mut seen = HashSet::new();
    let mut headings: Vec<(usize, String, String)> = Vec::new();
    for (index, p) in paragraphs.iter().enumerate() {
        let is_heading = if numbered_mode {
            is_numbered_heading(&texts[index])
        } else {
            looks_like_heading(&ParagraphSnapshot::capture(document, p))
        };
        if !is_heading {
            continue;
        }
        let heading = texts[index].clone();
        let id = unique_id(slugify(&heading), &mut seen);
        headings.push((index, id, heading));
    }

    let total = paragraphs.len();
    headings
        .iter()
        .enumerate()
        .map(|(i, (heading_index, id, heading))| {
            let mut start = heading_index + 1;
            let mut end = headings.get(i + 1).map_or(total, |next| next.0);

            while start < end && texts[start].is_empty() {
                start += 1;
            }
            while end > start && texts[end - 1].is_empty() {
                end -= 1;
            }

            let metas = (start..end)
                .map(|index| ParagraphMeta {
                    index,
                    format: capture_paragraph_format(document.styles(), paragraphs[index]),
                })
                .collect();
            let default_text = texts[start..end]
                .iter()
                .filter(|text| !text.is_empty())
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join("\n\n");

            Section {
                id: id.clone(),
                heading: heading.clone(),
                heading_index: *heading_index,
                content_start: start,
                content_end: end,
                paragraphs: metas,
                default_text,
            }
        })
        .collect()
}
