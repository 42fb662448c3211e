//! Splitting a free-text value into paragraph blocks

use once_cell::sync::Lazy;
use regex::Regex;

use crate::template::heading::BULLET_GLYPHS;

static DOTTED_HEADING_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+(?:\.\d+)+\s+").unwrap());
static SIMPLE_NUMBERED_ITEM: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+[\.\)]\s+").unwrap());
static BLOCK_SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{2,}").unwrap());
static LEADING_GLYPHS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[\u{2022}\u{2023}\u{25E6}\u{2043}\u{2219}\u{00B7}\-\*\u{2013}\u{2014}\.\)\s]+")
        .unwrap()
});

/// Strip leading bullet glyphs and list punctuation
pub fn clean_bullet_text(text: &str) -> String {
    LEADING_GLYPHS.replace(text.trim(), "").trim().to_string()
}

/// `true` when the text opens with a bullet glyph or `1.` / `1)` numbering
pub fn text_looks_like_list_item(text: &str) -> bool {
    let stripped = text.trim();
    if stripped.is_empty() {
        return false;
    }
    stripped.starts_with(BULLET_GLYPHS) || SIMPLE_NUMBERED_ITEM.is_match(stripped)
}

/// A line that reads like a sub-heading typed into plain text
fn line_is_section_heading(line: &str) -> bool {
    let stripped = line.trim();
    if stripped.is_empty() || stripped.starts_with(BULLET_GLYPHS) {
        return false;
    }
    if DOTTED_HEADING_LINE.is_match(stripped) {
        return true;
    }
    let alpha_words: Vec<&str> = stripped
        .split_whitespace()
        .filter(|word| word.chars().next().is_some_and(char::is_alphabetic))
        .collect();
    (2..=8).contains(&alpha_words.len())
        && alpha_words
            .iter()
            .all(|word| word.chars().next().is_some_and(char::is_uppercase))
}

/// Insert a blank line ahead of every sub-heading line that directly
/// follows a non-blank line
pub fn ensure_section_breaks(text: &str) -> String {
    let mut rebuilt: Vec<&str> = Vec::new();
    for line in text.split('\n') {
        let previous_filled = rebuilt.last().is_some_and(|prev| !prev.trim().is_empty());
        if previous_filled && line_is_section_heading(line) {
            rebuilt.push("");
        }
        rebuilt.push(line);
    }
    rebuilt.join("\n")
}

/// Split on blank lines. With a known target count, fall back to one block
/// per non-blank line when that reaches the target, then pad with empty
/// blocks. Never truncates.
pub fn split_paragraph_blocks(text: &str, target: Option<usize>) -> Vec<String> {
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    let normalized = ensure_section_breaks(&normalized);
    let target = target.filter(|count| *count > 0);

    let mut blocks: Vec<String> = if normalized.trim().is_empty() {
        vec![String::new()]
    } else {
        BLOCK_SEPARATOR
            .split(&normalized)
            .map(|block| block.trim().to_string())
            .collect()
    };

    if let Some(target) = target {
        if blocks.len() < target {
            let lines: Vec<String> = normalized
                .split('\n')
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect();
            if lines.len() >= target {
                blocks = lines;
            }
        }
        if blocks.len() < target {
            blocks.resize(target, String::new());
        }
    }

    if blocks.is_empty() {
        blocks.push(String::new());
    }
    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_item_detection() {
        assert!(text_looks_like_list_item("• first"));
        assert!(text_looks_like_list_item("  - dash"));
        assert!(text_looks_like_list_item("3) third"));
        assert!(text_looks_like_list_item("12. twelfth"));
        assert!(!text_looks_like_list_item("2024 was a year"));
        assert!(!text_looks_like_list_item("Plain sentence."));
        assert!(!text_looks_like_list_item("   "));
    }

    #[test]
    fn test_clean_bullet_text() {
        assert_eq!(clean_bullet_text("•  Item one"), "Item one");
        assert_eq!(clean_bullet_text(" - * nested"), "nested");
        assert_eq!(clean_bullet_text("– dash item"), "dash item");
        assert_eq!(clean_bullet_text("No glyph"), "No glyph");
    }

    #[test]
    fn test_section_breaks_before_embedded_headings() {
        let text = "Intro sentence here.\nProject Timeline\nmore text follows\n1.2 Sub item";
        assert_eq!(
            ensure_section_breaks(text),
            "Intro sentence here.\n\nProject Timeline\nmore text follows\n\n1.2 Sub item"
        );
        // already separated
        assert_eq!(ensure_section_breaks("a\n\nNext Part"), "a\n\nNext Part");
        // bullets never count as headings
        assert_eq!(ensure_section_breaks("x\n• Big Bold Words"), "x\n• Big Bold Words");
    }

    #[test]
    fn test_split_on_blank_lines() {
        assert_eq!(
            split_paragraph_blocks("one\n\n\ntwo\r\n\r\nthree", None),
            vec!["one", "two", "three"]
        );
        assert_eq!(split_paragraph_blocks("", None), vec![""]);
        assert_eq!(split_paragraph_blocks("  \n ", Some(2)), vec!["", ""]);
    }

    #[test]
    fn test_split_falls_back_to_lines_when_target_reached() {
        assert_eq!(
            split_paragraph_blocks("- a\n- b\n- c", Some(3)),
            vec!["- a", "- b", "- c"]
        );
        // too few lines to reach the target: keep blocks and pad
        assert_eq!(
            split_paragraph_blocks("- a\n- b", Some(3)),
            vec!["- a\n- b", "", ""]
        );
    }

    #[test]
    fn test_split_never_truncates() {
        assert_eq!(
            split_paragraph_blocks("a\n\nb\n\nc\n\nd\n\ne", Some(3)).len(),
            5
        );
    }
}
