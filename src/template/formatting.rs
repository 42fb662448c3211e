//! Formatting capture and restore primitives
//!
//! Paragraph and numbering properties travel as opaque blobs: the `w:pPr` /
//! `w:numPr` element serialized verbatim at capture time and spliced back
//! unchanged. Run formatting is captured attribute by attribute and restored
//! best-effort; a value that does not resolve to a known OOXML enumeration
//! member is skipped and the rest still applies.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::models::{FontColor, ParagraphFormat, RunFormat};
use crate::document::paragraph::{self, PARAGRAPH_PROPERTIES};
use crate::document::xml::{XmlElement, XmlNode};
use crate::document::StyleSheet;

static BOLD_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\*\*(.+?)\*\*|__(.+?)__").unwrap());

/// Schema order of `w:rPr` children; Word rejects out-of-order properties
const RUN_PROPERTY_ORDER: &[&str] = &[
    "w:rStyle", "w:rFonts", "w:b", "w:bCs", "w:i", "w:iCs", "w:caps", "w:smallCaps",
    "w:strike", "w:dstrike", "w:outline", "w:shadow", "w:emboss", "w:imprint",
    "w:noProof", "w:snapToGrid", "w:vanish", "w:webHidden", "w:color", "w:spacing",
    "w:w", "w:kern", "w:position", "w:sz", "w:szCs", "w:highlight", "w:u", "w:effect",
    "w:bdr", "w:shd", "w:fitText", "w:vertAlign", "w:rtl", "w:cs", "w:em", "w:lang",
    "w:eastAsianLayout", "w:specVanish", "w:oMath",
];

/// Schema order of `w:pPr` children
const PARAGRAPH_PROPERTY_ORDER: &[&str] = &[
    "w:pStyle", "w:keepNext", "w:keepLines", "w:pageBreakBefore", "w:framePr",
    "w:widowControl", "w:numPr", "w:suppressLineNumbers", "w:pBdr", "w:shd", "w:tabs",
    "w:suppressAutoHyphens", "w:kinsoku", "w:wordWrap", "w:overflowPunct",
    "w:topLinePunct", "w:autoSpaceDE", "w:autoSpaceDN", "w:bidi", "w:adjustRightInd",
    "w:snapToGrid", "w:spacing", "w:ind", "w:contextualSpacing", "w:mirrorIndents",
    "w:suppressOverlap", "w:jc", "w:textDirection", "w:textAlignment",
    "w:textboxTightWrap", "w:outlineLvl", "w:divId", "w:cnfStyle", "w:rPr", "w:sectPr",
    "w:pPrChange",
];

const THEME_COLORS: &[&str] = &[
    "dark1", "light1", "dark2", "light2", "accent1", "accent2", "accent3", "accent4",
    "accent5", "accent6", "hyperlink", "followedHyperlink", "none", "background1",
    "text1", "background2", "text2",
];

const HIGHLIGHT_COLORS: &[&str] = &[
    "black", "blue", "cyan", "green", "magenta", "red", "yellow", "white", "darkBlue",
    "darkCyan", "darkGreen", "darkMagenta", "darkRed", "darkYellow", "darkGray",
    "lightGray", "none",
];

const UNDERLINE_STYLES: &[&str] = &[
    "single", "words", "double", "thick", "dotted", "dottedHeavy", "dash", "dashedHeavy",
    "dashLong", "dashLongHeavy", "dotDash", "dashDotHeavy", "dotDotDash",
    "dashDotDotHeavy", "wave", "wavyHeavy", "wavyDouble", "none",
];

/// Serialized `w:pPr` or `w:numPr` element, stored and replayed verbatim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyBlob(String);

impl PropertyBlob {
    fn capture(element: &XmlElement) -> Option<Self> {
        match element.to_xml_string() {
            Ok(xml) => Some(PropertyBlob(xml)),
            Err(e) => {
                log::warn!("Could not capture {}: {e}", element.name);
                None
            }
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn parse(&self) -> Option<XmlElement> {
        match XmlElement::parse_fragment(&self.0) {
            Ok(el) => Some(el),
            Err(e) => {
                log::warn!("Skipping unparseable property blob: {e}");
                None
            }
        }
    }
}

pub fn capture_paragraph_properties(paragraph: &XmlElement) -> Option<PropertyBlob> {
    paragraph::paragraph_properties(paragraph).and_then(PropertyBlob::capture)
}

pub fn capture_list_properties(paragraph: &XmlElement) -> Option<PropertyBlob> {
    paragraph::numbering_properties(paragraph).and_then(PropertyBlob::capture)
}

/// Approximate run formatting from the paragraph's first run
pub fn capture_run_format(paragraph: &XmlElement) -> RunFormat {
    let mut format = RunFormat::default();
    let Some(run) = paragraph::runs(paragraph).next() else {
        return format;
    };

    format.bold = paragraph::toggle(run, "w:b");
    format.italic = paragraph::toggle(run, "w:i");
    format.font_size_pt = paragraph::font_size_pt(run);

    let Some(rpr) = paragraph::run_properties(run) else {
        return format;
    };
    format.underline = rpr
        .child("w:u")
        .map(|u| u.attr("w:val").unwrap_or("single").to_string());
    format.font_name = rpr
        .child("w:rFonts")
        .and_then(|fonts| fonts.attr("w:ascii").or_else(|| fonts.attr("w:hAnsi")))
        .map(str::to_string);
    format.font_color = rpr.child("w:color").and_then(|color| {
        if let Some(theme) = color.attr("w:themeColor") {
            return Some(FontColor::Theme(theme.to_string()));
        }
        color
            .attr("w:val")
            .filter(|val| !val.eq_ignore_ascii_case("auto"))
            .map(|val| FontColor::Rgb(val.to_string()))
    });
    format.highlight = rpr
        .child("w:highlight")
        .and_then(|h| h.attr("w:val"))
        .map(str::to_string);
    format
}

/// Snapshot everything needed to restyle a paragraph like `paragraph`
pub fn capture_paragraph_format(styles: &StyleSheet, paragraph: &XmlElement) -> ParagraphFormat {
    ParagraphFormat {
        style: styles.paragraph_style_name(paragraph::style_id(paragraph)),
        paragraph_properties: capture_paragraph_properties(paragraph),
        list_properties: capture_list_properties(paragraph),
        run_format: capture_run_format(paragraph),
    }
}

/// Replace the paragraph's `w:pPr` with the captured one
pub fn apply_paragraph_properties(paragraph: &mut XmlElement, blob: &PropertyBlob) {
    let Some(ppr) = blob.parse() else {
        return;
    };
    paragraph.remove_all_named(PARAGRAPH_PROPERTIES);
    paragraph.children.insert(0, XmlNode::Element(ppr));
}

/// Splice the captured `w:numPr` into the paragraph, replacing any existing one
pub fn apply_list_properties(paragraph: &mut XmlElement, blob: &PropertyBlob) {
    let Some(numpr) = blob.parse() else {
        return;
    };
    let ppr = paragraph::ensure_paragraph_properties(paragraph);
    set_ordered_child(ppr, numpr, PARAGRAPH_PROPERTY_ORDER);
}

/// Point the paragraph at a named style; unknown names are skipped
pub fn apply_style(paragraph: &mut XmlElement, styles: &StyleSheet, name: &str) {
    match styles.id_for_name(name) {
        Some(id) if styles.is_default_paragraph(id) => paragraph::set_style_id(paragraph, None),
        Some(id) => {
            let id = id.to_string();
            paragraph::set_style_id(paragraph, Some(&id));
        }
        None => log::debug!("Style {name:?} not found in style sheet; leaving paragraph style"),
    }
}

/// Restore paragraph properties, style and numbering. The numbering state
/// after this call follows `format.list_properties` only when it is set;
/// otherwise whatever the paragraph properties carried is kept.
pub fn apply_paragraph_format(
    paragraph: &mut XmlElement,
    styles: &StyleSheet,
    format: &ParagraphFormat,
) {
    if let Some(ppr) = &format.paragraph_properties {
        apply_paragraph_properties(paragraph, ppr);
    }
    if let Some(style) = &format.style {
        apply_style(paragraph, styles, style);
    }
    if let Some(numpr) = &format.list_properties {
        apply_list_properties(paragraph, numpr);
    }
}

/// Apply captured attributes to a run, skipping any that do not resolve
pub fn apply_run_format(run: &mut XmlElement, format: &RunFormat) {
    if format.is_empty() {
        return;
    }
    let rpr = paragraph::ensure_run_properties(run);

    if let Some(bold) = format.bold {
        set_toggle(rpr, "w:b", bold);
    }
    if let Some(italic) = format.italic {
        set_toggle(rpr, "w:i", italic);
    }
    if let Some(underline) = &format.underline {
        if UNDERLINE_STYLES.contains(&underline.as_str()) {
            let u = XmlElement::new("w:u").with_attr("w:val", underline.as_str());
            set_ordered_child(rpr, u, RUN_PROPERTY_ORDER);
        } else {
            log::debug!("Skipping unknown underline style {underline:?}");
        }
    }
    if let Some(font) = format.font_name.as_deref().filter(|f| !f.is_empty()) {
        let fonts = XmlElement::new("w:rFonts")
            .with_attr("w:ascii", font)
            .with_attr("w:hAnsi", font);
        set_ordered_child(rpr, fonts, RUN_PROPERTY_ORDER);
    }
    if let Some(size) = format.font_size_pt {
        if size.is_finite() && size > 0.0 {
            let half_points = (size * 2.0).round() as u32;
            let sz = XmlElement::new("w:sz").with_attr("w:val", half_points.to_string());
            set_ordered_child(rpr, sz, RUN_PROPERTY_ORDER);
        } else {
            log::debug!("Skipping invalid font size {size}");
        }
    }
    match &format.font_color {
        Some(FontColor::Rgb(rgb)) if is_hex_color(rgb) => {
            let color = XmlElement::new("w:color").with_attr("w:val", rgb.to_ascii_uppercase());
            set_ordered_child(rpr, color, RUN_PROPERTY_ORDER);
        }
        Some(FontColor::Theme(theme)) if THEME_COLORS.contains(&theme.as_str()) => {
            let color = XmlElement::new("w:color")
                .with_attr("w:val", "000000")
                .with_attr("w:themeColor", theme.as_str());
            set_ordered_child(rpr, color, RUN_PROPERTY_ORDER);
        }
        Some(other) => log::debug!("Skipping unresolvable font color {other:?}"),
        None => {}
    }
    if let Some(highlight) = &format.highlight {
        if HIGHLIGHT_COLORS.contains(&highlight.as_str()) {
            let h = XmlElement::new("w:highlight").with_attr("w:val", highlight.as_str());
            set_ordered_child(rpr, h, RUN_PROPERTY_ORDER);
        } else {
            log::debug!("Skipping unknown highlight color {highlight:?}");
        }
    }
}

fn is_hex_color(value: &str) -> bool {
    value.len() == 6 && value.chars().all(|c| c.is_ascii_hexdigit())
}

fn set_toggle(rpr: &mut XmlElement, name: &str, on: bool) {
    let mut el = XmlElement::new(name);
    if !on {
        el.set_attr("w:val", "0");
    }
    set_ordered_child(rpr, el, RUN_PROPERTY_ORDER);
}

/// Replace the child with the same name, or insert `child` where the schema
/// order puts it
fn set_ordered_child(parent: &mut XmlElement, child: XmlElement, order: &[&str]) {
    if let Some(existing) = parent.child_mut(&child.name) {
        *existing = child;
        return;
    }

    let rank = |name: &str| order.iter().position(|n| *n == name).unwrap_or(order.len());
    let child_rank = rank(&child.name);
    let pos = parent
        .children
        .iter()
        .position(|node| matches!(node, XmlNode::Element(el) if rank(&el.name) > child_rank))
        .unwrap_or(parent.children.len());
    parent.children.insert(pos, XmlNode::Element(child));
}

/// Split text on `**bold**` / `__bold__` markers into (text, bold) segments
pub fn markdown_segments(text: &str) -> Vec<(String, bool)> {
    let mut segments = Vec::new();
    let mut last = 0;
    for caps in BOLD_MARKER.captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        if whole.start() > last {
            segments.push((text[last..whole.start()].to_string(), false));
        }
        let inner = caps.get(1).or_else(|| caps.get(2)).map_or("", |m| m.as_str());
        segments.push((inner.to_string(), true));
        last = whole.end();
    }
    if last < text.len() {
        segments.push((text[last..].to_string(), false));
    }
    if segments.is_empty() {
        segments.push((text.to_string(), false));
    }
    segments
}

fn append_markdown_runs(paragraph: &mut XmlElement, text: &str, format: &RunFormat) {
    for (segment, bold) in markdown_segments(text) {
        if segment.is_empty() {
            continue;
        }
        let mut run = paragraph::new_run(&segment);
        apply_run_format(&mut run, format);
        if bold {
            let rpr = paragraph::ensure_run_properties(&mut run);
            set_toggle(rpr, "w:b", true);
        }
        // runs belong after pPr and any existing content
        paragraph.push(run);
    }
}

/// Full replace: drop every child except `w:pPr`, write `text` as
/// bold-aware runs with the captured run format, then restore paragraph
/// properties, style and numbering
pub fn replace_paragraph_text(
    paragraph: &mut XmlElement,
    styles: &StyleSheet,
    text: &str,
    format: &ParagraphFormat,
) {
    paragraph::clear_content(paragraph);
    if !text.is_empty() {
        append_markdown_runs(paragraph, text, &format.run_format);
    }
    apply_paragraph_format(paragraph, styles, format);
}

/// Build a new paragraph carrying `text` and the captured formatting
pub fn build_paragraph(styles: &StyleSheet, text: &str, format: &ParagraphFormat) -> XmlElement {
    let mut paragraph = paragraph::new_paragraph();
    replace_paragraph_text(&mut paragraph, styles, text, format);
    paragraph
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::paragraph::{ensure_run_properties, new_paragraph, new_run};

    fn formatted_paragraph() -> XmlElement {
        let mut run = new_run("Hello");
        let rpr = ensure_run_properties(&mut run);
        rpr.push(XmlElement::new("w:rFonts").with_attr("w:ascii", "Calibri"));
        rpr.push(XmlElement::new("w:b"));
        rpr.push(XmlElement::new("w:color").with_attr("w:val", "1F3864"));
        rpr.push(XmlElement::new("w:sz").with_attr("w:val", "24"));
        rpr.push(XmlElement::new("w:highlight").with_attr("w:val", "yellow"));

        let ppr = XmlElement::new("w:pPr")
            .with_child(XmlElement::new("w:pStyle").with_attr("w:val", "ListBullet"))
            .with_child(
                XmlElement::new("w:numPr")
                    .with_child(XmlElement::new("w:ilvl").with_attr("w:val", "0"))
                    .with_child(XmlElement::new("w:numId").with_attr("w:val", "4")),
            )
            .with_child(XmlElement::new("w:jc").with_attr("w:val", "both"));

        new_paragraph().with_child(ppr).with_child(run)
    }

    #[test]
    fn test_capture_run_format_reads_first_run() {
        let format = capture_run_format(&formatted_paragraph());
        assert_eq!(format.bold, Some(true));
        assert_eq!(format.italic, None);
        assert_eq!(format.font_name.as_deref(), Some("Calibri"));
        assert_eq!(format.font_size_pt, Some(12.0));
        assert_eq!(format.font_color, Some(FontColor::Rgb("1F3864".to_string())));
        assert_eq!(format.highlight.as_deref(), Some("yellow"));
    }

    #[test]
    fn test_property_blobs_round_trip_verbatim() {
        let source = formatted_paragraph();
        let ppr = capture_paragraph_properties(&source).unwrap();
        let numpr = capture_list_properties(&source).unwrap();

        let mut target = new_paragraph().with_child(new_run("x"));
        apply_paragraph_properties(&mut target, &ppr);
        assert_eq!(
            paragraph::paragraph_properties(&target).unwrap(),
            paragraph::paragraph_properties(&source).unwrap()
        );

        let mut plain = new_paragraph();
        apply_list_properties(&mut plain, &numpr);
        assert_eq!(
            paragraph::numbering_properties(&plain).unwrap().to_xml_string().unwrap(),
            numpr.as_str()
        );
    }

    #[test]
    fn test_list_properties_are_inserted_in_schema_order() {
        let source = formatted_paragraph();
        let numpr = capture_list_properties(&source).unwrap();

        let ppr = XmlElement::new("w:pPr")
            .with_child(XmlElement::new("w:pStyle").with_attr("w:val", "Normal"))
            .with_child(XmlElement::new("w:jc").with_attr("w:val", "left"));
        let mut target = new_paragraph().with_child(ppr);
        apply_list_properties(&mut target, &numpr);

        let names: Vec<_> = paragraph::paragraph_properties(&target)
            .unwrap()
            .elements()
            .map(|el| el.name.clone())
            .collect();
        assert_eq!(names, vec!["w:pStyle", "w:numPr", "w:jc"]);
    }

    #[test]
    fn test_unresolvable_attributes_are_skipped() {
        let format = RunFormat {
            bold: Some(true),
            highlight: Some("chartreuse".to_string()),
            font_color: Some(FontColor::Theme("notATheme".to_string())),
            underline: Some("squiggly".to_string()),
            ..RunFormat::default()
        };
        let mut run = new_run("x");
        apply_run_format(&mut run, &format);

        let rpr = paragraph::run_properties(&run).unwrap();
        assert!(rpr.child("w:b").is_some());
        assert!(rpr.child("w:highlight").is_none());
        assert!(rpr.child("w:color").is_none());
        assert!(rpr.child("w:u").is_none());
    }

    #[test]
    fn test_unparseable_blob_is_ignored() {
        let blob: PropertyBlob = serde_json::from_str("\"<w:pPr><broken\"").unwrap();
        let mut p = new_paragraph().with_child(new_run("keep"));
        apply_paragraph_properties(&mut p, &blob);
        assert_eq!(paragraph::paragraph_text(&p), "keep");
        assert!(paragraph::paragraph_properties(&p).is_none());
    }

    #[test]
    fn test_markdown_segments_split_bold_markers() {
        assert_eq!(
            markdown_segments("Plain **bold** and __also__ end"),
            vec![
                ("Plain ".to_string(), false),
                ("bold".to_string(), true),
                (" and ".to_string(), false),
                ("also".to_string(), true),
                (" end".to_string(), false),
            ]
        );
        assert_eq!(markdown_segments(""), vec![(String::new(), false)]);
    }

    #[test]
    fn test_replace_paragraph_text_keeps_properties() {
        let mut p = formatted_paragraph();
        let format = ParagraphFormat {
            style: None,
            paragraph_properties: capture_paragraph_properties(&p),
            list_properties: capture_list_properties(&p),
            run_format: capture_run_format(&p),
        };
        replace_paragraph_text(&mut p, &StyleSheet::default(), "New **text**", &format);

        assert_eq!(paragraph::paragraph_text(&p), "New text");
        assert!(paragraph::numbering_properties(&p).is_some());
        let runs: Vec<_> = paragraph::runs(&p).collect();
        assert_eq!(runs.len(), 2);
        assert!(runs.iter().all(|r| paragraph::is_bold(r)));
    }
}
