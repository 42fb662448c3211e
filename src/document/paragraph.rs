//! Paragraph and run accessors over the XML tree
//!
//! These mirror what a word-processing object model exposes for a `w:p`:
//! its text, its direct runs, the paragraph and numbering properties, and
//! the run-level toggles used by heading detection.

use super::xml::{XmlElement, XmlNode};

pub const PARAGRAPH: &str = "w:p";
pub const PARAGRAPH_PROPERTIES: &str = "w:pPr";
pub const PARAGRAPH_STYLE: &str = "w:pStyle";
pub const NUMBERING_PROPERTIES: &str = "w:numPr";
pub const RUN: &str = "w:r";
pub const RUN_PROPERTIES: &str = "w:rPr";
pub const TEXT: &str = "w:t";

/// Containers whose runs contribute to the visible paragraph text
const TEXT_CONTAINERS: [&str; 4] = ["w:hyperlink", "w:ins", "w:smartTag", "w:fldSimple"];

pub fn new_paragraph() -> XmlElement {
    XmlElement::new(PARAGRAPH)
}

/// Visible text of a paragraph: runs, including those inside hyperlinks and
/// insertions, with tabs and breaks rendered as `\t` and `\n`
pub fn paragraph_text(paragraph: &XmlElement) -> String {
    let mut text = String::new();
    collect_paragraph_text(paragraph, &mut text);
    text
}

fn collect_paragraph_text(container: &XmlElement, out: &mut String) {
    for child in container.elements() {
        if child.is(RUN) {
            out.push_str(&run_text(child));
        } else if TEXT_CONTAINERS.contains(&child.name.as_str()) {
            collect_paragraph_text(child, out);
        }
    }
}

pub fn run_text(run: &XmlElement) -> String {
    let mut text = String::new();
    for child in run.elements() {
        match child.name.as_str() {
            TEXT => text.push_str(&child.text_content()),
            "w:tab" => text.push('\t'),
            "w:br" | "w:cr" => text.push('\n'),
            "w:noBreakHyphen" => text.push('-'),
            _ => {}
        }
    }
    text
}

/// Direct `w:r` children, the runs a paragraph owns
pub fn runs(paragraph: &XmlElement) -> impl Iterator<Item = &XmlElement> {
    paragraph.children_named(RUN)
}

pub fn paragraph_properties(paragraph: &XmlElement) -> Option<&XmlElement> {
    paragraph.child(PARAGRAPH_PROPERTIES)
}

pub fn numbering_properties(paragraph: &XmlElement) -> Option<&XmlElement> {
    paragraph_properties(paragraph)?.child(NUMBERING_PROPERTIES)
}

pub fn style_id(paragraph: &XmlElement) -> Option<&str> {
    paragraph_properties(paragraph)?
        .child(PARAGRAPH_STYLE)?
        .attr("w:val")
}

/// Set or clear `w:pStyle`, creating `w:pPr` when needed
pub fn set_style_id(paragraph: &mut XmlElement, id: Option<&str>) {
    match id {
        Some(id) => {
            let ppr = ensure_paragraph_properties(paragraph);
            match ppr.child_mut(PARAGRAPH_STYLE) {
                Some(style) => style.set_attr("w:val", id),
                None => {
                    // pStyle must be the first child of pPr
                    let style = XmlElement::new(PARAGRAPH_STYLE).with_attr("w:val", id);
                    ppr.children.insert(0, XmlNode::Element(style));
                }
            }
        }
        None => {
            if let Some(ppr) = paragraph.child_mut(PARAGRAPH_PROPERTIES) {
                ppr.remove_all_named(PARAGRAPH_STYLE);
            }
        }
    }
}

/// The paragraph's `w:pPr`, inserted as first child when absent
pub fn ensure_paragraph_properties(paragraph: &mut XmlElement) -> &mut XmlElement {
    if paragraph.child(PARAGRAPH_PROPERTIES).is_none() {
        paragraph
            .children
            .insert(0, XmlNode::Element(XmlElement::new(PARAGRAPH_PROPERTIES)));
    }
    paragraph
        .child_mut(PARAGRAPH_PROPERTIES)
        .expect("paragraph properties inserted above")
}

/// Drop every child except the paragraph properties
pub fn clear_content(paragraph: &mut XmlElement) {
    paragraph
        .children
        .retain(|node| matches!(node, XmlNode::Element(el) if el.is(PARAGRAPH_PROPERTIES)));
}

pub fn run_properties(run: &XmlElement) -> Option<&XmlElement> {
    run.child(RUN_PROPERTIES)
}

pub fn ensure_run_properties(run: &mut XmlElement) -> &mut XmlElement {
    if run.child(RUN_PROPERTIES).is_none() {
        run.children
            .insert(0, XmlNode::Element(XmlElement::new(RUN_PROPERTIES)));
    }
    run.child_mut(RUN_PROPERTIES)
        .expect("run properties inserted above")
}

/// Read an on/off property such as `w:b`; `None` when not set on the run
pub fn toggle(run: &XmlElement, name: &str) -> Option<bool> {
    let prop = run_properties(run)?.child(name)?;
    Some(!matches!(
        prop.attr("w:val"),
        Some("0" | "false" | "off")
    ))
}

pub fn is_bold(run: &XmlElement) -> bool {
    toggle(run, "w:b").unwrap_or(false)
}

/// Font size in points from `w:sz`, stored in half-points
pub fn font_size_pt(run: &XmlElement) -> Option<f32> {
    let half_points: f32 = run_properties(run)?
        .child("w:sz")?
        .attr("w:val")?
        .parse()
        .ok()?;
    Some(half_points / 2.0)
}

/// Build a run carrying `text`, turning tabs and newlines into their
/// WordprocessingML elements
pub fn new_run(text: &str) -> XmlElement {
    let mut run = XmlElement::new(RUN);
    let mut buffer = String::new();

    let flush = |run: &mut XmlElement, buffer: &mut String| {
        if !buffer.is_empty() {
            run.push(
                XmlElement::new(TEXT)
                    .with_attr("xml:space", "preserve")
                    .with_text(std::mem::take(buffer)),
            );
        }
    };

    for ch in text.chars() {
        match ch {
            '\t' => {
                flush(&mut run, &mut buffer);
                run.push(XmlElement::new("w:tab"));
            }
            '\n' => {
                flush(&mut run, &mut buffer);
                run.push(XmlElement::new("w:br"));
            }
            '\r' => {}
            _ => buffer.push(ch),
        }
    }
    flush(&mut run, &mut buffer);
    run
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paragraph_with_runs(runs: Vec<XmlElement>) -> XmlElement {
        let mut p = new_paragraph();
        for run in runs {
            p.push(run);
        }
        p
    }

    #[test]
    fn test_paragraph_text_includes_hyperlinks_and_breaks() {
        let link = XmlElement::new("w:hyperlink").with_child(new_run("link"));
        let p = paragraph_with_runs(vec![new_run("See\tthe "), new_run("line\nbreak")])
            .with_child(link);
        assert_eq!(paragraph_text(&p), "See\tthe line\nbreaklink");
        assert_eq!(runs(&p).count(), 2);
    }

    #[test]
    fn test_toggle_reads_explicit_off_values() {
        let mut run = new_run("x");
        ensure_run_properties(&mut run).push(XmlElement::new("w:b"));
        assert!(is_bold(&run));

        let mut off = new_run("x");
        ensure_run_properties(&mut off).push(XmlElement::new("w:b").with_attr("w:val", "0"));
        assert_eq!(toggle(&off, "w:b"), Some(false));
        assert_eq!(toggle(&new_run("x"), "w:i"), None);
    }

    #[test]
    fn test_font_size_is_converted_from_half_points() {
        let mut run = new_run("x");
        ensure_run_properties(&mut run).push(XmlElement::new("w:sz").with_attr("w:val", "28"));
        assert_eq!(font_size_pt(&run), Some(14.0));
    }

    #[test]
    fn test_style_id_set_and_clear() {
        let mut p = new_paragraph();
        assert_eq!(style_id(&p), None);
        set_style_id(&mut p, Some("Heading1"));
        assert_eq!(style_id(&p), Some("Heading1"));
        set_style_id(&mut p, None);
        assert_eq!(style_id(&p), None);
        assert!(paragraph_properties(&p).is_some());
    }

    #[test]
    fn test_clear_content_keeps_properties() {
        let mut p = paragraph_with_runs(vec![new_run("a"), new_run("b")]);
        ensure_paragraph_properties(&mut p);
        clear_content(&mut p);
        assert_eq!(p.children.len(), 1);
        assert_eq!(paragraph_text(&p), "");
    }
}
