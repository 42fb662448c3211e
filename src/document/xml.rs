//! Mutable XML element tree for WordprocessingML parts
//!
//! docx parts are parsed into a small owned tree so paragraphs, runs and
//! tables can be removed, inserted and rewritten in place and then written
//! back. Qualified names (`w:p`, `w:pPr`) are kept as written; namespace
//! declarations stay on the root element as ordinary attributes.

use std::io::Write;

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::error::{Result, TemplateError};

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
    /// Comments, processing instructions and doctypes, written back untouched
    Raw(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attr(mut self, key: &str, value: impl Into<String>) -> Self {
        self.set_attr(key, value);
        self
    }

    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(XmlNode::Element(child));
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(XmlNode::Text(text.into()));
        self
    }

    pub fn is(&self, name: &str) -> bool {
        self.name == name
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn set_attr(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| k == key) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((key.to_string(), value)),
        }
    }

    /// Child elements in document order, skipping text and raw nodes
    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(el) => Some(el),
            _ => None,
        })
    }

    pub fn elements_mut(&mut self) -> impl Iterator<Item = &mut XmlElement> {
        self.children.iter_mut().filter_map(|node| match node {
            XmlNode::Element(el) => Some(el),
            _ => None,
        })
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.elements().filter(move |el| el.name == name)
    }

    pub fn children_named_mut<'a>(
        &'a mut self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a mut XmlElement> {
        self.elements_mut().filter(move |el| el.name == name)
    }

    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.elements().find(|el| el.name == name)
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut XmlElement> {
        self.elements_mut().find(|el| el.name == name)
    }

    /// Position in `children` of the `nth` child element called `name`
    pub fn position_of(&self, name: &str, nth: usize) -> Option<usize> {
        self.children
            .iter()
            .enumerate()
            .filter(|(_, node)| matches!(node, XmlNode::Element(el) if el.name == name))
            .nth(nth)
            .map(|(pos, _)| pos)
    }

    pub fn count_named(&self, name: &str) -> usize {
        self.children_named(name).count()
    }

    /// Remove the `nth` child element called `name`, returning it
    pub fn remove_named(&mut self, name: &str, nth: usize) -> Option<XmlElement> {
        let pos = self.position_of(name, nth)?;
        match self.children.remove(pos) {
            XmlNode::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn remove_all_named(&mut self, name: &str) {
        self.children
            .retain(|node| !matches!(node, XmlNode::Element(el) if el.name == name));
    }

    pub fn push(&mut self, child: XmlElement) {
        self.children.push(XmlNode::Element(child));
    }

    /// Concatenated text of every text node below this element
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }

    /// Parse a standalone element such as a captured `<w:pPr>` fragment
    pub fn parse_fragment(xml: &str) -> Result<XmlElement> {
        let nodes = parse_nodes(xml)?;
        nodes
            .into_iter()
            .find_map(|node| match node {
                XmlNode::Element(el) => Some(el),
                _ => None,
            })
            .ok_or_else(|| TemplateError::InvalidDocument("empty XML fragment".to_string()))
    }

    /// Serialize this element without an XML declaration
    pub fn to_xml_string(&self) -> Result<String> {
        let mut writer = Writer::new(Vec::new());
        write_element(&mut writer, self)?;
        Ok(String::from_utf8_lossy(&writer.into_inner()).into_owned())
    }
}

fn collect_text(el: &XmlElement, out: &mut String) {
    for child in &el.children {
        match child {
            XmlNode::Element(inner) => collect_text(inner, out),
            XmlNode::Text(text) => out.push_str(text),
            XmlNode::Raw(_) => {}
        }
    }
}

/// One XML part of a package: the root element plus anything around it
#[derive(Debug, Clone)]
pub struct XmlPart {
    pub root: XmlElement,
    prolog: Vec<XmlNode>,
    has_declaration: bool,
}

impl XmlPart {
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let xml = std::str::from_utf8(bytes)
            .map_err(|e| TemplateError::InvalidDocument(format!("part is not UTF-8: {e}")))?;
        let xml = xml.trim_start_matches('\u{feff}');
        let has_declaration = xml.trim_start().starts_with("<?xml");

        let mut prolog = Vec::new();
        let mut root = None;
        for node in parse_nodes(xml)? {
            match node {
                XmlNode::Element(el) if root.is_none() => root = Some(el),
                XmlNode::Raw(raw) if root.is_none() => prolog.push(XmlNode::Raw(raw)),
                _ => {}
            }
        }

        let root = root
            .ok_or_else(|| TemplateError::InvalidDocument("part has no root element".to_string()))?;
        Ok(Self {
            root,
            prolog,
            has_declaration,
        })
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = Writer::new(Vec::new());
        if self.has_declaration {
            writer.get_mut().write_all(XML_DECLARATION.as_bytes())?;
            writer.get_mut().write_all(b"\r\n")?;
        }
        for node in &self.prolog {
            if let XmlNode::Raw(raw) = node {
                writer.get_mut().write_all(raw.as_bytes())?;
            }
        }
        write_element(&mut writer, &self.root)?;
        Ok(writer.into_inner())
    }
}

fn parse_nodes(xml: &str) -> Result<Vec<XmlNode>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut stack: Vec<XmlElement> = Vec::new();
    let mut top: Vec<XmlNode> = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => stack.push(element_from_start(&e)?),
            Event::Empty(e) => {
                let el = element_from_start(&e)?;
                attach(&mut stack, &mut top, XmlNode::Element(el));
            }
            Event::End(_) => {
                let el = stack.pop().ok_or_else(|| {
                    TemplateError::InvalidDocument("unbalanced closing tag".to_string())
                })?;
                attach(&mut stack, &mut top, XmlNode::Element(el));
            }
            Event::Text(e) => {
                let text = e.unescape()?.into_owned();
                // whitespace between top-level nodes carries nothing
                if !stack.is_empty() {
                    attach(&mut stack, &mut top, XmlNode::Text(text));
                }
            }
            Event::CData(e) => {
                let text = String::from_utf8_lossy(&e).into_owned();
                attach(&mut stack, &mut top, XmlNode::Text(text));
            }
            Event::Comment(e) => {
                let raw = format!("<!--{}-->", String::from_utf8_lossy(&e));
                attach(&mut stack, &mut top, XmlNode::Raw(raw));
            }
            Event::PI(e) => {
                let raw = format!("<?{}?>", String::from_utf8_lossy(&e));
                attach(&mut stack, &mut top, XmlNode::Raw(raw));
            }
            Event::Eof => break,
            // declarations are regenerated on write; doctypes do not occur in OOXML
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(TemplateError::InvalidDocument(
            "unexpected end of XML".to_string(),
        ));
    }
    Ok(top)
}

fn attach(stack: &mut [XmlElement], top: &mut Vec<XmlNode>, node: XmlNode) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => top.push(node),
    }
}

fn element_from_start(e: &BytesStart<'_>) -> Result<XmlElement> {
    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let mut el = XmlElement::new(name);
    for attr in e.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        el.attributes.push((key, value));
    }
    Ok(el)
}

fn write_element<W: Write>(writer: &mut Writer<W>, el: &XmlElement) -> Result<()> {
    let mut start = BytesStart::new(el.name.as_str());
    for (key, value) in &el.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if el.children.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    for child in &el.children {
        match child {
            XmlNode::Element(inner) => write_element(writer, inner)?,
            XmlNode::Text(text) => writer.write_event(Event::Text(BytesText::new(text)))?,
            XmlNode::Raw(raw) => writer.get_mut().write_all(raw.as_bytes())?,
        }
    }
    writer.write_event(Event::End(BytesEnd::new(el.name.as_str())))?;
    Ok(())
}
