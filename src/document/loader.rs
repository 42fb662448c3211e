//! Package loading and serialization
//!
//! Reads every ZIP entry of a .docx, parses the parts the engine edits
//! (main document, headers, footers, styles) and writes the package back
//! with untouched entries copied byte for byte.

use std::io::{Cursor, Read, Write};
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use super::io::{validate_docx_archive, validate_docx_name, MAIN_DOCUMENT_PART};
use super::models::{AuxiliaryPart, Document, PackageEntry};
use super::styles::StyleSheet;
use super::xml::{XmlNode, XmlPart};
use crate::error::{Result, TemplateError};

const STYLES_PART: &str = "word/styles.xml";
const BODY: &str = "w:body";

static HEADER_FOOTER_PART: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^word/(header|footer)\d*\.xml$").unwrap());

impl Document {
    /// Open a .docx file from disk
    pub fn open(path: &Path) -> Result<Self> {
        validate_docx_name(&path.to_string_lossy())?;
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    /// Load a document from the raw bytes of a .docx package
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))?;
        validate_docx_archive(&mut archive)?;

        let mut entries = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            if file.is_dir() {
                continue;
            }
            let compression = match file.compression() {
                CompressionMethod::Stored => CompressionMethod::Stored,
                _ => CompressionMethod::Deflated,
            };
            let name = file.name().to_string();
            let mut data = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut data)?;
            entries.push(PackageEntry {
                name,
                data,
                compression,
            });
        }

        let main_entry = entries
            .iter()
            .position(|entry| entry.name == MAIN_DOCUMENT_PART)
            .ok_or_else(|| TemplateError::InvalidDocument(format!("missing {MAIN_DOCUMENT_PART}")))?;
        let mut main = XmlPart::parse(&entries[main_entry].data)?;

        let body_slot = main
            .root
            .position_of(BODY, 0)
            .ok_or_else(|| TemplateError::InvalidDocument("document has no body".to_string()))?;
        let body = match main.root.children.remove(body_slot) {
            XmlNode::Element(body) => body,
            _ => return Err(TemplateError::InvalidDocument("document has no body".to_string())),
        };

        let mut auxiliary = Vec::new();
        for (index, entry) in entries.iter().enumerate() {
            if !HEADER_FOOTER_PART.is_match(&entry.name) {
                continue;
            }
            match XmlPart::parse(&entry.data) {
                Ok(part) => auxiliary.push(AuxiliaryPart { entry: index, part }),
                Err(e) => log::warn!("Skipping unreadable part {}: {e}", entry.name),
            }
        }

        let styles = entries
            .iter()
            .find(|entry| entry.name == STYLES_PART)
            .and_then(|entry| match XmlPart::parse(&entry.data) {
                Ok(part) => Some(StyleSheet::from_root(&part.root)),
                Err(e) => {
                    log::warn!("Ignoring unreadable {STYLES_PART}: {e}");
                    None
                }
            })
            .unwrap_or_default();

        log::debug!(
            "Loaded package with {} entries, {} header/footer parts",
            entries.len(),
            auxiliary.len()
        );

        Ok(Self {
            entries,
            main,
            main_entry,
            body,
            body_slot,
            auxiliary,
            styles,
        })
    }

    /// Serialize the package, rewriting only the edited parts
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut main = self.main.clone();
        main.root
            .children
            .insert(self.body_slot, XmlNode::Element(self.body.clone()));
        let main_bytes = main.to_bytes()?;

        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (index, entry) in self.entries.iter().enumerate() {
            let options = SimpleFileOptions::default().compression_method(entry.compression);
            writer.start_file(entry.name.as_str(), options)?;

            if index == self.main_entry {
                writer.write_all(&main_bytes)?;
            } else if let Some(aux) = self.auxiliary.iter().find(|aux| aux.entry == index) {
                writer.write_all(&aux.part.to_bytes()?)?;
            } else {
                writer.write_all(&entry.data)?;
            }
        }

        Ok(writer.finish()?.into_inner())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_bytes()?)?;
        Ok(())
    }
}
