//! File name and package validation
//!
//! This module rejects uploads that are not Word documents before any
//! parsing happens.

use std::io::{Read, Seek};

use zip::ZipArchive;

use crate::error::{Result, TemplateError};

pub const MAIN_DOCUMENT_PART: &str = "word/document.xml";

/// Validates that a file name carries the .docx extension
pub fn validate_docx_name(file_name: &str) -> Result<()> {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    if extension != "docx" {
        return Err(TemplateError::UnsupportedFormat(if extension.is_empty() {
            "a file without extension".to_string()
        } else {
            format!(".{extension}")
        }));
    }
    Ok(())
}

/// Validates that an opened archive is a Word package
pub(crate) fn validate_docx_archive<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Result<()> {
    if archive.by_name(MAIN_DOCUMENT_PART).is_ok() {
        return Ok(());
    }

    // Check if it might be an Excel file
    if archive.by_name("xl/workbook.xml").is_ok() {
        return Err(TemplateError::InvalidDocument(
            "this appears to be an Excel file (.xlsx); only Word documents (.docx) are supported"
                .to_string(),
        ));
    }

    Err(TemplateError::InvalidDocument(format!(
        "missing {MAIN_DOCUMENT_PART}; the file may be corrupted or is not a Word document"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_check_is_case_insensitive() {
        assert!(validate_docx_name("Report.DOCX").is_ok());
        assert!(validate_docx_name("report.docx").is_ok());
    }

    #[test]
    fn test_other_extensions_are_client_errors() {
        let err = validate_docx_name("sheet.xlsx").unwrap_err();
        assert!(err.is_client_error());
        assert!(err.to_string().contains(".xlsx"));
        assert!(validate_docx_name("README").is_err());
    }
}
