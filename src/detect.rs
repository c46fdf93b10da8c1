//! Format detection for DOCX packages.

use crate::container::decode_xml_bytes;
use crate::error::{Error, Result};
use std::io::{Read, Seek};

/// ZIP file magic bytes: PK\x03\x04
const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

/// Content type for DOCX main document part.
const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";

/// Content type for DOCM (macro-enabled) main document part.
const DOCM_CONTENT_TYPE: &str = "application/vnd.ms-word.document.macroEnabled.main+xml";

/// Content type for DOTX (template) main document part.
const DOTX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.template.main+xml";

/// Check if data starts with ZIP magic bytes.
pub fn is_zip_file(data: &[u8]) -> bool {
    data.len() >= 4 && data[..4] == ZIP_MAGIC
}

/// Verify that the bytes hold a word-processing package.
///
/// Anything else is reported as [`Error::MalformedDocument`] so the caller
/// can surface a single blocking message.
///
/// # Example
///
/// ```no_run
/// use manualdoc::detect::ensure_docx;
///
/// let data = std::fs::read("manual.docx")?;
/// ensure_docx(&data)?;
/// # Ok::<(), manualdoc::Error>(())
/// ```
pub fn ensure_docx(data: &[u8]) -> Result<()> {
    if !is_zip_file(data) {
        return Err(Error::MalformedDocument("not a ZIP package".to_string()));
    }

    let cursor = std::io::Cursor::new(data);
    ensure_docx_from_reader(cursor)
}

/// Verify a word-processing package from a reader.
pub fn ensure_docx_from_reader<R: Read + Seek>(reader: R) -> Result<()> {
    let mut archive = zip::ZipArchive::new(reader)?;

    let content_types = match archive.by_name("[Content_Types].xml") {
        Ok(mut file) => {
            let mut bytes = Vec::new();
            file.read_to_end(&mut bytes)?;
            Some(decode_xml_bytes(&bytes)?)
        }
        Err(_) => None,
    };

    let declared = content_types.as_deref().is_some_and(|ct| {
        ct.contains(DOCX_CONTENT_TYPE) || ct.contains(DOCM_CONTENT_TYPE) || ct.contains(DOTX_CONTENT_TYPE)
    });

    // Fallback: some generators omit the override but keep the folder layout
    if declared || archive.file_names().any(|n| n.starts_with("word/")) {
        Ok(())
    } else {
        Err(Error::MalformedDocument(
            "package is not a word-processing document".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;

    fn package(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for (name, body) in entries {
            zip.start_file(*name, SimpleFileOptions::default()).unwrap();
            zip.write_all(body.as_bytes()).unwrap();
        }
        zip.finish().unwrap().into_inner()
    }

    #[test]
    fn test_is_zip_file() {
        assert!(is_zip_file(&[0x50, 0x4B, 0x03, 0x04, 0x00]));
        assert!(!is_zip_file(&[0x00, 0x00, 0x00, 0x00]));
        assert!(!is_zip_file(&[0x50, 0x4B]));
    }

    #[test]
    fn test_detect_invalid_data() {
        let result = ensure_docx(&[0x00, 0x00, 0x00, 0x00]);
        assert!(matches!(result, Err(Error::MalformedDocument(_))));
    }

    #[test]
    fn test_detect_docx_by_content_type() {
        let ct = format!("<Types><Override ContentType=\"{}\"/></Types>", DOCX_CONTENT_TYPE);
        let data = package(&[("[Content_Types].xml", &ct)]);
        assert!(ensure_docx(&data).is_ok());
    }

    #[test]
    fn test_detect_docx_by_folder() {
        let data = package(&[("word/document.xml", "<w:document/>")]);
        assert!(ensure_docx(&data).is_ok());
    }

    #[test]
    fn test_detect_spreadsheet_rejected() {
        let data = package(&[("xl/workbook.xml", "<workbook/>")]);
        assert!(matches!(ensure_docx(&data), Err(Error::MalformedDocument(_))));
    }
}
