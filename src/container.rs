//! ZIP container abstraction for the DOCX package.

use crate::error::{Error, Result};
use std::cell::RefCell;
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Write};
use std::path::Path;

/// Path of the main document part inside a DOCX package.
pub const BODY_PART: &str = "word/document.xml";

/// Fix XML encoding declaration from UTF-16 to UTF-8.
///
/// When we decode UTF-16 XML to a Rust String (UTF-8), the XML declaration
/// still says encoding="UTF-16". The part is written back as UTF-8, so the
/// declaration has to agree with it.
fn fix_xml_encoding_declaration(content: &str) -> String {
    if content.starts_with("<?xml") {
        if let Some(end_decl) = content.find("?>") {
            let decl = &content[..end_decl + 2];
            let rest = &content[end_decl + 2..];

            let fixed_decl = decl
                .replace("encoding=\"UTF-16\"", "encoding=\"UTF-8\"")
                .replace("encoding='UTF-16'", "encoding='UTF-8'")
                .replace("encoding=\"utf-16\"", "encoding=\"UTF-8\"")
                .replace("encoding='utf-16'", "encoding='UTF-8'");

            return format!("{}{}", fixed_decl, rest);
        }
    }
    content.to_string()
}

/// Decode XML bytes handling different encodings (UTF-8, UTF-16 LE/BE).
///
/// Word writes UTF-8, but documents round-tripped through other tools
/// occasionally carry a BOM or UTF-16 content. Bytes that are neither are
/// decoded lossily.
pub fn decode_xml_bytes(bytes: &[u8]) -> Result<String> {
    decode(bytes, true)
}

/// Like [`decode_xml_bytes`], but bytes that are neither UTF-8 nor UTF-16
/// are a [`Error::MalformedDocument`]. For parts that get written back.
pub fn decode_xml_bytes_strict(bytes: &[u8]) -> Result<String> {
    decode(bytes, false)
}

fn decode(bytes: &[u8], lossy: bool) -> Result<String> {
    if bytes.len() >= 3 && bytes[0] == 0xEF && bytes[1] == 0xBB && bytes[2] == 0xBF {
        return String::from_utf8(bytes[3..].to_vec())
            .map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)));
    }

    if bytes.len() >= 2 && bytes[0] == 0xFF && bytes[1] == 0xFE {
        let content = decode_utf16_le(&bytes[2..])?;
        return Ok(fix_xml_encoding_declaration(&content));
    }

    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let content = decode_utf16_be(&bytes[2..])?;
        return Ok(fix_xml_encoding_declaration(&content));
    }

    match String::from_utf8(bytes.to_vec()) {
        Ok(s) => Ok(s),
        Err(_) => {
            // UTF-16 without BOM shows up as NUL bytes interleaved with ASCII
            if bytes.len() >= 4 && bytes[1] == 0 && bytes[3] == 0 {
                decode_utf16_le(bytes).map(|s| fix_xml_encoding_declaration(&s))
            } else if bytes.len() >= 4 && bytes[0] == 0 && bytes[2] == 0 {
                decode_utf16_be(bytes).map(|s| fix_xml_encoding_declaration(&s))
            } else if lossy {
                Ok(String::from_utf8_lossy(bytes).into_owned())
            } else {
                Err(Error::MalformedDocument(
                    "part is neither UTF-8 nor UTF-16".to_string(),
                ))
            }
        }
    }
}

fn decode_utf16_le(bytes: &[u8]) -> Result<String> {
    let len = bytes.len() & !1;

    let u16_iter = (0..len)
        .step_by(2)
        .map(|i| u16::from_le_bytes([bytes[i], bytes[i + 1]]));

    char::decode_utf16(u16_iter)
        .collect::<std::result::Result<String, _>>()
        .map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

fn decode_utf16_be(bytes: &[u8]) -> Result<String> {
    let len = bytes.len() & !1;

    let u16_iter = (0..len)
        .step_by(2)
        .map(|i| u16::from_be_bytes([bytes[i], bytes[i + 1]]));

    char::decode_utf16(u16_iter)
        .collect::<std::result::Result<String, _>>()
        .map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

/// OOXML container abstraction over a ZIP archive.
///
/// A container is opened for the duration of one parse or one export and
/// dropped afterwards; nothing keeps it alive between operations.
pub struct OoxmlContainer {
    archive: RefCell<zip::ZipArchive<Cursor<Vec<u8>>>>,
}

impl OoxmlContainer {
    /// Open a container from a file path.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use manualdoc::container::OoxmlContainer;
    ///
    /// let container = OoxmlContainer::open("manual.docx")?;
    /// let xml = container.read_body_xml()?;
    /// # Ok::<(), manualdoc::Error>(())
    /// ```
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let mut reader = BufReader::new(file);
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(data)
    }

    /// Create a container from a byte vector.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let cursor = Cursor::new(data);
        let archive = zip::ZipArchive::new(cursor)?;
        Ok(Self {
            archive: RefCell::new(archive),
        })
    }

    /// Read an XML part from the archive as a string.
    ///
    /// A missing part is a [`Error::MalformedDocument`]: every caller of this
    /// method needs the part to make progress.
    pub fn read_xml(&self, path: &str) -> Result<String> {
        decode_xml_bytes(&self.read_part(path)?)
    }

    /// Read the main document part.
    pub fn read_body_xml(&self) -> Result<String> {
        self.read_xml(BODY_PART)
    }

    /// Read the main document part for editing, without lossy decoding.
    pub fn read_body_xml_strict(&self) -> Result<String> {
        decode_xml_bytes_strict(&self.read_part(BODY_PART)?)
    }

    fn read_part(&self, path: &str) -> Result<Vec<u8>> {
        let mut archive = self.archive.borrow_mut();
        let mut file = archive
            .by_name(path)
            .map_err(|_| Error::MalformedDocument(format!("missing part {}", path)))?;

        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;
        Ok(bytes)
    }

    /// Check if a file exists in the archive.
    pub fn exists(&self, path: &str) -> bool {
        let archive = self.archive.borrow();
        let result = archive.file_names().any(|n| n == path);
        result
    }

    /// List all files in the archive, in central-directory order.
    pub fn list_files(&self) -> Vec<String> {
        let archive = self.archive.borrow();
        (0..archive.len())
            .filter_map(|i| archive.name_for_index(i).map(String::from))
            .collect()
    }

    /// Re-serialize the package with one part replaced.
    ///
    /// Every other entry is copied raw (compressed bytes, CRC and metadata
    /// untouched), so the rest of the archive stays byte-identical. The
    /// replaced part keeps its original compression method.
    pub fn replace_part(&self, path: &str, content: &str) -> Result<Vec<u8>> {
        let mut archive = self.archive.borrow_mut();

        let compression = archive
            .by_name(path)
            .map(|f| f.compression())
            .map_err(|_| Error::MalformedDocument(format!("missing part {}", path)))?;

        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options =
            zip::write::SimpleFileOptions::default().compression_method(compression);

        for i in 0..archive.len() {
            let entry = archive.by_index_raw(i)?;
            if entry.name() == path {
                drop(entry);
                writer.start_file(path, options)?;
                writer.write_all(content.as_bytes())?;
            } else {
                writer.raw_copy_file(entry)?;
            }
        }

        let cursor = writer.finish()?;
        Ok(cursor.into_inner())
    }
}

impl std::fmt::Debug for OoxmlContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OoxmlContainer")
            .field("files", &self.list_files().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zip::write::SimpleFileOptions;

    fn package(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
        for (name, body) in entries {
            zip.start_file(*name, options).unwrap();
            zip.write_all(body.as_bytes()).unwrap();
        }
        zip.finish().unwrap().into_inner()
    }

    #[test]
    fn test_read_body_xml() {
        let data = package(&[(BODY_PART, "<w:document/>"), ("word/styles.xml", "<w:styles/>")]);
        let container = OoxmlContainer::from_bytes(data).unwrap();
        assert!(container.exists(BODY_PART));
        assert_eq!(container.read_body_xml().unwrap(), "<w:document/>");
    }

    #[test]
    fn test_missing_body_is_malformed() {
        let data = package(&[("word/styles.xml", "<w:styles/>")]);
        let container = OoxmlContainer::from_bytes(data).unwrap();
        let err = container.read_body_xml().unwrap_err();
        assert!(matches!(err, Error::MalformedDocument(_)));
    }

    #[test]
    fn test_replace_part_keeps_other_entries() {
        let data = package(&[
            ("[Content_Types].xml", "<Types/>"),
            (BODY_PART, "<w:document>old</w:document>"),
            ("word/styles.xml", "<w:styles>keep</w:styles>"),
        ]);
        let container = OoxmlContainer::from_bytes(data).unwrap();
        let out = container
            .replace_part(BODY_PART, "<w:document>new</w:document>")
            .unwrap();

        let rewritten = OoxmlContainer::from_bytes(out).unwrap();
        assert_eq!(
            rewritten.list_files(),
            vec!["[Content_Types].xml", BODY_PART, "word/styles.xml"]
        );
        assert_eq!(rewritten.read_body_xml().unwrap(), "<w:document>new</w:document>");
        assert_eq!(
            rewritten.read_xml("word/styles.xml").unwrap(),
            "<w:styles>keep</w:styles>"
        );
    }

    #[test]
    fn test_not_a_zip() {
        let result = OoxmlContainer::from_bytes(b"plain text".to_vec());
        assert!(matches!(result, Err(Error::ZipArchive(_))));
    }

    #[test]
    fn test_utf16_decoding_function() {
        let utf16_le = b"\xFF\xFE<\0?\0x\0m\0l\0>\0";
        let result = decode_xml_bytes(utf16_le).expect("Should decode UTF-16 LE");
        assert_eq!(result, "<?xml>");

        let utf16_be = b"\xFE\xFF\0<\0?\0x\0m\0l\0>";
        let result = decode_xml_bytes(utf16_be).expect("Should decode UTF-16 BE");
        assert_eq!(result, "<?xml>");

        let utf8_bom = b"\xEF\xBB\xBF<?xml>";
        let result = decode_xml_bytes(utf8_bom).expect("Should decode UTF-8 with BOM");
        assert_eq!(result, "<?xml>");
    }

    #[test]
    fn test_utf16_declaration_rewritten() {
        let text = "<?xml version=\"1.0\" encoding=\"UTF-16\"?><a/>";
        let mut bytes = vec![0xFF, 0xFE];
        for unit in text.encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        let decoded = decode_xml_bytes(&bytes).unwrap();
        assert_eq!(decoded, "<?xml version=\"1.0\" encoding=\"UTF-8\"?><a/>");
    }

    #[test]
    fn test_invalid_bytes_rejected_when_strict() {
        let bytes = b"<w:t>caf\xE9 \xFF</w:t>";
        assert_eq!(decode_xml_bytes(bytes).unwrap(), "<w:t>caf\u{FFFD} \u{FFFD}</w:t>");
        let err = decode_xml_bytes_strict(bytes).unwrap_err();
        assert!(matches!(err, Error::MalformedDocument(_)));
        assert_eq!(decode_xml_bytes_strict(b"<a>ok</a>").unwrap(), "<a>ok</a>");
    }
}
