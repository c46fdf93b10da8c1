//! Synthetic packages for unit tests.

use crate::container::BODY_PART;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;

pub(crate) const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

pub(crate) fn paragraph(text: &str) -> String {
    format!("<w:p><w:r><w:t xml:space=\"preserve\">{}</w:t></w:r></w:p>", text)
}

pub(crate) fn cell(text: &str) -> String {
    format!("<w:tc><w:tcPr/>{}</w:tc>", paragraph(text))
}

pub(crate) fn table(rows: &[Vec<String>]) -> String {
    let rows: String = rows
        .iter()
        .map(|cells| format!("<w:tr>{}</w:tr>", cells.concat()))
        .collect();
    format!("<w:tbl><w:tblPr/>{}</w:tbl>", rows)
}

pub(crate) fn document_xml(body: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
         <w:document xmlns:w=\"{}\"><w:body>{}<w:sectPr/></w:body></w:document>",
        W_NS, body
    )
}

pub(crate) fn package_with_document(document: &str) -> Vec<u8> {
    package_with_document_bytes(document.as_bytes())
}

pub(crate) fn package_with_document_bytes(document: &[u8]) -> Vec<u8> {
    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    zip.start_file("[Content_Types].xml", options).unwrap();
    zip.write_all(b"<Types/>").unwrap();
    zip.start_file(BODY_PART, options).unwrap();
    zip.write_all(document).unwrap();
    zip.start_file("word/styles.xml", options).unwrap();
    zip.write_all(b"<w:styles/>").unwrap();
    zip.finish().unwrap().into_inner()
}

pub(crate) fn package(body: &str) -> Vec<u8> {
    package_with_document(&document_xml(body))
}
