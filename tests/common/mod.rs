//! Synthetic change-manual packages for integration tests.

#![allow(dead_code)]

use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;

pub const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

pub fn paragraph(text: &str) -> String {
    format!("<w:p><w:r><w:t xml:space=\"preserve\">{}</w:t></w:r></w:p>", text)
}

/// A paragraph whose run carries bold formatting.
pub fn bold_paragraph(text: &str) -> String {
    format!(
        "<w:p><w:pPr><w:jc w:val=\"center\"/></w:pPr><w:r><w:rPr><w:b/></w:rPr><w:t>{}</w:t></w:r></w:p>",
        text
    )
}

pub fn cell(text: &str) -> String {
    format!("<w:tc><w:tcPr/>{}</w:tc>", paragraph(text))
}

pub fn bold_cell(text: &str) -> String {
    format!("<w:tc><w:tcPr/>{}</w:tc>", bold_paragraph(text))
}

pub fn row(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|c| cell(c)).collect()
}

pub fn table(rows: &[Vec<String>]) -> String {
    let rows: String = rows
        .iter()
        .map(|cells| format!("<w:tr>{}</w:tr>", cells.concat()))
        .collect();
    format!("<w:tbl><w:tblPr/>{}</w:tbl>", rows)
}

/// A table of plain cells.
pub fn text_table(rows: &[&[&str]]) -> String {
    let rows: Vec<Vec<String>> = rows.iter().map(|r| row(r)).collect();
    table(&rows)
}

pub fn document_xml(body: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
         <w:document xmlns:w=\"{}\"><w:body>{}<w:sectPr/></w:body></w:document>",
        W_NS, body
    )
}

/// Zip the given entries into a package.
pub fn zip_entries(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    for (name, data) in entries {
        zip.start_file(*name, options).unwrap();
        zip.write_all(data).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

pub fn package(body: &str) -> Vec<u8> {
    let document = document_xml(body);
    zip_entries(&[
        ("[Content_Types].xml", b"<Types/>"),
        ("word/document.xml", document.as_bytes()),
        ("word/styles.xml", b"<w:styles/>"),
        ("docProps/core.xml", b"<cp:coreProperties/>"),
    ])
}

/// Header, country and yes/no blocks of a typical manual.
pub fn info_general_body(id: &str, tipo: &str) -> String {
    let header = table(&[
        vec![bold_cell("Información general")],
        vec![cell(&format!("ID de Cambio: {}", id)), bold_cell(&format!("*Tipo de Requerimiento: {}", tipo))],
        row(&["REG", "HN", "GT", "PA", "NI"]),
        row(&["", "X", "", "", "X"]),
    ]);
    let areas = text_table(&[
        &["Afectación a otras áreas", "Respuesta: SI/NO"],
        &["Afecta DWH", "SI"],
        &["Afecta Cierre", "NO"],
        &["Otros", ""],
        &["Participación de proveedores", ""],
        &["Participa Proveedor", "NO"],
    ]);
    format!("{}{}{}", paragraph("Manual de implementación"), header, areas)
}

pub fn manual(id: &str, tipo: &str) -> Vec<u8> {
    package(&info_general_body(id, tipo))
}
