//! DOCX manual parser.

use super::tree::XmlDocument;
use super::walker::build_document;
use crate::container::OoxmlContainer;
use crate::error::{Error, Result};
use crate::extract::{build_info_general, extract_key_values};
use crate::model::{Document, ManualExtract, PiezasGrupo, RawText, TextTable};
use crate::normalize::normalize_sections;
use crate::options::ExtractOptions;
use tracing::info;

/// Parser for change-manual DOCX packages.
pub struct DocxParser {
    container: OoxmlContainer,
    options: ExtractOptions,
}

impl DocxParser {
    /// Open a DOCX file for parsing.
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let container = OoxmlContainer::open(path)?;
        Ok(Self::from_container(container))
    }

    /// Create a parser from bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let container = OoxmlContainer::from_bytes(data)?;
        Ok(Self::from_container(container))
    }

    /// Create a parser from a container.
    pub fn from_container(container: OoxmlContainer) -> Self {
        Self {
            container,
            options: ExtractOptions::default(),
        }
    }

    /// Set extraction options.
    pub fn with_options(mut self, options: ExtractOptions) -> Self {
        self.options = options;
        self
    }

    /// Read the body into the paragraph/table model.
    ///
    /// Fails with [`Error::MalformedDocument`] when the package has no body
    /// part or the part has no `w:body` element.
    pub fn document(&self) -> Result<Document> {
        let xml = self.container.read_body_xml()?;
        let tree = XmlDocument::parse(&xml)?;
        let body = tree
            .body_path()
            .and_then(|path| tree.root().and_then(|root| root.at_path(&path)))
            .ok_or_else(|| Error::MalformedDocument("no w:body element".to_string()))?;
        Ok(build_document(body))
    }

    /// Parse the manual.
    pub fn parse(&self) -> Result<ManualExtract> {
        let document = self.document()?;
        let extract = extract_manual(&document, &self.options);
        info!(
            sections = extract.secciones_reconocidas.len(),
            groups = extract.piezas_detalladas.len(),
            pieces = extract.piece_count(),
            "parsed manual"
        );
        Ok(extract)
    }

    /// Get a reference to the container.
    pub fn container(&self) -> &OoxmlContainer {
        &self.container
    }
}

/// Run every extractor over an already built document.
pub fn extract_manual(document: &Document, options: &ExtractOptions) -> ManualExtract {
    let paragraphs = document.paragraph_texts();
    let tables = document.text_tables();

    let sections = normalize_sections(build_info_general(&tables).into_iter().collect());
    let pieces = detect_pieces(&tables, options);
    let fields = if options.detect_key_values {
        extract_key_values(&paragraphs, &tables)
    } else {
        Vec::new()
    };
    let raw = if options.include_raw {
        RawText { paragraphs, tables }
    } else {
        RawText::default()
    };

    ManualExtract {
        campos_detectados: fields,
        piezas_detalladas: pieces,
        secciones_reconocidas: sections,
        raw,
    }
}

#[cfg(feature = "pieces")]
fn detect_pieces(tables: &[TextTable], options: &ExtractOptions) -> Vec<PiezasGrupo> {
    crate::extract::extract_pieces(tables, options)
}

#[cfg(not(feature = "pieces"))]
fn detect_pieces(_tables: &[TextTable], _options: &ExtractOptions) -> Vec<PiezasGrupo> {
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::fixtures::{cell, package, paragraph, table};

    fn sample_body() -> String {
        format!(
            "{}{}{}",
            paragraph("Manual de instalación"),
            table(&[
                vec![cell("Información general")],
                vec![cell("ID de Cambio: CHG-1"), cell("*Tipo de Requerimiento: ")],
            ]),
            table(&[
                vec![cell("Nombre"), cell("Tipo"), cell("Nuevo o Modificado")],
                vec![cell("pkg_cards.pkb"), cell("Oracle Package"), cell("Nuevo")],
            ]),
        )
    }

    #[test]
    fn test_parse_synthetic_manual() {
        let parser = DocxParser::from_bytes(package(&sample_body())).unwrap();
        let extract = parser.parse().unwrap();

        let info = extract.info_general().unwrap();
        assert_eq!(info.field("id-cambio").unwrap().value.as_text(), "CHG-1");
        assert_eq!(info.field("tipo-requerimiento").unwrap().value.as_text(), "");
        assert_eq!(extract.piece_count(), 1);
        assert_eq!(extract.raw.paragraphs, vec!["Manual de instalación"]);
        assert_eq!(extract.raw.tables.len(), 2);
    }

    #[test]
    fn test_options_drop_raw_and_key_values() {
        let options = ExtractOptions::new().with_raw(false).with_key_values(false);
        let parser = DocxParser::from_bytes(package(&sample_body()))
            .unwrap()
            .with_options(options);
        let extract = parser.parse().unwrap();
        assert!(extract.raw.tables.is_empty());
        assert!(extract.campos_detectados.is_empty());
    }

    #[test]
    fn test_document_without_body_is_malformed() {
        let data = crate::docx::fixtures::package_with_document(
            "<w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\"/>",
        );
        let err = DocxParser::from_bytes(data).unwrap().parse().unwrap_err();
        assert!(matches!(err, Error::MalformedDocument(_)));
    }
}
