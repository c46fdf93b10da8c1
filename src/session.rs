//! Open / edit / export cycle over one template.
//!
//! A session holds the template bytes, the parsed result and the editable
//! sections. Opening replaces all of it at once, and only when the new
//! template parses; a failed open leaves the previous state untouched.

use crate::catalog::{INFO_GENERAL_ID, KEY_PAIS_AFECTADO};
use crate::changes::RepoStatus;
use crate::detect::ensure_docx;
use crate::docx::{DocxParser, DocxWriter, WriteReport};
use crate::error::{Error, Result};
use crate::input::InputShape;
use crate::model::{FieldValue, ManualExtract, PiezasGrupo, Section};
use crate::normalize::country::{apply_country_selection, codes_to_strings, to_country_codes, CountryCode};
use crate::normalize::pieces::merge_groups;
use crate::options::{ExtractOptions, WriteOptions};
use std::path::{Path, PathBuf};
use tracing::info;

/// File name suggested for an exported manual.
pub const DEFAULT_EXPORT_NAME: &str = "Manual-actualizado.docx";

#[derive(Debug, Clone)]
struct Loaded {
    template: Vec<u8>,
    extract: ManualExtract,
}

/// An editing session over one template at a time.
#[derive(Debug, Clone, Default)]
pub struct EditSession {
    loaded: Option<Loaded>,
    sections: Vec<Section>,
    pieces: Vec<PiezasGrupo>,
    extract_options: ExtractOptions,
    write_options: WriteOptions,
}

impl EditSession {
    /// Create an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set extraction options for later opens.
    pub fn with_extract_options(mut self, options: ExtractOptions) -> Self {
        self.extract_options = options;
        self
    }

    /// Set write options for exports.
    pub fn with_write_options(mut self, options: WriteOptions) -> Self {
        self.write_options = options;
        self
    }

    /// Open a template from bytes.
    pub fn open(&mut self, template: Vec<u8>) -> Result<&ManualExtract> {
        ensure_docx(&template)?;
        let extract = DocxParser::from_bytes(template.clone())?
            .with_options(self.extract_options.clone())
            .parse()?;

        info!(
            bytes = template.len(),
            sections = extract.secciones_reconocidas.len(),
            "template opened"
        );
        self.sections = extract.secciones_reconocidas.clone();
        self.pieces = extract.piezas_detalladas.clone();
        let loaded = self.loaded.insert(Loaded { template, extract });
        Ok(&loaded.extract)
    }

    /// Open a template from any supported transport shape.
    pub fn open_input(&mut self, input: &InputShape) -> Result<&ManualExtract> {
        let bytes = input.to_bytes()?;
        self.open(bytes)
    }

    /// Open a template file.
    pub fn open_file(&mut self, path: impl AsRef<Path>) -> Result<&ManualExtract> {
        let bytes = std::fs::read(path.as_ref())?;
        self.open(bytes)
    }

    /// Check if a template is loaded.
    pub fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    /// Bytes of the loaded template.
    pub fn template(&self) -> Option<&[u8]> {
        self.loaded.as_ref().map(|l| l.template.as_slice())
    }

    /// Result of the last successful open.
    pub fn extract(&self) -> Option<&ManualExtract> {
        self.loaded.as_ref().map(|l| &l.extract)
    }

    /// Editable sections.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Editable sections, mutably.
    pub fn sections_mut(&mut self) -> &mut Vec<Section> {
        &mut self.sections
    }

    /// Editable pieces groups.
    pub fn pieces(&self) -> &[PiezasGrupo] {
        &self.pieces
    }

    /// Editable pieces groups, mutably.
    pub fn pieces_mut(&mut self) -> &mut Vec<PiezasGrupo> {
        &mut self.pieces
    }

    /// Set a field value; `false` when the section or field does not exist.
    pub fn set_field_value(&mut self, section_id: &str, key: &str, value: impl Into<FieldValue>) -> bool {
        match self
            .sections
            .iter_mut()
            .find(|s| s.id == section_id)
            .and_then(|s| s.field_mut(key))
        {
            Some(field) => {
                field.value = value.into();
                true
            }
            None => false,
        }
    }

    /// Apply a country selection edit to the country field.
    ///
    /// Returns the resulting selection, or `None` when the session has no
    /// country field.
    pub fn set_country_selection(&mut self, next: &[CountryCode]) -> Option<Vec<CountryCode>> {
        let field = self
            .sections
            .iter_mut()
            .find(|s| s.id == INFO_GENERAL_ID)?
            .field_mut(KEY_PAIS_AFECTADO)?;
        let previous = to_country_codes(&field.value);
        let selection = apply_country_selection(&previous, next);
        field.value = FieldValue::Multi(codes_to_strings(&selection));
        Some(selection)
    }

    /// Add repository change groups to the pieces, merging by group name.
    pub fn add_repository_changes(&mut self, statuses: &[RepoStatus]) {
        let mut groups = std::mem::take(&mut self.pieces);
        groups.extend(statuses.iter().map(RepoStatus::to_group));
        self.pieces = merge_groups(groups);
    }

    /// Fill the loaded template with the current sections.
    pub fn export(&self) -> Result<(Vec<u8>, WriteReport)> {
        let loaded = self.loaded.as_ref().ok_or(Error::NoTemplateLoaded)?;
        if self.sections.is_empty() {
            return Err(Error::NoSectionsToExport);
        }
        DocxWriter::from_bytes(loaded.template.clone())
            .with_options(self.write_options.clone())
            .fill(&self.sections)
    }

    /// Export into a directory under [`DEFAULT_EXPORT_NAME`], or to a file path.
    pub fn export_to(&self, target: impl AsRef<Path>) -> Result<(PathBuf, WriteReport)> {
        let (bytes, report) = self.export()?;
        let target = target.as_ref();
        let path = if target.is_dir() {
            target.join(DEFAULT_EXPORT_NAME)
        } else {
            target.to_path_buf()
        };
        std::fs::write(&path, bytes)?;
        Ok((path, report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::fixtures::{cell, package, table};

    fn template(id: &str) -> Vec<u8> {
        package(&table(&[
            vec![cell("Información general")],
            vec![cell(&format!("ID de Cambio: {}", id)), cell("Tipo de Requerimiento: Normal")],
            vec![cell("REG"), cell("HN"), cell("GT"), cell("PA"), cell("NI")],
            vec![cell("X"), cell(""), cell(""), cell(""), cell("")],
        ]))
    }

    #[test]
    fn test_export_requires_template() {
        let session = EditSession::new();
        assert!(matches!(session.export(), Err(Error::NoTemplateLoaded)));
    }

    #[test]
    fn test_export_requires_sections() {
        let mut session = EditSession::new();
        session.open(template("CHG-1")).unwrap();
        session.sections_mut().clear();
        assert!(matches!(session.export(), Err(Error::NoSectionsToExport)));
    }

    #[test]
    fn test_failed_open_keeps_previous_state() {
        let mut session = EditSession::new();
        session.open(template("CHG-1")).unwrap();
        session.set_field_value(INFO_GENERAL_ID, "id-cambio", "CHG-2");

        let no_body = crate::docx::fixtures::package_with_document("<w:document/>");
        assert!(session.open(no_body).is_err());
        assert!(session.open(b"not a zip".to_vec()).is_err());

        assert_eq!(session.template(), Some(template("CHG-1").as_slice()));
        let section = &session.sections()[0];
        assert_eq!(section.field("id-cambio").unwrap().value.as_text(), "CHG-2");
    }

    #[test]
    fn test_country_selection_edits() {
        let mut session = EditSession::new();
        session.open(template("CHG-1")).unwrap();

        use CountryCode::*;
        assert_eq!(session.set_country_selection(&[Reg, Hn]), Some(vec![Hn]));
        assert_eq!(session.set_country_selection(&[Hn, Reg]), Some(vec![Reg]));
        assert_eq!(session.set_country_selection(&[Hn, Gt, Pa, Ni]), Some(vec![Reg]));
        assert_eq!(session.set_country_selection(&[]), Some(vec![Reg]));
    }

    #[test]
    fn test_export_roundtrip() {
        let mut session = EditSession::new();
        session.open(template("CHG-1")).unwrap();
        session.set_field_value(INFO_GENERAL_ID, "id-cambio", "CHG-9");
        session.set_country_selection(&[CountryCode::Reg, CountryCode::Gt]);

        let (bytes, _) = session.export().unwrap();
        let mut reopened = EditSession::new();
        let extract = reopened.open(bytes).unwrap();
        let info = extract.info_general().unwrap();
        assert_eq!(info.field("id-cambio").unwrap().value.as_text(), "CHG-9");
        assert_eq!(info.field("pais-afectado").unwrap().value, FieldValue::Multi(vec!["GT".into()]));
    }

    #[test]
    fn test_repository_changes_merge() {
        use crate::changes::{ChangeKind, RepoChange};

        let mut session = EditSession::new();
        let status = RepoStatus {
            repo_name: "RGCARD".into(),
            repo_path: String::new(),
            branch: None,
            changes: vec![
                RepoChange::new("a.sql", ChangeKind::Added),
                RepoChange::new("a.sql", ChangeKind::Added),
            ],
        };
        session.add_repository_changes(&[status.clone(), status]);
        assert_eq!(session.pieces().len(), 1);
        assert_eq!(session.pieces()[0].items.len(), 1);
    }
}
