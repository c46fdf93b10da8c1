//! Top-level parse result.

use super::{PiezasGrupo, Section, TextTable};
use crate::catalog::INFO_GENERAL_ID;
use serde::{Deserialize, Serialize};

/// A loose "Key: Value" pair found in the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValueField {
    pub key: String,
    pub value: String,
}

impl KeyValueField {
    /// Create a pair.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Raw text of the document, for diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawText {
    /// Non-empty paragraph texts
    #[serde(default)]
    pub paragraphs: Vec<String>,
    /// Tables as rows of cell texts
    #[serde(default)]
    pub tables: Vec<TextTable>,
}

/// Everything recovered from one manual.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualExtract {
    /// Loose key/value pairs
    #[serde(default)]
    pub campos_detectados: Vec<KeyValueField>,
    /// Pieces groups, merged and deduplicated
    #[serde(default)]
    pub piezas_detalladas: Vec<PiezasGrupo>,
    /// Recognized sections, normalized
    #[serde(default)]
    pub secciones_reconocidas: Vec<Section>,
    #[serde(default)]
    pub raw: RawText,
}

impl ManualExtract {
    /// Section by id.
    pub fn section(&self, id: &str) -> Option<&Section> {
        self.secciones_reconocidas.iter().find(|s| s.id == id)
    }

    /// The "Información general" section.
    pub fn info_general(&self) -> Option<&Section> {
        self.section(INFO_GENERAL_ID)
    }

    /// Total number of pieces across groups.
    pub fn piece_count(&self) -> usize {
        self.piezas_detalladas.iter().map(|g| g.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camel_case_keys() {
        let extract = ManualExtract::default();
        let json = serde_json::to_value(&extract).unwrap();
        assert!(json.get("camposDetectados").is_some());
        assert!(json.get("piezasDetalladas").is_some());
        assert!(json.get("seccionesReconocidas").is_some());
        assert!(json["raw"].get("paragraphs").is_some());
    }
}
