//! JSON renderer and reader.

use crate::error::Result;
use crate::model::{ManualExtract, Section};
use serde::Deserialize;

/// JSON output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JsonFormat {
    /// Compact single-line JSON
    Compact,
    /// Pretty-printed with 2-space indentation
    #[default]
    Pretty,
}

/// Convert a parse result to JSON.
pub fn to_json(extract: &ManualExtract, format: JsonFormat) -> Result<String> {
    let json = match format {
        JsonFormat::Compact => serde_json::to_string(extract)?,
        JsonFormat::Pretty => serde_json::to_string_pretty(extract)?,
    };
    Ok(json)
}

/// Convert a parse result to JSON with default formatting.
pub fn to_json_default(extract: &ManualExtract) -> Result<String> {
    to_json(extract, JsonFormat::Pretty)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SectionsInput {
    List(Vec<Section>),
    Extract(ManualExtract),
}

/// Read sections to fill from JSON.
///
/// Accepts either a bare array of sections or a whole parse result, in which
/// case its recognized sections are used. This lets the output of
/// [`to_json`] be edited and fed back to the writer.
pub fn sections_from_json(json: &str) -> Result<Vec<Section>> {
    let sections = match serde_json::from_str::<SectionsInput>(json)? {
        SectionsInput::List(sections) => sections,
        SectionsInput::Extract(extract) => extract.secciones_reconocidas,
    };
    Ok(sections)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::model::{Field, PiezasGrupo, PiezasItem};

    fn sample() -> ManualExtract {
        let mut section = Section::new("informacion-general", "Información general");
        section.fields.push(Field::text("id-cambio", "ID de Cambio", "CHG-1"));
        ManualExtract {
            secciones_reconocidas: vec![section],
            piezas_detalladas: vec![PiezasGrupo::with_items(
                "OSB",
                vec![PiezasItem::new("a.xsd", "XSD", "Nuevo")],
            )],
            ..Default::default()
        }
    }

    #[test]
    fn test_to_json_pretty() {
        let json = to_json(&sample(), JsonFormat::Pretty).unwrap();
        assert!(json.contains('\n'));
        assert!(json.contains("\"piezasDetalladas\""));
        assert!(json.contains("\"nombre\": \"a.xsd\""));
    }

    #[test]
    fn test_to_json_compact() {
        let json = to_json(&sample(), JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n'));
        assert!(json.contains("\"grupo\":\"OSB\""));
    }

    #[test]
    fn test_to_json_default() {
        let json = to_json_default(&ManualExtract::default()).unwrap();
        assert!(json.contains('\n'));
    }

    #[test]
    fn test_extract_roundtrip() {
        let extract = sample();
        let json = to_json_default(&extract).unwrap();
        let parsed: ManualExtract = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, extract);
    }

    #[test]
    fn test_sections_from_either_shape() {
        let extract = sample();
        let from_extract = sections_from_json(&to_json_default(&extract).unwrap()).unwrap();
        assert_eq!(from_extract, extract.secciones_reconocidas);

        let list = serde_json::to_string(&extract.secciones_reconocidas).unwrap();
        assert_eq!(sections_from_json(&list).unwrap(), extract.secciones_reconocidas);

        assert!(matches!(sections_from_json("{\"x\": 1"), Err(Error::Json(_))));
    }
}
