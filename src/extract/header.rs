//! Header block: change id and requirement type.

use super::KEY_VALUE;
use crate::catalog::{
    KEY_ID_CAMBIO, KEY_TIPO_REQUERIMIENTO, LABEL_ID_CAMBIO, LABEL_TIPO_REQUERIMIENTO,
};
use crate::model::{Field, TextRow, TextTable};
use crate::normalize::text::{fold_key, strip_marker, strip_trailing_colon};
use once_cell::sync::Lazy;
use regex::Regex;

static ID_LABEL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)id\s*de\s*cambio\s*:").unwrap());
static TIPO_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\*?\s*tipo\s*de\s*requerimiento\s*:").unwrap());

/// The header labels, in output order.
const HEADER_FIELDS: &[(&str, &str)] = &[
    (KEY_ID_CAMBIO, LABEL_ID_CAMBIO),
    (KEY_TIPO_REQUERIMIENTO, LABEL_TIPO_REQUERIMIENTO),
];

/// Index of the header table.
///
/// The first table mentioning "Información general", or holding both an
/// "ID de Cambio:" and a "Tipo de Requerimiento:" cell; otherwise the first
/// table.
pub fn find_header_table(tables: &[TextTable]) -> Option<usize> {
    let found = tables.iter().position(|table| {
        let cells = || table.iter().flatten();
        let has_title = cells().any(|c| fold_key(c).contains("informacion general"));
        let has_id = cells().any(|c| ID_LABEL.is_match(c));
        let has_tipo = cells().any(|c| TIPO_LABEL.is_match(c));
        has_title || (has_id && has_tipo)
    });
    found.or(if tables.is_empty() { None } else { Some(0) })
}

/// Where a label was found in a row, and the value that goes with it.
pub(crate) fn value_in_row(row: &TextRow, label: &str) -> Option<String> {
    let wanted = fold_key(label);
    for (c, cell) in row.iter().enumerate() {
        let text = strip_marker(cell);

        // "Label: value" in one cell
        if let Some(caps) = KEY_VALUE.captures(text) {
            let value = caps[2].trim();
            if !value.is_empty() && fold_key(strip_marker(&caps[1])) == wanted {
                return Some(value.to_string());
            }
        }

        // "Label" | "value" in sibling cells, or a bare "Label:"
        if fold_key(strip_trailing_colon(text)) == wanted {
            let sibling = row.get(c + 1).map(|s| s.trim()).unwrap_or("");
            let value = if KEY_VALUE.is_match(sibling) { "" } else { sibling };
            return Some(value.to_string());
        }
    }
    None
}

/// Find a labeled header value anywhere in the table.
///
/// `None` when the label never appears; `Some("")` when it appears without
/// a value.
pub fn find_labeled_value(table: &TextTable, label: &str) -> Option<String> {
    table.iter().find_map(|row| value_in_row(row, label))
}

/// Extract the header fields present in the table.
pub fn extract_header_fields(table: &TextTable) -> Vec<Field> {
    HEADER_FIELDS
        .iter()
        .filter_map(|(key, label)| {
            find_labeled_value(table, label).map(|value| Field::text(*key, *label, value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: &[&[&str]]) -> TextTable {
        rows.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_empty_value_is_still_a_field() {
        let t = table(&[&["ID de Cambio: CHG-0042", "*Tipo de Requerimiento:"]]);
        let fields = extract_header_fields(&t);
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[1].label, "Tipo de Requerimiento");
        assert_eq!(fields[1].value.as_text(), "");
        assert_eq!(fields[0].value.as_text(), "CHG-0042");
    }

    #[test]
    fn test_sibling_cells() {
        let t = table(&[
            &["*ID de Cambio", "CHG-7"],
            &["Tipo de Requerimiento:", "Normal"],
        ]);
        assert_eq!(find_labeled_value(&t, "ID de Cambio").as_deref(), Some("CHG-7"));
        assert_eq!(
            find_labeled_value(&t, "Tipo de Requerimiento").as_deref(),
            Some("Normal")
        );
    }

    #[test]
    fn test_sibling_that_looks_like_key_value_is_not_taken() {
        let t = table(&[&["ID de Cambio", "Tipo de Requerimiento: Estándar"]]);
        assert_eq!(find_labeled_value(&t, "ID de Cambio").as_deref(), Some(""));
        assert_eq!(
            find_labeled_value(&t, "Tipo de Requerimiento").as_deref(),
            Some("Estándar")
        );
    }

    #[test]
    fn test_missing_label_is_omitted() {
        let t = table(&[&["ID de Cambio: 1"]]);
        let fields = extract_header_fields(&t);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].key, "id-cambio");
    }

    #[test]
    fn test_find_header_table() {
        let other = table(&[&["Paso", "Objeto a instalar"]]);
        let header = table(&[&["ID de Cambio:"], &["*Tipo de Requerimiento:"]]);
        assert_eq!(find_header_table(&[other.clone(), header]), Some(1));
        assert_eq!(find_header_table(&[other]), Some(0));
        assert_eq!(find_header_table(&[]), None);
    }
}
