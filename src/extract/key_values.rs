//! Loose "Key: Value" pairs, kept as diagnostics next to the sections.

use crate::model::{KeyValueField, TextTable};
use crate::normalize::text::{collapse_ws, fold_key, strip_marker, strip_trailing_colon};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

static PAIR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([^:]{2,80}):\s*(.+)$").unwrap());

/// Folded key prefixes that are titles, not keys.
const IGNORED_KEYS: &[&str] = &[
    "informacion general",
    "listado de piezas detalladas",
    "repositorio",
    "paso",
];

fn is_ignored(key: &str) -> bool {
    let key = fold_key(key);
    IGNORED_KEYS.iter().any(|k| key.starts_with(k))
}

fn parse_pair(text: &str) -> Option<(String, String)> {
    let text = collapse_ws(text);
    let caps = PAIR.captures(&text)?;
    Some((strip_marker(&caps[1]).trim().to_string(), caps[2].trim().to_string()))
}

fn pairs_in_row(row: &[String]) -> Vec<(String, String)> {
    let cell = |i: usize| row.get(i).map(|c| collapse_ws(c)).unwrap_or_default();
    let (c0, c1) = (cell(0), cell(1));

    if row.len() == 1 {
        return parse_pair(&c0).into_iter().collect();
    }
    if let Some(pair) = parse_pair(&c0) {
        return vec![pair];
    }
    if c0.is_empty() {
        return parse_pair(&c1).into_iter().collect();
    }
    if !c1.is_empty() && !c0.to_lowercase().starts_with("respuesta") {
        let key = strip_trailing_colon(strip_marker(&c0)).to_string();
        if !key.is_empty() {
            return vec![(key, c1)];
        }
    }
    Vec::new()
}

/// Collect "Key: Value" pairs from paragraphs, then tables.
///
/// Keys are deduplicated case-insensitively; the first occurrence wins.
pub fn extract_key_values(paragraphs: &[String], tables: &[TextTable]) -> Vec<KeyValueField> {
    let candidates = paragraphs
        .iter()
        .filter_map(|p| parse_pair(p))
        .chain(tables.iter().flatten().flat_map(|row| pairs_in_row(row)));

    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for (key, value) in candidates {
        if key.is_empty() || is_ignored(&key) {
            continue;
        }
        if seen.insert(key.to_lowercase()) {
            out.push(KeyValueField::new(key, value));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_paragraph_pairs() {
        let paragraphs = vec![
            "Fecha: 2024-05-01".to_string(),
            "Sin separador".to_string(),
            "Paso: 1".to_string(),
        ];
        let fields = extract_key_values(&paragraphs, &[]);
        assert_eq!(fields, vec![KeyValueField::new("Fecha", "2024-05-01")]);
    }

    #[test]
    fn test_table_shapes() {
        let table = vec![
            row(&["*ID de Cambio: CHG-1"]),
            row(&["Responsable:", "Ana"]),
            row(&["", "Ambiente: PROD"]),
            row(&["Respuesta: SI/NO", "x"]),
            row(&["Afecta DWH", "SI"]),
            row(&["id de cambio: otro"]),
        ];
        let fields = extract_key_values(&[], &[table]);
        let keys: Vec<_> = fields.iter().map(|f| f.key.as_str()).collect();
        assert_eq!(
            keys,
            vec!["ID de Cambio", "Responsable", "Ambiente", "Respuesta", "Afecta DWH"]
        );
        assert_eq!(fields[0].value, "CHG-1");
        assert_eq!(fields[1].value, "Ana");
        assert_eq!(fields[3].value, "SI/NO");
    }

    #[test]
    fn test_ignored_titles() {
        let table = vec![row(&["Información General: (completar)"]), row(&["Repositorio:", "RGCARD"])];
        assert!(extract_key_values(&[], &[table]).is_empty());
    }
}
