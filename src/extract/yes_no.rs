//! "Afectación a otras áreas" block and the supplier block.

use crate::catalog::{KEY_OTROS, KEY_PARTICIPA_PROVEEDOR, LABEL_OTROS, LABEL_PARTICIPA_PROVEEDOR};
use crate::model::{yes_no_options, Field, TextRow, TextTable};
use crate::normalize::text::{collapse_ws, fold_key, strip_trailing_colon};
use crate::normalize::yes_no::to_yes_no;
use once_cell::sync::Lazy;
use regex::Regex;

static BLOCK_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^afectaci[óo]n a otras [áa]reas\s*:?$").unwrap());
static COUNTRIES_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^afectaci[óo]n a los pa[ií]ses de la regi[óo]n\s*:?$").unwrap());
static SUPPLIERS_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^participaci[óo]n de proveedores\s*:?$").unwrap());
static ORDINAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.\s*(.+)$").unwrap());
static HELP_ROW: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^respuesta\s*:\s*s[ií]\s*/\s*no$").unwrap());
static OTROS_LABEL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^otros\b\s*:?\s*(.*)$").unwrap());

fn first_cell(row: &TextRow) -> &str {
    row.first().map(|s| s.as_str()).unwrap_or("")
}

/// Check if a row opens the yes/no block.
pub fn is_block_start(row: &TextRow) -> bool {
    BLOCK_START.is_match(first_cell(row).trim())
}

/// Check if a row opens a block that ends the yes/no block.
pub fn is_sibling_marker(row: &TextRow) -> bool {
    let left = first_cell(row).trim();
    COUNTRIES_BLOCK.is_match(left) || SUPPLIERS_BLOCK.is_match(left)
}

/// Check if a row is the "Respuesta: SI/NO" instruction row.
pub fn is_help_row(row: &TextRow) -> bool {
    row.iter().any(|c| HELP_ROW.is_match(c.trim()))
}

/// Row label with a leading ordinal and a trailing colon removed.
pub fn row_label(cell: &str) -> String {
    let cell = collapse_ws(cell);
    let unnumbered = match ORDINAL.captures(&cell) {
        Some(caps) => caps[1].to_string(),
        None => cell.clone(),
    };
    strip_trailing_colon(&unnumbered).to_string()
}

/// Stable key of a yes/no row: lower case, whitespace runs as `-`.
pub fn label_key(label: &str) -> String {
    label.to_lowercase().split_whitespace().collect::<Vec<_>>().join("-")
}

/// Last non-empty cell after the label cell.
pub fn answer_cell(row: &TextRow) -> Option<&str> {
    row.iter()
        .skip(1)
        .rev()
        .map(|c| c.trim())
        .find(|c| !c.is_empty())
}

/// Value of an "Otros" row: the second cell, else the text after "Otros:".
pub fn otros_value(row: &TextRow) -> Option<String> {
    let caps = OTROS_LABEL.captures(first_cell(row).trim())?;
    if row.len() >= 2 {
        Some(collapse_ws(&row[1]))
    } else {
        Some(collapse_ws(&caps[1]))
    }
}

/// Extract the yes/no block of a table.
///
/// Empty when the table has no "Afectación a otras áreas" row.
pub fn extract_other_areas(table: &TextTable) -> Vec<Field> {
    let Some(start) = table.iter().position(is_block_start) else {
        return Vec::new();
    };

    let mut fields = Vec::new();
    for row in &table[start + 1..] {
        if is_sibling_marker(row) {
            break;
        }
        if row.iter().all(|c| c.trim().is_empty()) || is_help_row(row) {
            continue;
        }

        if let Some(value) = otros_value(row) {
            fields.push(Field::text(KEY_OTROS, LABEL_OTROS, value));
            continue;
        }

        let label = row_label(first_cell(row));
        if label.is_empty() {
            continue;
        }
        let value = to_yes_no(answer_cell(row).unwrap_or(""));
        fields.push(Field::select(label_key(&label), label, value, yes_no_options()));
    }
    fields
}

/// Extract "Participa Proveedor" from the supplier block.
///
/// Uses a row labeled "Participa Proveedor" inside the block when there is
/// one, otherwise the second (or first) cell of the row after the marker.
pub fn extract_supplier(table: &TextTable) -> Option<Field> {
    let marker = table
        .iter()
        .position(|r| SUPPLIERS_BLOCK.is_match(first_cell(r).trim()))?;
    let block = &table[marker + 1..];

    let labeled = block
        .iter()
        .take_while(|r| !is_block_start(r) && !is_sibling_marker(r))
        .find(|r| fold_key(&row_label(first_cell(r))) == fold_key(LABEL_PARTICIPA_PROVEEDOR));

    let raw = match labeled {
        Some(row) => answer_cell(row).unwrap_or("").to_string(),
        None => {
            let next = block.first()?;
            next.get(1)
                .filter(|c| !c.trim().is_empty())
                .or_else(|| next.first())
                .cloned()
                .unwrap_or_default()
        }
    };

    Some(Field::select(
        KEY_PARTICIPA_PROVEEDOR,
        LABEL_PARTICIPA_PROVEEDOR,
        to_yes_no(&raw),
        yes_no_options(),
    ))
}
