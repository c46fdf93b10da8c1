//! Country selection block.
//!
//! The primary layout is a header row with the five country tokens and a
//! marker row directly below it. Older templates put the marks on a row
//! starting with "Seleccionar país afectado", with the tokens one or two
//! rows above; that layout is only read when no primary header row exists.

use crate::model::{TextRow, TextTable};
use crate::normalize::country::{collapse, CountryCode};
use crate::normalize::text::fold_key;

/// Column of each country token found in a row.
///
/// A token matches as a whole word, case-insensitively; the first cell
/// holding it wins.
pub fn country_columns(row: &TextRow) -> Vec<(CountryCode, usize)> {
    CountryCode::ALL
        .into_iter()
        .filter_map(|code| {
            row.iter()
                .position(|cell| has_token(cell, code.as_str()))
                .map(|i| (code, i))
        })
        .collect()
}

fn has_token(cell: &str, token: &str) -> bool {
    cell.split(|c: char| !c.is_alphanumeric())
        .any(|word| word.eq_ignore_ascii_case(token))
}

/// Check if a row holds all five country tokens.
pub fn is_country_header(row: &TextRow) -> bool {
    country_columns(row).len() == CountryCode::ALL.len()
}

/// Check if a cell reads as a selection mark.
pub fn is_marked(cell: &str) -> bool {
    matches!(
        cell.trim().to_uppercase().as_str(),
        "X" | "SI" | "SÍ" | "✔" | "✓"
    )
}

fn marked_codes(columns: &[(CountryCode, usize)], marks: Option<&TextRow>) -> Vec<CountryCode> {
    let Some(marks) = marks else {
        return Vec::new();
    };
    columns
        .iter()
        .filter(|(_, i)| marks.get(*i).is_some_and(|c| is_marked(c)))
        .map(|(code, _)| *code)
        .collect()
}

/// Read the primary header/marker pair.
///
/// `None` when the table has no row with all five tokens. A header without
/// marks reads as `{REG}`.
pub fn extract_primary(table: &TextTable) -> Option<Vec<CountryCode>> {
    let header = table.iter().position(is_country_header)?;
    let columns = country_columns(&table[header]);
    let marked = marked_codes(&columns, table.get(header + 1));
    Some(collapse(&marked))
}

/// Read the "Seleccionar país afectado" row.
pub fn extract_fallback(table: &TextTable) -> Option<Vec<CountryCode>> {
    let select = table.iter().position(|r| {
        r.first()
            .is_some_and(|c| fold_key(c).starts_with("seleccionar pais afectado"))
    })?;

    let header = [1, 2]
        .into_iter()
        .filter_map(|back| select.checked_sub(back))
        .map(|i| &table[i])
        .find(|r| !country_columns(r).is_empty())?;

    let columns = country_columns(header);
    let marked = marked_codes(&columns, table.get(select));
    Some(collapse(&marked))
}

/// Read the country selection, primary layout first.
pub fn extract_countries(table: &TextTable) -> Option<Vec<CountryCode>> {
    extract_primary(table).or_else(|| extract_fallback(table))
}

/// Read the country selection across tables in the given order.
///
/// A primary block in any table beats a fallback row in an earlier one.
pub fn extract_countries_in<'a, I>(tables: I) -> Option<Vec<CountryCode>>
where
    I: IntoIterator<Item = &'a TextTable>,
    I::IntoIter: Clone,
{
    let tables = tables.into_iter();
    tables
        .clone()
        .find_map(extract_primary)
        .or_else(|| tables.clone().find_map(extract_fallback))
}
