//! Heuristic extractors over table and paragraph text.
//!
//! Every extractor works on the text projection of the body
//! ([`TextTable`](crate::model::TextTable) rows of cell strings) and is an
//! independent function, so each can be tested against hand-written rows.

pub mod country;
pub mod header;
pub mod info_general;
pub mod key_values;
#[cfg(feature = "pieces")]
pub mod pieces;
pub mod yes_no;

pub use info_general::build_info_general;
pub use key_values::extract_key_values;
#[cfg(feature = "pieces")]
pub use pieces::extract_pieces;

use crate::model::TextTable;
use once_cell::sync::Lazy;
use regex::Regex;

/// "Label: value" in one cell; the value may be empty.
pub(crate) static KEY_VALUE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([^:]{2,120}):\s*(.*)$").unwrap());

/// Tables in search order: the header table first, then the rest in
/// document order.
pub(crate) fn header_first(
    tables: &[TextTable],
    header: Option<usize>,
) -> impl Iterator<Item = &TextTable> + Clone {
    let first = header.and_then(|i| tables.get(i));
    first.into_iter().chain(
        tables
            .iter()
            .enumerate()
            .filter(move |(i, _)| Some(*i) != header)
            .map(|(_, t)| t),
    )
}
