//! Whitespace and diacritic folding.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

static SLASH_SPACING: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*/\s*").unwrap());

/// Collapse whitespace runs (NBSP included) to one space and trim.
pub fn collapse_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Remove diacritics by NFD decomposition.
pub fn strip_accents(s: &str) -> String {
    s.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Comparison key: lower case, no diacritics, whitespace collapsed.
///
/// ```
/// use manualdoc::normalize::text::fold_key;
///
/// assert_eq!(fold_key("  Notificó al  NOC "), "notifico al noc");
/// ```
pub fn fold_key(s: &str) -> String {
    collapse_ws(&strip_accents(&s.to_lowercase()))
}

/// Like [`fold_key`], with spacing around `/` removed.
pub fn fold_group_key(s: &str) -> String {
    SLASH_SPACING.replace_all(&fold_key(s), "/").into_owned()
}

/// Drop leading marker glyphs (`*`) and the spacing after them.
pub fn strip_marker(s: &str) -> &str {
    s.trim_start().trim_start_matches('*').trim_start()
}

/// Drop one trailing colon and the spacing around it.
pub fn strip_trailing_colon(s: &str) -> &str {
    let trimmed = s.trim_end();
    trimmed.strip_suffix(':').unwrap_or(trimmed).trim_end()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_ws() {
        assert_eq!(collapse_ws("  a \t b\n\u{00A0}c  "), "a b c");
        assert_eq!(collapse_ws(""), "");
    }

    #[test]
    fn test_fold_key() {
        assert_eq!(fold_key("Afectación a otras ÁREAS"), "afectacion a otras areas");
        assert_eq!(fold_key("País-Afectado"), "pais-afectado");
    }

    #[test]
    fn test_fold_group_key() {
        assert_eq!(fold_group_key("Middleware / OSB"), fold_group_key("middleware/osb"));
    }

    #[test]
    fn test_strip_marker() {
        assert_eq!(strip_marker("*Tipo de Requerimiento:"), "Tipo de Requerimiento:");
        assert_eq!(strip_marker(" ** ID"), "ID");
        assert_eq!(strip_marker("ID"), "ID");
    }

    #[test]
    fn test_strip_trailing_colon() {
        assert_eq!(strip_trailing_colon("Afecta DWH: "), "Afecta DWH");
        assert_eq!(strip_trailing_colon("Otros"), "Otros");
    }
}
