//! Country codes and the REG collapse rule.
//!
//! The country field is either exactly `{REG}` or a non-empty subset of the
//! four concrete countries. Every function here returns a value that holds
//! that shape.

use super::text::fold_key;
use crate::model::FieldValue;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

static TOKEN_SPLIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[,\s/;|]+").unwrap());
static TRAILING_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(([A-Za-z]{2,3})\)\s*$").unwrap());

/// A country column of the template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CountryCode {
    #[serde(rename = "REG")]
    Reg,
    #[serde(rename = "HN")]
    Hn,
    #[serde(rename = "GT")]
    Gt,
    #[serde(rename = "PA")]
    Pa,
    #[serde(rename = "NI")]
    Ni,
}

impl CountryCode {
    /// Every column, in template order.
    pub const ALL: [CountryCode; 5] = [
        CountryCode::Reg,
        CountryCode::Hn,
        CountryCode::Gt,
        CountryCode::Pa,
        CountryCode::Ni,
    ];

    /// The concrete countries.
    pub const CONCRETE: [CountryCode; 4] = [
        CountryCode::Hn,
        CountryCode::Gt,
        CountryCode::Pa,
        CountryCode::Ni,
    ];

    /// Column token.
    pub fn as_str(&self) -> &'static str {
        match self {
            CountryCode::Reg => "REG",
            CountryCode::Hn => "HN",
            CountryCode::Gt => "GT",
            CountryCode::Pa => "PA",
            CountryCode::Ni => "NI",
        }
    }

    /// Parse an exact code, case-insensitively.
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(code))
    }

    /// Map one free-text token by country name or code.
    pub fn from_token(token: &str) -> Option<Self> {
        let folded = fold_key(token);
        if folded.is_empty() {
            return None;
        }
        let has_word = |w: &str| folded.split(|c: char| !c.is_alphanumeric()).any(|p| p == w);

        if folded.contains("honduras") || has_word("hn") {
            Some(CountryCode::Hn)
        } else if folded.contains("nicaragua") || has_word("ni") {
            Some(CountryCode::Ni)
        } else if folded.contains("guatemala") || has_word("gt") {
            Some(CountryCode::Gt)
        } else if folded.contains("panama") || has_word("pa") {
            Some(CountryCode::Pa)
        } else if folded.contains("reg") {
            Some(CountryCode::Reg)
        } else {
            TRAILING_CODE
                .captures(token)
                .and_then(|caps| caps.get(1))
                .and_then(|m| Self::from_code(m.as_str()))
        }
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Apply the collapse rule to any set of codes.
///
/// REG present, all four countries, or nothing at all each give `{REG}`;
/// otherwise the countries in template order.
pub fn collapse(codes: &[CountryCode]) -> Vec<CountryCode> {
    if codes.is_empty() || codes.contains(&CountryCode::Reg) {
        return vec![CountryCode::Reg];
    }
    let selected: Vec<CountryCode> = CountryCode::CONCRETE
        .into_iter()
        .filter(|c| codes.contains(c))
        .collect();
    if selected.len() == CountryCode::CONCRETE.len() {
        vec![CountryCode::Reg]
    } else {
        selected
    }
}

/// Read a field value (list or delimited text) as collapsed country codes.
///
/// ```
/// use manualdoc::model::FieldValue;
/// use manualdoc::normalize::country::{to_country_codes, CountryCode};
///
/// let value = FieldValue::Text("Honduras, Panamá".into());
/// assert_eq!(to_country_codes(&value), vec![CountryCode::Hn, CountryCode::Pa]);
/// assert_eq!(to_country_codes(&FieldValue::Text(String::new())), vec![CountryCode::Reg]);
/// ```
pub fn to_country_codes(value: &FieldValue) -> Vec<CountryCode> {
    let tokens: Vec<String> = match value {
        FieldValue::Multi(items) => items.clone(),
        FieldValue::Text(text) => TOKEN_SPLIT
            .split(text)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect(),
    };
    let codes: Vec<CountryCode> = tokens.iter().filter_map(|t| CountryCode::from_token(t)).collect();
    collapse(&codes)
}

/// Resolve an edit of the country selection.
///
/// Picking REG clears the countries; picking a country while REG was
/// selected drops REG; the result is then collapsed.
pub fn apply_country_selection(previous: &[CountryCode], next: &[CountryCode]) -> Vec<CountryCode> {
    let had_reg = previous.contains(&CountryCode::Reg);
    let has_reg = next.contains(&CountryCode::Reg);

    if has_reg && !had_reg {
        return vec![CountryCode::Reg];
    }
    if has_reg && had_reg {
        let others: Vec<CountryCode> = next
            .iter()
            .copied()
            .filter(|c| *c != CountryCode::Reg)
            .collect();
        return collapse(&others);
    }
    collapse(next)
}

/// Codes as strings, for a field value.
pub fn codes_to_strings(codes: &[CountryCode]) -> Vec<String> {
    codes.iter().map(|c| c.as_str().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use CountryCode::*;

    fn is_valid(codes: &[CountryCode]) -> bool {
        codes == [Reg] || (!codes.is_empty() && !codes.contains(&Reg))
    }

    #[test]
    fn test_tokens() {
        assert_eq!(CountryCode::from_token("Honduras (HN)"), Some(Hn));
        assert_eq!(CountryCode::from_token("Panamá"), Some(Pa));
        assert_eq!(CountryCode::from_token("ni"), Some(Ni));
        assert_eq!(CountryCode::from_token("Regional"), Some(Reg));
        assert_eq!(CountryCode::from_token("(REG)"), Some(Reg));
        assert_eq!(CountryCode::from_token("Costa Rica"), None);
    }

    #[test]
    fn test_text_and_list_inputs() {
        let text = FieldValue::Text("HN; GT | PA".into());
        assert_eq!(to_country_codes(&text), vec![Hn, Gt, Pa]);

        let list = FieldValue::Multi(vec!["Nicaragua (NI)".into(), "Honduras (HN)".into()]);
        assert_eq!(to_country_codes(&list), vec![Hn, Ni]);
    }

    #[test]
    fn test_collapse_rules() {
        assert_eq!(collapse(&[]), vec![Reg]);
        assert_eq!(collapse(&[Hn, Gt, Pa, Ni]), vec![Reg]);
        assert_eq!(collapse(&[Reg, Hn]), vec![Reg]);
        assert_eq!(collapse(&[Ni, Hn, Ni]), vec![Hn, Ni]);
    }

    #[test]
    fn test_collapse_is_total() {
        let inputs = [
            "", "REG", "HN", "hn gt pa ni", "Costa Rica", "REG, HN", "x", "panama/guatemala",
            "Regional (REG)", ";;;",
        ];
        for input in inputs {
            let codes = to_country_codes(&FieldValue::Text(input.into()));
            assert!(is_valid(&codes), "{:?} -> {:?}", input, codes);
        }
    }

    #[test]
    fn test_selection_rule() {
        // REG selected after countries
        assert_eq!(apply_country_selection(&[Hn, Gt], &[Hn, Gt, Reg]), vec![Reg]);
        // country selected while REG is on
        assert_eq!(apply_country_selection(&[Reg], &[Reg, Pa]), vec![Pa]);
        // all four concrete
        assert_eq!(apply_country_selection(&[Hn, Gt, Pa], &[Hn, Gt, Pa, Ni]), vec![Reg]);
        // cleared
        assert_eq!(apply_country_selection(&[Hn], &[]), vec![Reg]);
        // plain toggle
        assert_eq!(apply_country_selection(&[Hn], &[Hn, Ni]), vec![Hn, Ni]);
    }
}
