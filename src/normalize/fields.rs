//! Post-parse canonicalization of sections.

use super::country::{codes_to_strings, to_country_codes};
use super::text::fold_key;
use super::yes_no::to_yes_no;
use crate::catalog::{country_options, INFO_GENERAL_ID, YES_NO_KEY_FRAGMENTS};
use crate::model::{yes_no_options, Field, FieldKind, FieldValue, Section};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

static OTROS_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^\s*otros\s*:?\s*").unwrap());
static ONLY_COLONS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*:*\s*$").unwrap());

/// Dedup sections by id.
///
/// A repeated id keeps the position of its first occurrence and the
/// content of its last.
pub fn dedup_sections(sections: Vec<Section>) -> Vec<Section> {
    let mut out: Vec<Section> = Vec::with_capacity(sections.len());
    let mut index: HashMap<String, usize> = HashMap::new();
    for section in sections {
        match index.get(&section.id) {
            Some(&i) => out[i] = section,
            None => {
                index.insert(section.id.clone(), out.len());
                out.push(section);
            }
        }
    }
    out
}

/// Dedup sections, then canonicalize the general-information section.
pub fn normalize_sections(sections: Vec<Section>) -> Vec<Section> {
    dedup_sections(sections)
        .into_iter()
        .map(|section| {
            if section.id == INFO_GENERAL_ID {
                normalize_info_general(section)
            } else {
                section
            }
        })
        .collect()
}

/// Canonicalize every field of the general-information section.
pub fn normalize_info_general(mut section: Section) -> Section {
    section.fields = section.fields.into_iter().map(normalize_field).collect();
    section
}

/// Folded key with `-` read as a space.
fn spaced_key(key: &str) -> String {
    fold_key(&key.replace('-', " "))
}

/// Check if a key names one of the fixed yes/no fields.
pub fn is_yes_no_key(key: &str) -> bool {
    let key = spaced_key(key);
    YES_NO_KEY_FRAGMENTS.iter().any(|k| key.contains(k))
}

/// Check if a key names the country field.
pub fn is_country_key(key: &str) -> bool {
    spaced_key(key).contains("pais afectado")
}

/// Check if a key names the free-text "Otros" field.
pub fn is_otros_key(key: &str) -> bool {
    let key = fold_key(key);
    key == "otros" || key == "otros:"
}

/// Strip a leading "Otros:" label; a bare colon reads as empty.
pub fn clean_otros(text: &str) -> String {
    let clean = OTROS_PREFIX.replace(text, "");
    if ONLY_COLONS.is_match(&clean) {
        String::new()
    } else {
        clean.into_owned()
    }
}

/// Canonicalize one field.
pub fn normalize_field(field: Field) -> Field {
    if is_country_key(&field.key) {
        let codes = to_country_codes(&field.value);
        return Field {
            kind: FieldKind::Multiselect,
            value: FieldValue::Multi(codes_to_strings(&codes)),
            options: country_options(),
            ..field
        };
    }

    if is_otros_key(&field.key) {
        let text = match &field.value {
            FieldValue::Text(s) => clean_otros(s),
            FieldValue::Multi(_) => String::new(),
        };
        return Field {
            kind: FieldKind::Text,
            value: FieldValue::Text(text),
            options: Vec::new(),
            ..field
        };
    }

    if is_yes_no_key(&field.key) {
        let value = to_yes_no(&field.value.as_text());
        return Field {
            kind: FieldKind::Select,
            value: FieldValue::Text(value.to_string()),
            options: yes_no_options(),
            ..field
        };
    }

    field
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_keeps_first_position_last_content() {
        let mut a2 = Section::new("a", "A (second)");
        a2.fields.push(Field::text("x", "X", "2"));
        let sections = vec![Section::new("a", "A"), Section::new("b", "B"), a2];

        let out = dedup_sections(sections);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].id, "a");
        assert_eq!(out[0].title, "A (second)");
        assert_eq!(out[1].id, "b");
    }

    #[test]
    fn test_country_field_becomes_multiselect() {
        let field = normalize_field(Field::select("pais-afectado", "País afectado", "HN", vec![]));
        assert_eq!(field.kind, FieldKind::Multiselect);
        assert_eq!(field.value, FieldValue::Multi(vec!["HN".into()]));
        assert_eq!(field.options.len(), 5);
    }

    #[test]
    fn test_otros_prefix_stripped() {
        assert_eq!(clean_otros("Otros: migración"), "migración");
        assert_eq!(clean_otros("otros"), "");
        assert_eq!(clean_otros(" : "), "");
        assert_eq!(clean_otros("texto libre"), "texto libre");
    }

    #[test]
    fn test_yes_no_keys_with_dashes_and_accents() {
        assert!(is_yes_no_key("afecta-dwh"));
        assert!(is_yes_no_key("notificó-al-noc-sobre-los-servicios-a-monitorear"));
        assert!(is_yes_no_key("Participa Proveedor"));
        assert!(!is_yes_no_key("id-cambio"));

        let field = normalize_field(Field::text("es-regulatorio", "Es Regulatorio", "sí"));
        assert_eq!(field.kind, FieldKind::Select);
        assert_eq!(field.value, FieldValue::Text("SI".into()));
    }

    #[test]
    fn test_other_fields_pass_through() {
        let field = Field::text("id-cambio", "ID de Cambio", " CHG-1 ");
        assert_eq!(normalize_field(field.clone()), field);
    }

    #[test]
    fn test_only_info_general_is_normalized() {
        let mut other = Section::new("otra", "Otra");
        other.fields.push(Field::text("afecta-dwh", "Afecta DWH", "tal vez"));
        let out = normalize_sections(vec![other.clone()]);
        assert_eq!(out, vec![other]);
    }
}
