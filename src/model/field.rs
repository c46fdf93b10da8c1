//! Editable field and section models.

use crate::normalize::text::fold_key;
use serde::{Deserialize, Deserializer, Serialize};

/// How a field is edited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Free text
    #[default]
    Text,
    /// One value out of `options`
    Select,
    /// A subset of `options`
    Multiselect,
}

impl FieldKind {
    fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "select" => FieldKind::Select,
            "multiselect" => FieldKind::Multiselect,
            _ => FieldKind::Text,
        }
    }
}

/// Missing, null or unknown kinds read as text.
fn lenient_kind<'de, D>(deserializer: D) -> std::result::Result<FieldKind, D::Error>
where
    D: Deserializer<'de>,
{
    let name = Option::<String>::deserialize(deserializer)?;
    Ok(name.as_deref().map(FieldKind::from_name).unwrap_or_default())
}

/// A field value: one string, or an ordered set of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Single value
    Text(String),
    /// Multiple values
    Multi(Vec<String>),
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::Text(String::new())
    }
}

impl FieldValue {
    /// The value as one string; multiple values are joined with ", ".
    pub fn as_text(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Multi(items) => items.join(", "),
        }
    }

    /// The value as a list; a single empty string yields an empty list.
    pub fn as_list(&self) -> Vec<String> {
        match self {
            FieldValue::Text(s) if s.trim().is_empty() => Vec::new(),
            FieldValue::Text(s) => vec![s.clone()],
            FieldValue::Multi(items) => items.clone(),
        }
    }

    /// Check if there is no value.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::Multi(items) => items.iter().all(|s| s.trim().is_empty()),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(items: Vec<String>) -> Self {
        FieldValue::Multi(items)
    }
}

/// A selectable option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOption {
    /// Stored value
    pub value: String,
    /// Display label
    pub label: String,
}

impl FieldOption {
    /// Create an option.
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// The SI/NO option pair.
pub fn yes_no_options() -> Vec<FieldOption> {
    vec![FieldOption::new("SI", "SI"), FieldOption::new("NO", "NO")]
}

/// An editable field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Stable identifier, e.g. `id-cambio`
    pub key: String,
    /// Display label
    pub label: String,
    #[serde(default, deserialize_with = "lenient_kind")]
    pub kind: FieldKind,
    #[serde(default)]
    pub value: FieldValue,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<FieldOption>,
}

impl Field {
    /// Create a free-text field.
    pub fn text(key: impl Into<String>, label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            kind: FieldKind::Text,
            value: FieldValue::Text(value.into()),
            options: Vec::new(),
        }
    }

    /// Create a single-choice field.
    pub fn select(
        key: impl Into<String>,
        label: impl Into<String>,
        value: impl Into<String>,
        options: Vec<FieldOption>,
    ) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            kind: FieldKind::Select,
            value: FieldValue::Text(value.into()),
            options,
        }
    }

    /// Create a multi-choice field.
    pub fn multiselect(
        key: impl Into<String>,
        label: impl Into<String>,
        values: Vec<String>,
        options: Vec<FieldOption>,
    ) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            kind: FieldKind::Multiselect,
            value: FieldValue::Multi(values),
            options,
        }
    }

    /// Check the key against another, ignoring case, accents and spacing.
    pub fn has_key(&self, key: &str) -> bool {
        fold_key(&self.key) == fold_key(key)
    }
}

/// A titled group of fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub fields: Vec<Field>,
}

impl Section {
    /// Create an empty section.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            fields: Vec::new(),
        }
    }

    /// First field whose key matches.
    pub fn field(&self, key: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.has_key(key))
    }

    /// First field whose key matches, mutably.
    pub fn field_mut(&mut self, key: &str) -> Option<&mut Field> {
        self.fields.iter_mut().find(|f| f.has_key(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_untagged_json() {
        let single: FieldValue = serde_json::from_str("\"SI\"").unwrap();
        assert_eq!(single, FieldValue::Text("SI".into()));

        let multi: FieldValue = serde_json::from_str("[\"HN\",\"PA\"]").unwrap();
        assert_eq!(multi, FieldValue::Multi(vec!["HN".into(), "PA".into()]));
    }

    #[test]
    fn test_missing_or_unknown_kind_is_text() {
        let field: Field =
            serde_json::from_str(r#"{"key":"x","label":"X","value":"1"}"#).unwrap();
        assert_eq!(field.kind, FieldKind::Text);

        let field: Field =
            serde_json::from_str(r#"{"key":"x","label":"X","kind":"slider","value":"1"}"#)
                .unwrap();
        assert_eq!(field.kind, FieldKind::Text);

        let field: Field =
            serde_json::from_str(r#"{"key":"x","label":"X","kind":"select"}"#).unwrap();
        assert_eq!(field.kind, FieldKind::Select);
        assert_eq!(field.value, FieldValue::default());
    }

    #[test]
    fn test_field_serializes_kind_lowercase() {
        let field = Field::select("afecta-dwh", "Afecta DWH", "NO", yes_no_options());
        let json = serde_json::to_value(&field).unwrap();
        assert_eq!(json["kind"], "select");
        assert_eq!(json["options"][0]["value"], "SI");
    }

    #[test]
    fn test_has_key_folds() {
        let field = Field::text("País-Afectado", "País", "");
        assert!(field.has_key("pais-afectado"));
    }

    #[test]
    fn test_as_list() {
        assert!(FieldValue::Text("  ".into()).as_list().is_empty());
        assert_eq!(FieldValue::Text("HN".into()).as_list(), vec!["HN"]);
    }
}
