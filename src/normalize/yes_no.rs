//! Two-valued SI/NO answers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A yes/no answer. There is no third state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum YesNo {
    #[serde(rename = "SI")]
    Si,
    #[default]
    #[serde(rename = "NO")]
    No,
}

impl YesNo {
    /// Read any text as an answer.
    ///
    /// Case-insensitive; "SÍ" counts as "SI"; everything else is "NO".
    pub fn parse(value: &str) -> Self {
        let upper = value.trim().to_uppercase().replace('Í', "I");
        if upper == "SI" {
            YesNo::Si
        } else {
            YesNo::No
        }
    }

    /// Canonical text.
    pub fn as_str(&self) -> &'static str {
        match self {
            YesNo::Si => "SI",
            YesNo::No => "NO",
        }
    }
}

impl fmt::Display for YesNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical SI/NO text for any input.
pub fn to_yes_no(value: &str) -> &'static str {
    YesNo::parse(value).as_str()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_affirmative_spellings() {
        for input in ["SI", "si", "Sí", "SÍ", " sI "] {
            assert_eq!(to_yes_no(input), "SI", "input {:?}", input);
        }
    }

    #[test]
    fn test_everything_else_is_no() {
        for input in ["", "NO", "no", "X", "Sin respuesta", "SII", "S I", "yes"] {
            assert_eq!(to_yes_no(input), "NO", "input {:?}", input);
        }
    }

    #[test]
    fn test_total_and_two_valued() {
        let samples = ["", "SI", "sí", "No", "Respuesta: SI/NO", "✔", "N/A", "sÍ", "\u{00A0}"];
        for input in samples {
            let out = to_yes_no(input);
            assert!(out == "SI" || out == "NO");
            assert_eq!(to_yes_no(input), to_yes_no(&input.replace('í', "i")));
        }
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&YesNo::Si).unwrap(), "\"SI\"");
    }
}
