//! Piece status normalization.

use super::text::collapse_ws;

pub const NUEVO: &str = "Nuevo";
pub const MODIFICADO: &str = "Modificado";

fn says_new(lower: &str) -> bool {
    lower.contains("nuevo")
}

fn says_modified(lower: &str) -> bool {
    lower.contains("modificad")
}

/// Classify a status text as "Nuevo" or "Modificado".
///
/// Text mentioning both or neither is returned trimmed as-is.
///
/// ```
/// use manualdoc::normalize::status::normalize_status;
///
/// assert_eq!(normalize_status("Modificado (cambio de lógica)"), "Modificado");
/// assert_eq!(normalize_status(" nuevo "), "Nuevo");
/// assert_eq!(normalize_status("Nuevo o Modificado"), "Nuevo o Modificado");
/// ```
pub fn normalize_status(raw: &str) -> String {
    let text = collapse_ws(raw);
    match classify(&text) {
        Some(status) => status.to_string(),
        None => text,
    }
}

/// Guess a status from the texts of a whole row, falling back to `default`.
pub fn guess_status(row: &[String], default: &str) -> String {
    let joined = collapse_ws(&row.join(" "));
    classify(&joined).unwrap_or(default).to_string()
}

fn classify(text: &str) -> Option<&'static str> {
    let lower = text.to_lowercase();
    match (says_new(&lower), says_modified(&lower)) {
        (true, false) => Some(NUEVO),
        (false, true) => Some(MODIFICADO),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_status() {
        assert_eq!(normalize_status("NUEVO"), NUEVO);
        assert_eq!(normalize_status("modificada"), MODIFICADO);
        assert_eq!(normalize_status(""), "");
        assert_eq!(normalize_status("  Eliminado "), "Eliminado");
    }

    #[test]
    fn test_guess_status() {
        let row = vec!["1".to_string(), "Instalar app.jar (nuevo)".to_string()];
        assert_eq!(guess_status(&row, MODIFICADO), NUEVO);

        let row = vec!["Listado (Nuevos / Modificados)".to_string()];
        assert_eq!(guess_status(&row, MODIFICADO), MODIFICADO);

        let row = vec!["Ejecutar script".to_string()];
        assert_eq!(guess_status(&row, "X"), "X");
    }
}
