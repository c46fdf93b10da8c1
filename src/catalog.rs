//! Fixed vocabulary of the change-manual template family.
//!
//! Field keys and labels, the country option list, known repository names
//! and the extension table shared by document pieces and repository
//! changes.

use crate::model::FieldOption;
use once_cell::sync::Lazy;
use regex::Regex;

/// Section id of the general-information block.
pub const INFO_GENERAL_ID: &str = "informacion-general";

/// Title of the general-information block.
pub const INFO_GENERAL_TITLE: &str = "Información general";

pub const KEY_ID_CAMBIO: &str = "id-cambio";
pub const KEY_TIPO_REQUERIMIENTO: &str = "tipo-requerimiento";
pub const KEY_OTROS: &str = "otros";
pub const KEY_PAIS_AFECTADO: &str = "pais-afectado";
pub const KEY_PARTICIPA_PROVEEDOR: &str = "participa-proveedor";

pub const LABEL_ID_CAMBIO: &str = "ID de Cambio";
pub const LABEL_TIPO_REQUERIMIENTO: &str = "Tipo de Requerimiento";
pub const LABEL_OTROS: &str = "Otros";
pub const LABEL_PAIS_AFECTADO: &str = "País afectado";
pub const LABEL_PARTICIPA_PROVEEDOR: &str = "Participa Proveedor";

/// Marker row of the yes/no block.
pub const MARKER_OTHER_AREAS: &str = "Afectación a otras áreas";

/// Column header holding the yes/no answers.
pub const MARKER_ANSWER_COLUMN: &str = "Respuesta: SI/NO";

/// Display order of the general-information fields. Unknown keys go last.
pub const FIELD_ORDER: &[&str] = &[
    KEY_ID_CAMBIO,
    KEY_TIPO_REQUERIMIENTO,
    "afecta-dwh",
    "afecta-cierre",
    "afecta-robot",
    "notificó-al-noc-sobre-los-servicios-a-monitorear",
    "es-regulatorio",
    KEY_OTROS,
    KEY_PAIS_AFECTADO,
    KEY_PARTICIPA_PROVEEDOR,
];

/// Yes/no fields the writer fills: key and the row label in the template.
pub const YES_NO_FIELDS: &[(&str, &str)] = &[
    ("afecta-dwh", "Afecta DWH"),
    ("afecta-cierre", "Afecta Cierre"),
    ("afecta-robot", "Afecta Robot"),
    (
        "notificó-al-noc-sobre-los-servicios-a-monitorear",
        "Notificó al NOC sobre los servicios a monitorear",
    ),
    ("es-regulatorio", "Es Regulatorio"),
    (KEY_PARTICIPA_PROVEEDOR, LABEL_PARTICIPA_PROVEEDOR),
];

/// Folded key fragments that mark a field as yes/no.
pub const YES_NO_KEY_FRAGMENTS: &[&str] = &[
    "afecta dwh",
    "afecta cierre",
    "afecta robot",
    "notifico al noc",
    "es regulatorio",
    "participa proveedor",
];

/// Options of the country field.
pub fn country_options() -> Vec<FieldOption> {
    vec![
        FieldOption::new("REG", "Regional (REG)"),
        FieldOption::new("HN", "Honduras (HN)"),
        FieldOption::new("GT", "Guatemala (GT)"),
        FieldOption::new("PA", "Panamá (PA)"),
        FieldOption::new("NI", "Nicaragua (NI)"),
    ]
}

/// Group name used when no title is found near a pieces table.
pub const DEFAULT_GROUP_NAME: &str = "Piezas detalladas";

/// Status assumed for installation-table pieces when the row says nothing.
///
/// A conservative guess, not something read from the document.
pub const DEFAULT_INSTALL_STATUS: &str = "Modificado";

/// Extensions recognized as deliverable files in installation tables.
pub const KNOWN_EXTENSIONS: &[&str] = &[
    "jar", "sql", "sp", "spsql", "dtsx", "pks", "pkb", "tps", "pkg", "xml", "xqy", "xquery",
    "wsdl", "xsd", "yaml", "yml", "json", "js", "ts", "dll", "war", "ear",
];

static KNOWN_REPO: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(RGCARD|NICARD|DB12|OSB|NITRANSFER|RGTRANSFER|DATABASE[_ ]CLOUD|APLICACIONES-ESCRITORIO|SALESFORCE|COBIS|DIGITALIZACION(?:[- ]TARJETAS)?|OIC)$",
    )
    .unwrap()
});

/// Check if a name is one of the known repositories.
pub fn is_known_repo(name: &str) -> bool {
    KNOWN_REPO.is_match(name.trim())
}

/// Check if an extension is in [`KNOWN_EXTENSIONS`].
pub fn is_known_extension(ext: &str) -> bool {
    let ext = ext.to_ascii_lowercase();
    KNOWN_EXTENSIONS.contains(&ext.as_str())
}

/// Category label for a file extension.
///
/// ```
/// use manualdoc::catalog::piece_type_for_extension;
///
/// assert_eq!(piece_type_for_extension("SQL"), "Script SQL");
/// assert_eq!(piece_type_for_extension("war"), "WAR");
/// ```
pub fn piece_type_for_extension(ext: &str) -> String {
    let ext = ext.trim().trim_start_matches('.').to_ascii_lowercase();
    let label = match ext.as_str() {
        "jar" => "JAR",
        "sql" => "Script SQL",
        "sp" | "spsql" => "Stored Procedure",
        "dtsx" => "SSIS Package",
        "pks" | "pkb" | "pkg" => "Oracle Package",
        "tps" => "Oracle Type",
        "xqy" | "xquery" => "XQuery",
        "wsdl" => "WSDL",
        "xsd" => "XSD",
        "yaml" | "yml" => "YAML",
        "json" => "JSON",
        "dll" => "DLL",
        other => return other.to_uppercase(),
    };
    label.to_string()
}

/// Lower-case extension of a file name, if it has one.
pub fn file_extension(name: &str) -> Option<String> {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    match base.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => Some(ext.to_ascii_lowercase()),
        _ => None,
    }
}
