//! # manualdoc
//!
//! Extraction and in-place filling of DOCX change-manual templates.
//!
//! A change manual is a Word template with a header block, a yes/no block of
//! affected areas, a country block and one or more "pieces" tables listing
//! the files a change ships. This library reads those into editable
//! [`Section`]s and [`PiezasGrupo`]s, and writes edited sections back into the
//! same package, replacing only the body part.
//!
//! ## Quick Start
//!
//! ```no_run
//! use manualdoc::{fill_file, parse_file};
//!
//! let extract = parse_file("manual.docx")?;
//! println!("Sections: {}", extract.secciones_reconocidas.len());
//! println!("Pieces: {}", extract.piece_count());
//!
//! let report = fill_file("manual.docx", &extract.secciones_reconocidas, "out.docx")?;
//! println!("Missing: {:?}", report.missing().collect::<Vec<_>>());
//! # Ok::<(), manualdoc::Error>(())
//! ```
//!
//! ## Editing Sessions
//!
//! ```no_run
//! use manualdoc::EditSession;
//! use manualdoc::normalize::CountryCode;
//!
//! let mut session = EditSession::new();
//! session.open_file("manual.docx")?;
//! session.set_field_value("informacion-general", "id-cambio", "CHG-1042");
//! session.set_country_selection(&[CountryCode::Hn, CountryCode::Gt]);
//! let (path, _report) = session.export_to(".")?;
//! # Ok::<(), manualdoc::Error>(())
//! ```
//!
//! ## Features
//!
//! - `pieces` (default): pieces table detection

pub mod catalog;
pub mod changes;
pub mod container;
pub mod detect;
pub mod docx;
pub mod error;
pub mod extract;
pub mod input;
pub mod model;
pub mod normalize;
pub mod options;
pub mod render;
pub mod session;

// Re-exports
pub use changes::{ChangeKind, RepoChange, RepoStatus};
pub use container::OoxmlContainer;
pub use detect::ensure_docx;
pub use docx::{DocxParser, DocxWriter, FieldWrite, WriteOutcome, WriteReport};
pub use error::{Error, Result};
pub use input::InputShape;
pub use model::{
    Field, FieldKind, FieldOption, FieldValue, KeyValueField, ManualExtract, PiezasGrupo,
    PiezasItem, Section,
};
pub use options::{ExtractOptions, WriteOptions};
pub use session::{EditSession, DEFAULT_EXPORT_NAME};

use std::path::Path;

/// Parse a manual file.
///
/// # Example
///
/// ```no_run
/// use manualdoc::parse_file;
///
/// let extract = parse_file("manual.docx")?;
/// println!("Groups: {}", extract.piezas_detalladas.len());
/// # Ok::<(), manualdoc::Error>(())
/// ```
pub fn parse_file(path: impl AsRef<Path>) -> Result<ManualExtract> {
    let data = std::fs::read(path.as_ref())?;
    parse_bytes(&data)
}

/// Parse a manual from bytes.
///
/// # Example
///
/// ```no_run
/// use manualdoc::parse_bytes;
///
/// let data = std::fs::read("manual.docx")?;
/// let extract = parse_bytes(&data)?;
/// # Ok::<(), manualdoc::Error>(())
/// ```
pub fn parse_bytes(data: &[u8]) -> Result<ManualExtract> {
    parse_bytes_with_options(data, ExtractOptions::default())
}

/// Parse a manual from bytes with extraction options.
pub fn parse_bytes_with_options(data: &[u8], options: ExtractOptions) -> Result<ManualExtract> {
    ensure_docx(data)?;
    DocxParser::from_bytes(data.to_vec())?
        .with_options(options)
        .parse()
}

/// Parse a manual and return only its pieces groups.
pub fn extract_pieces(path: impl AsRef<Path>) -> Result<Vec<PiezasGrupo>> {
    Ok(parse_file(path)?.piezas_detalladas)
}

/// Fill template bytes with sections.
///
/// # Example
///
/// ```no_run
/// use manualdoc::{fill_bytes, parse_bytes};
///
/// let template = std::fs::read("manual.docx")?;
/// let mut sections = parse_bytes(&template)?.secciones_reconocidas;
/// if let Some(field) = sections[0].field_mut("id-cambio") {
///     field.value = "CHG-7".into();
/// }
/// let (bytes, report) = fill_bytes(&template, &sections)?;
/// std::fs::write("Manual-actualizado.docx", bytes)?;
/// # Ok::<(), manualdoc::Error>(())
/// ```
pub fn fill_bytes(template: &[u8], sections: &[Section]) -> Result<(Vec<u8>, WriteReport)> {
    ensure_docx(template)?;
    DocxWriter::from_bytes(template.to_vec()).fill(sections)
}

/// Fill a template file and write the result to `output`.
pub fn fill_file(
    template: impl AsRef<Path>,
    sections: &[Section],
    output: impl AsRef<Path>,
) -> Result<WriteReport> {
    let data = std::fs::read(template.as_ref())?;
    let (bytes, report) = fill_bytes(&data, sections)?;
    std::fs::write(output.as_ref(), bytes)?;
    Ok(report)
}
