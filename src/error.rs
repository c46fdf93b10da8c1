//! Error types for the manualdoc library.

use std::io;
use thiserror::Error;

/// Result type alias for manualdoc operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading or filling a manual template.
///
/// Per-field misses during export are not errors; they are reported through
/// [`crate::docx::WriteOutcome`] and leave the template untouched in that spot.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error reading or writing the ZIP archive.
    #[error("ZIP archive error: {0}")]
    ZipArchive(String),

    /// Error parsing or serializing XML content.
    #[error("XML parse error: {0}")]
    XmlParse(String),

    /// Error reading or writing JSON.
    #[error("JSON error: {0}")]
    Json(String),

    /// A required part or element of the package is absent.
    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    /// The byte adapter could not recognize the input's transport shape.
    #[error("Unsupported input shape: {0}")]
    UnsupportedInputShape(String),

    /// Export was requested before any template was opened.
    #[error("No template loaded")]
    NoTemplateLoaded,

    /// Export was requested with no sections to write.
    #[error("No sections to export")]
    NoSectionsToExport,
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::ZipArchive(err.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::XmlParse(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::NoTemplateLoaded;
        assert_eq!(err.to_string(), "No template loaded");

        let err = Error::MalformedDocument("word/document.xml".to_string());
        assert_eq!(err.to_string(), "Malformed document: word/document.xml");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_error_from_json() {
        let err: Error = serde_json::from_str::<u8>("nope").unwrap_err().into();
        assert!(matches!(err, Error::Json(_)));
    }
}
