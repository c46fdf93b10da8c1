//! DOCX (Word) template access.
//!
//! The body part is parsed into a mutable tree ([`tree`]); [`walker`] lists
//! its paragraphs and tables, [`text`] reads their text, [`parser`] runs the
//! extractors and [`writer`] fills the same tree back in place.

pub mod parser;
pub mod text;
pub mod tree;
pub mod walker;
pub mod writer;

#[cfg(test)]
pub(crate) mod fixtures;

pub use parser::{extract_manual, DocxParser};
pub use tree::{XmlDocument, XmlElement, XmlNode};
pub use walker::{build_document, walk, NodeRef, NodePath};
pub use writer::{set_cell_text, DocxWriter, FieldWrite, WriteOutcome, WriteReport};
