//! Document model structures.

use super::{Paragraph, Table, TextTable};
use crate::normalize::text::collapse_ws;
use serde::{Deserialize, Serialize};

/// A block of the document body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DocumentNode {
    /// A paragraph of text
    Paragraph(Paragraph),
    /// A table
    Table(Table),
}

/// The ordered blocks of a document body.
///
/// Built fresh on every parse and never mutated afterwards; the writer works
/// on the XML tree instead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Blocks in document order
    #[serde(default)]
    pub nodes: Vec<DocumentNode>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Iterate the paragraphs.
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.nodes.iter().filter_map(|n| match n {
            DocumentNode::Paragraph(p) => Some(p),
            _ => None,
        })
    }

    /// Iterate the tables, nested tables included.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.nodes.iter().filter_map(|n| match n {
            DocumentNode::Table(t) => Some(t),
            _ => None,
        })
    }

    /// Non-empty paragraph texts with whitespace collapsed.
    pub fn paragraph_texts(&self) -> Vec<String> {
        self.paragraphs()
            .map(|p| collapse_ws(&p.plain_text()))
            .filter(|t| !t.is_empty())
            .collect()
    }

    /// Every non-empty table as rows of cell texts.
    pub fn text_tables(&self) -> Vec<TextTable> {
        self.tables()
            .filter(|t| !t.is_empty())
            .map(|t| t.text_rows())
            .collect()
    }
}
