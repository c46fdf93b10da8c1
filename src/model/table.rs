//! Table model structures.

use super::Paragraph;
use crate::normalize::text::collapse_ws;
use serde::{Deserialize, Serialize};

/// A row of cell texts.
pub type TextRow = Vec<String>;

/// A table reduced to its cell texts.
pub type TextTable = Vec<TextRow>;

/// A cell in a table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    /// Cell content (paragraphs), nested tables excluded
    #[serde(default)]
    pub content: Vec<Paragraph>,
}

impl Cell {
    /// Create a new empty cell.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cell with text content.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            content: vec![Paragraph::with_text(text)],
        }
    }

    /// Paragraph texts joined by single spaces, whitespace collapsed and trimmed.
    pub fn plain_text(&self) -> String {
        let joined = self
            .content
            .iter()
            .map(|p| p.plain_text())
            .collect::<Vec<_>>()
            .join(" ");
        collapse_ws(&joined)
    }

    /// Check if this cell is empty.
    pub fn is_empty(&self) -> bool {
        self.plain_text().is_empty()
    }
}

/// A row in a table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    /// Cells in this row
    #[serde(default)]
    pub cells: Vec<Cell>,
}

impl Row {
    /// Create a new empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a cell to this row.
    pub fn add_cell(&mut self, cell: Cell) {
        self.cells.push(cell);
    }

    /// Get the number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if the row has no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Normalized text of each cell.
    pub fn texts(&self) -> TextRow {
        self.cells.iter().map(|c| c.plain_text()).collect()
    }
}

/// A table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// Rows in this table
    #[serde(default)]
    pub rows: Vec<Row>,
}

impl Table {
    /// Create a new empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a row to this table.
    pub fn add_row(&mut self, row: Row) {
        self.rows.push(row);
    }

    /// Check if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Maximum number of cells in any row.
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(|r| r.len()).max().unwrap_or(0)
    }

    /// The table as rows of normalized cell texts.
    pub fn text_rows(&self) -> TextTable {
        self.rows.iter().map(|r| r.texts()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TextRun;

    #[test]
    fn test_cell_text_joins_paragraphs() {
        let mut first = Paragraph::new();
        first.add_run(TextRun::plain("  Objeto "));
        first.add_run(TextRun::plain("a\u{00A0}instalar"));
        let cell = Cell {
            content: vec![first, Paragraph::with_text("app.jar ")],
        };
        assert_eq!(cell.plain_text(), "Objeto a instalar app.jar");
    }

    #[test]
    fn test_text_rows() {
        let mut row = Row::new();
        row.add_cell(Cell::with_text("Nombre"));
        row.add_cell(Cell::new());
        let mut table = Table::new();
        table.add_row(row);
        assert_eq!(table.text_rows(), vec![vec!["Nombre".to_string(), String::new()]]);
        assert_eq!(table.column_count(), 2);
    }
}
