//! In-place template filling.
//!
//! The original package is re-read, its body part parsed into a tree, and
//! only the cells that hold targeted values are rewritten. Everything else
//! in the part serializes back byte for byte, and every other archive entry
//! is copied raw.

use super::text::{cell_text, run_text, BLOCK_WRAPPERS, INLINE_WRAPPERS};
use super::tree::{XmlDocument, XmlElement};
use super::walker::{descendants, row_cells, table_rows, tables, NodePath};
use crate::catalog::{
    LABEL_ID_CAMBIO, LABEL_TIPO_REQUERIMIENTO, MARKER_ANSWER_COLUMN, MARKER_OTHER_AREAS,
    YES_NO_FIELDS,
};
use crate::container::{OoxmlContainer, BODY_PART};
use crate::error::{Error, Result};
use crate::extract::country::{country_columns, is_country_header, is_marked};
use crate::extract::header::{find_header_table, value_in_row};
use crate::extract::yes_no::{is_block_start, row_label};
use crate::extract::KEY_VALUE;
use crate::model::{yes_no_options, Field, FieldKind, FieldValue, Section, TextRow, TextTable};
use crate::normalize::country::{collapse, to_country_codes, CountryCode};
use crate::normalize::fields::{clean_otros, is_country_key, is_otros_key, is_yes_no_key};
use crate::normalize::text::{collapse_ws, fold_key, strip_marker, strip_trailing_colon};
use crate::normalize::yes_no::to_yes_no;
use crate::options::WriteOptions;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info, warn};

static OTROS_CELL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^otros\b").unwrap());

/// What happened to one field during a fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteOutcome {
    /// The target cell was rewritten
    Written,
    /// The target cell already held the value
    Unchanged,
    /// No target cell exists in the template; nothing was touched
    NotFound,
}

/// Outcome for one field key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldWrite {
    pub key: String,
    pub outcome: WriteOutcome,
}

/// Per-field report of a fill.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WriteReport {
    pub fields: Vec<FieldWrite>,
}

impl WriteReport {
    fn push(&mut self, key: &str, outcome: WriteOutcome) {
        self.fields.push(FieldWrite {
            key: key.to_string(),
            outcome,
        });
    }

    /// Outcome of the first entry for a key.
    pub fn outcome(&self, key: &str) -> Option<WriteOutcome> {
        self.fields.iter().find(|f| f.key == key).map(|f| f.outcome)
    }

    /// Number of entries with an outcome.
    pub fn count(&self, outcome: WriteOutcome) -> usize {
        self.fields.iter().filter(|f| f.outcome == outcome).count()
    }

    /// Keys whose target was not found.
    pub fn missing(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .filter(|f| f.outcome == WriteOutcome::NotFound)
            .map(|f| f.key.as_str())
    }
}

/// Fills a DOCX template with edited sections.
pub struct DocxWriter {
    template: Vec<u8>,
    options: WriteOptions,
}

impl DocxWriter {
    /// Load a template from a file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read(path.as_ref())?;
        Ok(Self::from_bytes(data))
    }

    /// Use template bytes as given.
    pub fn from_bytes(template: Vec<u8>) -> Self {
        Self {
            template,
            options: WriteOptions::default(),
        }
    }

    /// Set write options.
    pub fn with_options(mut self, options: WriteOptions) -> Self {
        self.options = options;
        self
    }

    /// Write every recognized field of `sections` into the template.
    ///
    /// Returns the new package and the per-field report. When no cell
    /// changes, the template bytes are returned as they came in.
    pub fn fill(&self, sections: &[Section]) -> Result<(Vec<u8>, WriteReport)> {
        let container = OoxmlContainer::from_bytes(self.template.clone())?;
        let xml = container.read_body_xml_strict()?;
        let mut template = Template::parse(&xml)?;
        let mut report = WriteReport::default();

        for field in sections.iter().flat_map(|s| s.fields.iter()) {
            let Some(target) = Target::of(field) else {
                debug!(key = %field.key, "field has no template target");
                continue;
            };
            let outcome = template.write(&target, &field.value, &self.options);
            if outcome == WriteOutcome::NotFound {
                warn!(key = %field.key, "no target cell in template");
            }
            report.push(&field.key, outcome);
        }

        let written = report.count(WriteOutcome::Written);
        info!(
            written,
            unchanged = report.count(WriteOutcome::Unchanged),
            not_found = report.count(WriteOutcome::NotFound),
            "filled template"
        );

        if written == 0 {
            return Ok((self.template.clone(), report));
        }
        let out = container.replace_part(BODY_PART, &template.tree.to_xml_string())?;
        Ok((out, report))
    }
}

/// Where a field goes in the template.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Target {
    Header(&'static str),
    YesNo(String),
    Otros,
    Country,
}

impl Target {
    fn of(field: &Field) -> Option<Self> {
        let spaced = fold_key(&field.key.replace('-', " "));
        match spaced.as_str() {
            "id cambio" | "id de cambio" => return Some(Target::Header(LABEL_ID_CAMBIO)),
            "tipo requerimiento" | "tipo de requerimiento" => {
                return Some(Target::Header(LABEL_TIPO_REQUERIMIENTO))
            }
            _ => {}
        }
        if is_country_key(&field.key) {
            return Some(Target::Country);
        }
        if is_otros_key(&field.key) {
            return Some(Target::Otros);
        }
        if is_yes_no_key(&field.key) {
            let label = YES_NO_FIELDS
                .iter()
                .find(|(key, _)| fold_key(&key.replace('-', " ")) == spaced)
                .map(|(_, label)| label.to_string())
                .unwrap_or_else(|| field.label.clone());
            return Some(Target::YesNo(label));
        }
        if field.kind == FieldKind::Select && field.options == yes_no_options() {
            return Some(Target::YesNo(field.label.clone()));
        }
        None
    }
}

/// A cell of the template with its path from the body.
#[derive(Debug, Clone)]
struct GridCell {
    path: NodePath,
    text: String,
}

type Grid = Vec<Vec<GridCell>>;

fn row_texts(row: &[GridCell]) -> TextRow {
    row.iter().map(|c| c.text.clone()).collect()
}

fn text_tables(grids: &[Grid]) -> Vec<TextTable> {
    grids
        .iter()
        .map(|grid| grid.iter().map(|row| row_texts(row)).collect())
        .collect()
}

/// The grid the parser reads header fields from.
fn header_grid(grids: &[Grid]) -> Option<&Grid> {
    find_header_table(&text_tables(grids)).and_then(|i| grids.get(i))
}

/// Rows after the first yes/no block start, header table first.
fn block_rows(grids: &[Grid]) -> Option<&[Vec<GridCell>]> {
    let tables = text_tables(grids);
    let header = find_header_table(&tables);
    header
        .into_iter()
        .chain((0..grids.len()).filter(|i| Some(*i) != header))
        .find_map(|i| {
            let start = tables[i].iter().position(is_block_start)?;
            Some(&grids[i][start + 1..])
        })
}

fn join(base: &[usize], rest: &[usize]) -> NodePath {
    [base, rest].concat()
}

/// Text up to and including the first colon, or the text plus a colon.
fn label_prefix(text: &str) -> String {
    match text.find(':') {
        Some(end) => text[..=end].to_string(),
        None => format!("{}:", text.trim_end()),
    }
}

fn with_prefix(prefix: &str, value: &str) -> String {
    if value.is_empty() {
        prefix.to_string()
    } else {
        format!("{} {}", prefix, value)
    }
}

fn label_matches(text: &str, wanted: &str) -> bool {
    let folded = fold_key(&row_label(text));
    folded == wanted
        || folded
            .strip_prefix(wanted)
            .is_some_and(|rest| rest.starts_with([' ', '(', '?', ':']))
}

/// Column of "Respuesta: SI/NO" in the block header row of a table.
fn answer_column(grid: &Grid) -> Option<usize> {
    let marker = fold_key(MARKER_OTHER_AREAS);
    let answer = fold_key(MARKER_ANSWER_COLUMN).replace(' ', "");
    grid.iter().find_map(|row| {
        let has_marker = row.iter().any(|c| fold_key(&c.text).contains(&marker));
        let column = row
            .iter()
            .position(|c| fold_key(&c.text).replace(' ', "") == answer)?;
        has_marker.then_some(column)
    })
}

/// The parsed body part being edited.
struct Template {
    tree: XmlDocument,
    body: NodePath,
}

impl Template {
    fn parse(xml: &str) -> Result<Self> {
        let tree = XmlDocument::parse(xml)?;
        let body = tree
            .body_path()
            .ok_or_else(|| Error::MalformedDocument("no w:body element".to_string()))?;
        Ok(Self { tree, body })
    }

    /// Cell texts and paths of every table, in walk order.
    fn grids(&self) -> Vec<Grid> {
        let Some(body) = self.tree.root().and_then(|r| r.at_path(&self.body)) else {
            return Vec::new();
        };
        tables(body)
            .into_iter()
            .map(|(table_path, table)| {
                table_rows(table)
                    .into_iter()
                    .map(|(row_path, row)| {
                        row_cells(row)
                            .into_iter()
                            .map(|(cell_path, cell)| GridCell {
                                path: [table_path.as_slice(), &row_path, &cell_path].concat(),
                                text: cell_text(cell),
                            })
                            .collect()
                    })
                    .collect()
            })
            .collect()
    }

    fn set_cell(&mut self, path: &[usize], text: &str) -> bool {
        let full = join(&self.body, path);
        match self.tree.root_mut().and_then(|r| r.at_path_mut(&full)) {
            Some(cell) => {
                set_cell_text(cell, text);
                true
            }
            None => false,
        }
    }

    fn write(&mut self, target: &Target, value: &FieldValue, options: &WriteOptions) -> WriteOutcome {
        match target {
            Target::Header(label) => self.write_header(label, &value.as_text(), options),
            Target::YesNo(label) => self.write_yes_no(label, &value.as_text(), options),
            Target::Otros => self.write_otros(&value.as_text(), options),
            Target::Country => self.write_country(value, options),
        }
    }

    fn finish(&mut self, path: &[usize], text: &str) -> WriteOutcome {
        if self.set_cell(path, text) {
            WriteOutcome::Written
        } else {
            WriteOutcome::NotFound
        }
    }

    /// First cell of the header table mentioning the label.
    ///
    /// A bare label with a value cell beside it gets the value in that
    /// cell. Otherwise the label cell is rewritten as its own label prefix
    /// followed by the value.
    fn write_header(&mut self, label: &str, value: &str, options: &WriteOptions) -> WriteOutcome {
        let wanted = fold_key(label);
        let grids = self.grids();
        let Some(grid) = header_grid(&grids) else {
            return WriteOutcome::NotFound;
        };
        let found = grid.iter().find_map(|row| {
            row.iter()
                .position(|c| fold_key(&c.text.replace('*', "")).contains(&wanted))
                .map(|i| (row, i))
        });
        let Some((row, i)) = found else {
            return WriteOutcome::NotFound;
        };

        let value = collapse_ws(value);
        if options.skip_unchanged && value_in_row(&row_texts(row), label).as_deref() == Some(value.as_str()) {
            return WriteOutcome::Unchanged;
        }

        let own = &row[i];
        let bare = fold_key(strip_trailing_colon(strip_marker(&own.text))) == wanted;
        let sibling = row
            .get(i + 1)
            .filter(|next| !KEY_VALUE.is_match(next.text.trim()));
        let (path, text) = match sibling {
            Some(next) if bare => (next.path.clone(), value),
            _ => (own.path.clone(), with_prefix(&label_prefix(&own.text), &value)),
        };
        self.finish(&path, &text)
    }

    /// Answer cell of the first row labeled with the field.
    fn write_yes_no(&mut self, label: &str, value: &str, options: &WriteOptions) -> WriteOutcome {
        let wanted = fold_key(label);
        let grids = self.grids();

        for grid in &grids {
            let Some((row, label_col)) = grid.iter().find_map(|row| {
                row.iter()
                    .position(|c| label_matches(&c.text, &wanted))
                    .map(|c| (row, c))
            }) else {
                continue;
            };

            let last = row.len() - 1;
            let column = answer_column(grid)
                .filter(|&c| c != label_col && c < row.len())
                .unwrap_or(last);
            if column == label_col {
                return WriteOutcome::NotFound;
            }

            let target = to_yes_no(value);
            if options.skip_unchanged && to_yes_no(&row[column].text) == target {
                return WriteOutcome::Unchanged;
            }
            let path = row[column].path.clone();
            return self.finish(&path, target);
        }
        WriteOutcome::NotFound
    }

    /// Second cell of the "Otros" row of the yes/no block, or the label
    /// cell itself.
    fn write_otros(&mut self, value: &str, options: &WriteOptions) -> WriteOutcome {
        let value = collapse_ws(&clean_otros(value));
        let grids = self.grids();
        let Some(rows) = block_rows(&grids) else {
            return WriteOutcome::NotFound;
        };
        let found = rows.iter().find_map(|row| {
            row.iter()
                .position(|c| OTROS_CELL.is_match(&c.text))
                .map(|i| (row, i))
        });
        let Some((row, i)) = found else {
            return WriteOutcome::NotFound;
        };

        let (path, current, text) = match row.get(i + 1) {
            Some(next) => (next.path.clone(), next.text.clone(), value.clone()),
            None => {
                let own = &row[i];
                let current = collapse_ws(&clean_otros(&own.text));
                (own.path.clone(), current, with_prefix(&label_prefix(&own.text), &value))
            }
        };

        if options.skip_unchanged && current == value {
            return WriteOutcome::Unchanged;
        }
        self.finish(&path, &text)
    }

    /// Clear the five country cells below the header, then mark the selection.
    fn write_country(&mut self, value: &FieldValue, options: &WriteOptions) -> WriteOutcome {
        let target = to_country_codes(value);
        let grids = self.grids();
        let found = grids.iter().find_map(|grid| {
            grid.iter()
                .position(|row| is_country_header(&row_texts(row)))
                .map(|r| (grid, r))
        });
        let Some((grid, r)) = found else {
            return WriteOutcome::NotFound;
        };
        let Some(data) = grid.get(r + 1) else {
            return WriteOutcome::NotFound;
        };

        let columns = country_columns(&row_texts(&grid[r]));
        let marked: Vec<CountryCode> = columns
            .iter()
            .filter(|(_, c)| data.get(*c).is_some_and(|cell| is_marked(&cell.text)))
            .map(|(code, _)| *code)
            .collect();
        if options.skip_unchanged && collapse(&marked) == target {
            return WriteOutcome::Unchanged;
        }

        let writes: Vec<(NodePath, &str)> = columns
            .iter()
            .filter_map(|(code, c)| {
                let text = if target.contains(code) {
                    options.country_marker.as_str()
                } else {
                    ""
                };
                data.get(*c).map(|cell| (cell.path.clone(), text))
            })
            .collect();
        if writes.is_empty() {
            return WriteOutcome::NotFound;
        }
        for (path, text) in writes {
            self.set_cell(&path, text);
        }
        WriteOutcome::Written
    }
}

/// Paths of every `w:t` in the cell's own paragraphs.
fn text_paths(cell: &XmlElement) -> Vec<NodePath> {
    let mut out = Vec::new();
    for (p_path, paragraph) in descendants(cell, "p", BLOCK_WRAPPERS) {
        for (r_path, run) in descendants(paragraph, "r", INLINE_WRAPPERS) {
            for (i, child) in run.indexed_child_elements() {
                if child.is("t") {
                    out.push([p_path.as_slice(), &r_path, &[i]].concat());
                }
            }
        }
    }
    out
}

/// Replace the text of a cell while keeping its paragraph and run formatting.
///
/// Reuses the first paragraph, its first run with text and that run's first
/// `w:t`; a minimal `w:p`/`w:r`/`w:t` is created only when missing. Every
/// other `w:t` of the cell's paragraphs is emptied, not removed.
pub fn set_cell_text(cell: &mut XmlElement, text: &str) {
    let p_path = match descendants(cell, "p", BLOCK_WRAPPERS).into_iter().next() {
        Some((path, _)) => path,
        None => vec![cell.append_child("p")],
    };

    let chosen = cell.at_path(&p_path).and_then(|paragraph| {
        let runs = descendants(paragraph, "r", INLINE_WRAPPERS);
        runs.iter()
            .find(|(_, r)| !run_text(r).is_empty())
            .or_else(|| runs.first())
            .map(|(path, _)| path.clone())
    });
    let r_path = match chosen {
        Some(rel) => join(&p_path, &rel),
        None => {
            let Some(paragraph) = cell.at_path_mut(&p_path) else {
                return;
            };
            let i = paragraph.append_child("r");
            join(&p_path, &[i])
        }
    };

    let Some(run) = cell.at_path_mut(&r_path) else {
        return;
    };
    let t = match run.position_of("t") {
        Some(i) => i,
        None => run.append_child("t"),
    };
    let t_path = join(&r_path, &[t]);

    for path in text_paths(cell) {
        if path == t_path {
            continue;
        }
        if let Some(other) = cell.at_path_mut(&path) {
            other.set_text("");
        }
    }

    if let Some(t) = cell.at_path_mut(&t_path) {
        t.set_text(text);
        t.set_attribute("xml:space", "preserve");
    }
}
