//! Text extraction from paragraphs and table cells.

use super::tree::XmlElement;
use crate::model::{Cell, Paragraph, TextRun};
use crate::normalize::text::collapse_ws;

/// Inline containers whose runs belong to the enclosing paragraph.
pub(crate) const INLINE_WRAPPERS: &[&str] = &[
    "hyperlink",
    "ins",
    "smartTag",
    "fldSimple",
    "customXml",
    "sdt",
    "sdtContent",
    "bdo",
    "dir",
    "moveTo",
];

/// Block containers a cell's paragraphs may sit in.
pub(crate) const BLOCK_WRAPPERS: &[&str] = &["sdt", "sdtContent", "customXml"];

/// Text of one run in order.
///
/// `w:tab` reads as a tab, `w:br`/`w:cr` as a newline and `w:noBreakHyphen`
/// as "-"; deleted text (`w:delText`) is skipped.
pub fn run_text(run: &XmlElement) -> String {
    let mut text = String::new();
    for child in run.child_elements() {
        match child.local_name() {
            "t" => text.push_str(&child.text()),
            "tab" => text.push('\t'),
            "br" | "cr" => text.push('\n'),
            "noBreakHyphen" => text.push('-'),
            _ => {}
        }
    }
    text
}

/// Runs of a paragraph in document order, inline wrappers included.
pub fn paragraph_runs(paragraph: &XmlElement) -> Vec<&XmlElement> {
    let mut runs = Vec::new();
    collect_runs(paragraph, &mut runs);
    runs
}

fn collect_runs<'a>(element: &'a XmlElement, out: &mut Vec<&'a XmlElement>) {
    for child in element.child_elements() {
        if child.is("r") {
            out.push(child);
        } else if INLINE_WRAPPERS.contains(&child.local_name()) {
            collect_runs(child, out);
        }
    }
}

/// Concatenated run text of a paragraph, with no separators.
///
/// Never fails; a paragraph without text yields "".
pub fn paragraph_text(paragraph: &XmlElement) -> String {
    paragraph_runs(paragraph).into_iter().map(run_text).collect()
}

/// Convert a `w:p` element to a [`Paragraph`].
pub fn to_paragraph(paragraph: &XmlElement) -> Paragraph {
    Paragraph {
        runs: paragraph_runs(paragraph)
            .into_iter()
            .map(|r| TextRun::plain(run_text(r)))
            .collect(),
    }
}

/// Paragraphs directly in a cell, through block wrappers, nested tables excluded.
pub fn cell_paragraphs(cell: &XmlElement) -> Vec<&XmlElement> {
    let mut out = Vec::new();
    collect_paragraphs(cell, &mut out);
    out
}

fn collect_paragraphs<'a>(element: &'a XmlElement, out: &mut Vec<&'a XmlElement>) {
    for child in element.child_elements() {
        if child.is("p") {
            out.push(child);
        } else if BLOCK_WRAPPERS.contains(&child.local_name()) {
            collect_paragraphs(child, out);
        }
    }
}

/// Cell text: paragraphs joined by single spaces, whitespace collapsed, trimmed.
pub fn cell_text(cell: &XmlElement) -> String {
    let joined = cell_paragraphs(cell)
        .into_iter()
        .map(paragraph_text)
        .collect::<Vec<_>>()
        .join(" ");
    collapse_ws(&joined)
}

/// Convert a `w:tc` element to a [`Cell`].
pub fn to_cell(cell: &XmlElement) -> Cell {
    Cell {
        content: cell_paragraphs(cell).into_iter().map(to_paragraph).collect(),
    }
}
