//! Ordered traversal of the document body.
//!
//! Produces every paragraph and table of the body in document order, at any
//! nesting depth. Each node carries its path (child indices from the body),
//! so the writer can reach the same element mutably later.

use super::text::{to_cell, BLOCK_WRAPPERS};
use super::tree::XmlElement;
use crate::model::{Document, DocumentNode, Row, Table};

/// Body-level containers the walker descends through.
const BODY_WRAPPERS: &[&str] = &["sdt", "sdtContent", "customXml", "txbxContent"];

/// Child index path from a base element.
pub type NodePath = Vec<usize>;

/// A block found by the walker.
#[derive(Debug, Clone)]
pub enum NodeRef<'a> {
    Paragraph { element: &'a XmlElement, path: NodePath },
    Table { element: &'a XmlElement, path: NodePath },
}

impl<'a> NodeRef<'a> {
    /// The underlying element.
    pub fn element(&self) -> &'a XmlElement {
        match self {
            NodeRef::Paragraph { element, .. } | NodeRef::Table { element, .. } => element,
        }
    }

    /// Path from the body.
    pub fn path(&self) -> &NodePath {
        match self {
            NodeRef::Paragraph { path, .. } | NodeRef::Table { path, .. } => path,
        }
    }
}

/// Walk the body in document order.
///
/// A nested table follows its containing table. Text boxes anchored in a
/// paragraph follow that paragraph.
pub fn walk(body: &XmlElement) -> Vec<NodeRef<'_>> {
    let mut out = Vec::new();
    let mut path = Vec::new();
    visit_blocks(body, &mut path, &mut out);
    out
}

/// Only the tables of [`walk`], with their paths.
pub fn tables(body: &XmlElement) -> Vec<(NodePath, &XmlElement)> {
    walk(body)
        .into_iter()
        .filter_map(|n| match n {
            NodeRef::Table { element, path } => Some((path, element)),
            _ => None,
        })
        .collect()
}

fn visit_blocks<'a>(element: &'a XmlElement, path: &mut NodePath, out: &mut Vec<NodeRef<'a>>) {
    for (i, child) in element.indexed_child_elements() {
        path.push(i);
        match child.local_name() {
            "p" => {
                out.push(NodeRef::Paragraph {
                    element: child,
                    path: path.clone(),
                });
                visit_text_boxes(child, path, out);
            }
            "tbl" => {
                out.push(NodeRef::Table {
                    element: child,
                    path: path.clone(),
                });
                visit_nested_tables(child, path, out);
            }
            name if BODY_WRAPPERS.contains(&name) => visit_blocks(child, path, out),
            _ => {}
        }
        path.pop();
    }
}

/// Tables inside the cells of a table, pre-order.
fn visit_nested_tables<'a>(
    element: &'a XmlElement,
    path: &mut NodePath,
    out: &mut Vec<NodeRef<'a>>,
) {
    for (i, child) in element.indexed_child_elements() {
        path.push(i);
        match child.local_name() {
            "tbl" => {
                out.push(NodeRef::Table {
                    element: child,
                    path: path.clone(),
                });
                visit_nested_tables(child, path, out);
            }
            "p" => visit_text_boxes(child, path, out),
            _ => visit_nested_tables(child, path, out),
        }
        path.pop();
    }
}

/// Text-box content anchored somewhere inside a paragraph.
fn visit_text_boxes<'a>(element: &'a XmlElement, path: &mut NodePath, out: &mut Vec<NodeRef<'a>>) {
    for (i, child) in element.indexed_child_elements() {
        // VML fallback repeats the DrawingML content
        if child.is("Fallback") {
            continue;
        }
        path.push(i);
        if child.is("txbxContent") {
            visit_blocks(child, path, out);
        } else {
            visit_text_boxes(child, path, out);
        }
        path.pop();
    }
}

/// Rows of a table with paths relative to the table.
pub fn table_rows(table: &XmlElement) -> Vec<(NodePath, &XmlElement)> {
    descendants(table, "tr", BLOCK_WRAPPERS)
}

/// Cells of a row with paths relative to the row.
pub fn row_cells(row: &XmlElement) -> Vec<(NodePath, &XmlElement)> {
    descendants(row, "tc", BLOCK_WRAPPERS)
}

/// Elements named `local` under `element`, descending only through `through`.
///
/// Paths are relative to `element`.
pub(crate) fn descendants<'a>(
    element: &'a XmlElement,
    local: &str,
    through: &[&str],
) -> Vec<(NodePath, &'a XmlElement)> {
    let mut out = Vec::new();
    collect_descendants(element, local, through, &mut Vec::new(), &mut out);
    out
}

fn collect_descendants<'a>(
    element: &'a XmlElement,
    local: &str,
    through: &[&str],
    path: &mut NodePath,
    out: &mut Vec<(NodePath, &'a XmlElement)>,
) {
    for (i, child) in element.indexed_child_elements() {
        path.push(i);
        if child.is(local) {
            out.push((path.clone(), child));
        } else if through.contains(&child.local_name()) {
            collect_descendants(child, local, through, path, out);
        }
        path.pop();
    }
}

/// Convert a `w:tbl` element to a [`Table`], nested tables excluded.
pub fn to_table(table: &XmlElement) -> Table {
    Table {
        rows: table_rows(table)
            .into_iter()
            .map(|(_, tr)| Row {
                cells: row_cells(tr).into_iter().map(|(_, tc)| to_cell(tc)).collect(),
            })
            .collect(),
    }
}

/// Build the read-only document model from the body element.
pub fn build_document(body: &XmlElement) -> Document {
    let nodes = walk(body)
        .into_iter()
        .map(|node| match node {
            NodeRef::Paragraph { element, .. } => {
                DocumentNode::Paragraph(super::text::to_paragraph(element))
            }
            NodeRef::Table { element, .. } => DocumentNode::Table(to_table(element)),
        })
        .collect();
    Document { nodes }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::tree::XmlDocument;

    fn body(xml: &str) -> XmlElement {
        let doc = XmlDocument::parse(&format!(
            "<w:document xmlns:w=\"w\"><w:body>{}</w:body></w:document>",
            xml
        ))
        .unwrap();
        let path = doc.body_path().unwrap();
        doc.root().unwrap().at_path(&path).unwrap().clone()
    }

    fn p(text: &str) -> String {
        format!("<w:p><w:r><w:t>{}</w:t></w:r></w:p>", text)
    }

    fn tbl(cells: &[&str]) -> String {
        let tcs: String = cells.iter().map(|c| format!("<w:tc>{}</w:tc>", c)).collect();
        format!("<w:tbl><w:tr>{}</w:tr></w:tbl>", tcs)
    }

    #[test]
    fn test_order_preserved() {
        let b = body(&format!("{}{}{}", p("one"), tbl(&[&p("cell")]), p("two")));
        let kinds: Vec<_> = walk(&b)
            .iter()
            .map(|n| matches!(n, NodeRef::Table { .. }))
            .collect();
        assert_eq!(kinds, vec![false, true, false]);
    }

    #[test]
    fn test_wrappers_descended() {
        let inner = format!("<w:sdt><w:sdtContent>{}</w:sdtContent></w:sdt>", tbl(&[&p("x")]));
        let b = body(&format!("<w:customXml>{}</w:customXml>", inner));
        let doc = build_document(&b);
        assert_eq!(doc.tables().count(), 1);
        assert_eq!(doc.text_tables()[0], vec![vec!["x".to_string()]]);
    }

    #[test]
    fn test_nested_table_follows_parent() {
        let nested = tbl(&[&p("inner")]);
        let outer = tbl(&[&format!("{}{}", p("outer"), nested)]);
        let b = body(&outer);

        let tables = tables(&b);
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].0, vec![0]);
        assert_eq!(tables[1].0, vec![0, 0, 0, 1]);

        let doc = build_document(&b);
        let texts = doc.text_tables();
        assert_eq!(texts[0], vec![vec!["outer".to_string()]]);
        assert_eq!(texts[1], vec![vec!["inner".to_string()]]);
    }

    #[test]
    fn test_text_box_paragraphs_follow_host() {
        let host = "<w:p><w:r><w:t>host</w:t><mc:AlternateContent><mc:Choice>\
            <w:drawing><w:txbxContent><w:p><w:r><w:t>boxed</w:t></w:r></w:p></w:txbxContent></w:drawing>\
            </mc:Choice><mc:Fallback><w:pict><w:txbxContent><w:p><w:r><w:t>boxed</w:t></w:r></w:p>\
            </w:txbxContent></w:pict></mc:Fallback></mc:AlternateContent></w:r></w:p>";
        let b = body(host);
        let doc = build_document(&b);
        assert_eq!(doc.paragraph_texts(), vec!["host", "boxed"]);
    }

    #[test]
    fn test_paths_resolve() {
        let b = body(&format!("{}{}", p("a"), tbl(&[&p("b")])));
        for node in walk(&b) {
            assert_eq!(b.at_path(node.path()), Some(node.element()));
        }
    }
}
