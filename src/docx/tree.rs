//! Mutable XML tree for the document part.
//!
//! Built from quick-xml events with every start tag, text chunk and
//! declaration kept in its raw (still escaped) form, so serializing an
//! untouched tree reproduces the source markup exactly. Only the nodes the
//! writer edits are re-encoded.

use crate::error::{Error, Result};
use quick_xml::escape::{partial_escape, unescape};
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesStart, Event};

/// A node of the XML tree.
#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    /// An element with its children.
    Element(XmlElement),
    /// Character data, raw (escaped) as it appears in the source.
    Text(String),
    /// A CDATA section body.
    CData(String),
    /// A comment body.
    Comment(String),
    /// `<?xml ...?>` declaration content.
    Declaration(String),
    /// Processing instruction content.
    ProcessingInstruction(String),
    /// DOCTYPE content.
    DocType(String),
}

/// An XML element.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlElement {
    /// Qualified name, e.g. `w:tc`.
    pub name: String,
    /// Raw start-tag content: the name followed by its attributes.
    raw_start: String,
    /// Child nodes in document order.
    pub children: Vec<XmlNode>,
    /// Whether the source used the self-closing form.
    self_closing: bool,
}

impl XmlElement {
    /// Create an element with no attributes.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            raw_start: name.clone(),
            name,
            children: Vec::new(),
            self_closing: false,
        }
    }

    /// Local part of the element name (`tc` for `w:tc`).
    pub fn local_name(&self) -> &str {
        local_part(&self.name)
    }

    /// Namespace prefix of the element name, if any.
    pub fn prefix(&self) -> Option<&str> {
        self.name.split_once(':').map(|(p, _)| p)
    }

    /// Check the local name.
    pub fn is(&self, local: &str) -> bool {
        self.local_name() == local
    }

    /// Child elements in document order.
    pub fn child_elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|n| match n {
            XmlNode::Element(e) => Some(e),
            _ => None,
        })
    }

    /// Child elements paired with their index in `children`.
    pub fn indexed_child_elements(&self) -> impl Iterator<Item = (usize, &XmlElement)> {
        self.children.iter().enumerate().filter_map(|(i, n)| match n {
            XmlNode::Element(e) => Some((i, e)),
            _ => None,
        })
    }

    /// Index in `children` of the first child element with the local name.
    pub fn position_of(&self, local: &str) -> Option<usize> {
        self.indexed_child_elements()
            .find(|(_, e)| e.is(local))
            .map(|(i, _)| i)
    }

    /// First child element with the local name.
    pub fn find_child(&self, local: &str) -> Option<&XmlElement> {
        self.child_elements().find(|e| e.is(local))
    }

    /// Element at a path of child indices below this one.
    pub fn at_path(&self, path: &[usize]) -> Option<&XmlElement> {
        let mut current = self;
        for &index in path {
            current = match current.children.get(index)? {
                XmlNode::Element(e) => e,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Mutable element at a path of child indices below this one.
    pub fn at_path_mut(&mut self, path: &[usize]) -> Option<&mut XmlElement> {
        let mut current = self;
        for &index in path {
            current = match current.children.get_mut(index)? {
                XmlNode::Element(e) => e,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Value of an attribute, unescaped.
    pub fn attribute(&self, key: &str) -> Option<String> {
        let start = BytesStart::from_content(self.raw_start.as_str(), self.name.len());
        start
            .attributes()
            .flatten()
            .find(|a| a.key.as_ref() == key.as_bytes())
            .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
    }

    /// Set (or replace) an attribute, keeping every other attribute raw.
    pub fn set_attribute(&mut self, key: &str, value: &str) {
        let raw_start = {
            let current = BytesStart::from_content(self.raw_start.as_str(), self.name.len());
            let mut rebuilt = BytesStart::new(self.name.as_str());
            for attr in current.attributes().flatten() {
                if attr.key.as_ref() != key.as_bytes() {
                    rebuilt.push_attribute(attr);
                }
            }
            rebuilt.push_attribute(Attribute::from((key, value)));
            String::from_utf8_lossy(&rebuilt).into_owned()
        };
        self.raw_start = raw_start;
    }

    /// Unescaped text of the direct text children.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            match child {
                XmlNode::Text(raw) => match unescape(raw) {
                    Ok(text) => out.push_str(&text),
                    Err(_) => out.push_str(raw),
                },
                XmlNode::CData(data) => out.push_str(data),
                _ => {}
            }
        }
        out
    }

    /// Replace all children with a single text node.
    pub fn set_text(&mut self, text: &str) {
        self.children.clear();
        if !text.is_empty() {
            self.children
                .push(XmlNode::Text(partial_escape(text).into_owned()));
        }
    }

    /// Append a new child element named with this element's prefix.
    ///
    /// Returns the index of the new child in `children`.
    pub fn append_child(&mut self, local: &str) -> usize {
        let name = match self.prefix() {
            Some(prefix) => format!("{}:{}", prefix, local),
            None => local.to_string(),
        };
        self.children.push(XmlNode::Element(XmlElement::new(name)));
        self.children.len() - 1
    }

    fn write_to(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.raw_start);
        if self.self_closing && self.children.is_empty() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        for child in &self.children {
            child.write_to(out);
        }
        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }
}

impl XmlNode {
    fn write_to(&self, out: &mut String) {
        match self {
            XmlNode::Element(e) => e.write_to(out),
            XmlNode::Text(raw) => out.push_str(raw),
            XmlNode::CData(data) => {
                out.push_str("<![CDATA[");
                out.push_str(data);
                out.push_str("]]>");
            }
            XmlNode::Comment(body) => {
                out.push_str("<!--");
                out.push_str(body);
                out.push_str("-->");
            }
            XmlNode::Declaration(body) => {
                out.push_str("<?");
                out.push_str(body);
                out.push_str("?>");
            }
            XmlNode::ProcessingInstruction(body) => {
                out.push_str("<?");
                out.push_str(body);
                out.push_str("?>");
            }
            XmlNode::DocType(body) => {
                out.push_str("<!DOCTYPE ");
                out.push_str(body);
                out.push('>');
            }
        }
    }
}

/// A parsed XML document: prolog nodes plus the root element.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlDocument {
    /// Top-level nodes in document order.
    pub nodes: Vec<XmlNode>,
}

impl XmlDocument {
    /// Parse XML text into a tree.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = quick_xml::Reader::from_str(xml);
        // Whitespace-only text between elements is kept so output is faithful
        reader.config_mut().trim_text(false);

        let mut top: Vec<XmlNode> = Vec::new();
        let mut stack: Vec<XmlElement> = Vec::new();

        loop {
            let node = match reader.read_event() {
                Ok(Event::Start(e)) => {
                    stack.push(element_from_start(&e, false));
                    continue;
                }
                Ok(Event::End(e)) => {
                    let element = stack.pop().ok_or_else(|| {
                        Error::XmlParse(format!(
                            "unexpected closing tag </{}>",
                            String::from_utf8_lossy(e.name().as_ref())
                        ))
                    })?;
                    XmlNode::Element(element)
                }
                Ok(Event::Empty(e)) => XmlNode::Element(element_from_start(&e, true)),
                Ok(Event::Text(e)) => XmlNode::Text(raw(&e)),
                Ok(Event::CData(e)) => XmlNode::CData(raw(&e)),
                Ok(Event::Comment(e)) => XmlNode::Comment(raw(&e)),
                Ok(Event::Decl(e)) => XmlNode::Declaration(raw(&e)),
                Ok(Event::PI(e)) => XmlNode::ProcessingInstruction(raw(&e)),
                Ok(Event::DocType(e)) => XmlNode::DocType(raw(&e)),
                Ok(Event::Eof) => break,
                Err(e) => return Err(Error::XmlParse(e.to_string())),
            };

            match stack.last_mut() {
                Some(parent) => parent.children.push(node),
                None => top.push(node),
            }
        }

        if let Some(open) = stack.last() {
            return Err(Error::XmlParse(format!("unclosed element <{}>", open.name)));
        }

        Ok(Self { nodes: top })
    }

    /// The root element.
    pub fn root(&self) -> Option<&XmlElement> {
        self.nodes.iter().find_map(|n| match n {
            XmlNode::Element(e) => Some(e),
            _ => None,
        })
    }

    /// The root element, mutably.
    pub fn root_mut(&mut self) -> Option<&mut XmlElement> {
        self.nodes.iter_mut().find_map(|n| match n {
            XmlNode::Element(e) => Some(e),
            _ => None,
        })
    }

    /// Path from the root to the `w:body` element.
    ///
    /// The body is normally a direct child of `w:document`; a wrapped body
    /// is still found by a depth-first search.
    pub fn body_path(&self) -> Option<Vec<usize>> {
        let root = self.root()?;
        if !root.is("document") {
            return None;
        }
        find_path(root, "body")
    }

    /// Serialize the tree back to XML text.
    pub fn to_xml_string(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            node.write_to(&mut out);
        }
        out
    }
}

fn find_path(element: &XmlElement, local: &str) -> Option<Vec<usize>> {
    for (i, child) in element.indexed_child_elements() {
        if child.is(local) {
            return Some(vec![i]);
        }
        if let Some(mut rest) = find_path(child, local) {
            rest.insert(0, i);
            return Some(rest);
        }
    }
    None
}

fn element_from_start(e: &BytesStart<'_>, self_closing: bool) -> XmlElement {
    XmlElement {
        name: String::from_utf8_lossy(e.name().as_ref()).into_owned(),
        raw_start: raw(e),
        children: Vec::new(),
        self_closing,
    }
}

fn raw(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Local part of a qualified name.
pub fn local_part(name: &str) -> &str {
    name.rsplit_once(':').map(|(_, l)| l).unwrap_or(name)
}
