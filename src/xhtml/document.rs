//! Whole-document parsing and serialization
//!
//! A [`Document`] is one (X)HTML entry of the container, parsed into a node
//! tree together with its XML declaration and DOCTYPE so both survive
//! re-serialization.

use crate::error::{Error, Result};
use crate::xhtml::{Element, Node};
use quick_xml::events::{BytesDecl, BytesText, Event};
use quick_xml::{Reader, Writer};

/// Parsed XML declaration (`<?xml version="1.0" encoding="utf-8"?>`)
#[derive(Clone, Debug, PartialEq)]
pub struct XmlDecl {
    pub version: String,
    pub encoding: Option<String>,
    pub standalone: Option<String>,
}

/// One parsed (X)HTML document
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    /// XML declaration, if the source had one
    decl: Option<XmlDecl>,
    /// DOCTYPE content (without the `<!DOCTYPE` wrapper), if any
    doctype: Option<String>,
    /// Top-level nodes: the root element plus any prolog comments or
    /// processing instructions, in source order
    nodes: Vec<Node>,
}

impl Document {
    /// Parse a document from markup text.
    ///
    /// Fails on markup that is not well-formed XML; callers treat that as
    /// the skip-this-entry condition.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_reader(xml.as_bytes());

        let mut decl = None;
        let mut doctype = None;
        let mut nodes = Vec::new();

        loop {
            match reader.read_event()? {
                Event::Decl(d) => {
                    let version = String::from_utf8_lossy(d.version()?.as_ref()).to_string();
                    let encoding = match d.encoding() {
                        Some(enc) => Some(String::from_utf8_lossy(enc?.as_ref()).to_string()),
                        None => None,
                    };
                    let standalone = match d.standalone() {
                        Some(sd) => Some(String::from_utf8_lossy(sd?.as_ref()).to_string()),
                        None => None,
                    };
                    decl = Some(XmlDecl {
                        version,
                        encoding,
                        standalone,
                    });
                }
                Event::DocType(t) => {
                    doctype = Some(String::from_utf8_lossy(t.as_ref()).to_string());
                }
                Event::Start(e) => {
                    let root = Element::from_reader(&mut reader, &e)?;
                    nodes.push(Node::Element(root));
                }
                Event::Empty(e) => {
                    nodes.push(Node::Element(Element::from_empty(&e)?));
                }
                Event::Comment(c) => {
                    nodes.push(Node::Comment(
                        String::from_utf8_lossy(c.as_ref()).to_string(),
                    ));
                }
                Event::PI(p) => {
                    nodes.push(Node::Pi(String::from_utf8_lossy(p.as_ref()).to_string()));
                }
                // Inter-prolog whitespace is normalized away; the writer
                // re-inserts line breaks between prolog items.
                Event::Text(t) if t.as_ref().iter().all(u8::is_ascii_whitespace) => {}
                Event::Text(t) => {
                    return Err(ill_formed(format!(
                        "text outside the root element: '{}'",
                        String::from_utf8_lossy(t.as_ref()).trim()
                    )));
                }
                Event::CData(_) => {
                    return Err(ill_formed("CDATA outside the root element".into()));
                }
                Event::GeneralRef(_) => {
                    return Err(ill_formed("reference outside the root element".into()));
                }
                Event::End(_) => {
                    return Err(ill_formed("unmatched closing tag".into()));
                }
                Event::Eof => break,
            }
        }

        if !nodes.iter().any(|n| matches!(n, Node::Element(_))) {
            return Err(ill_formed("no root element".into()));
        }

        Ok(Self {
            decl,
            doctype,
            nodes,
        })
    }

    /// Serialize back to markup text
    pub fn to_xml(&self) -> Result<String> {
        let mut buf = Vec::new();
        let mut writer = Writer::new(&mut buf);

        if let Some(decl) = &self.decl {
            writer.write_event(Event::Decl(BytesDecl::new(
                &decl.version,
                decl.encoding.as_deref(),
                decl.standalone.as_deref(),
            )))?;
            writer.write_event(Event::Text(BytesText::from_escaped("\n")))?;
        }

        if let Some(doctype) = &self.doctype {
            writer.write_event(Event::DocType(BytesText::from_escaped(doctype.as_str())))?;
            writer.write_event(Event::Text(BytesText::from_escaped("\n")))?;
        }

        for node in &self.nodes {
            node.write_to(&mut writer)?;
        }

        String::from_utf8(buf).map_err(|e| Error::Utf8(e.utf8_error()))
    }

    /// The root element
    pub fn root(&self) -> &Element {
        self.nodes
            .iter()
            .find_map(Node::as_element)
            .expect("checked at parse time")
    }

    /// The root element, mutably
    pub fn root_mut(&mut self) -> &mut Element {
        self.nodes
            .iter_mut()
            .find_map(Node::as_element_mut)
            .expect("checked at parse time")
    }
}

// The pipeline pairs this with the entry name when it records the skip.
fn ill_formed(reason: String) -> Error {
    Error::Parse { reason }
}
