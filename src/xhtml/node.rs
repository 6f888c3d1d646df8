//! Markup tree node types
//!
//! Documents are held as a tagged-variant tree: elements, text, comments.
//! Text and attribute values are stored in their raw escaped form and
//! written back verbatim, so entity references the XML escaper does not
//! know about (`&nbsp;` and friends) survive the round trip.

use quick_xml::escape::escape;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesEnd, BytesPI, BytesStart, BytesText, Event};
use quick_xml::name::QName;
use quick_xml::{Reader, Writer};
use std::borrow::Cow;

use crate::error::{Error, Result};

/// One node of a markup tree
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    /// Element node
    Element(Element),
    /// Text node (raw escaped form)
    Text(String),
    /// Comment node
    Comment(String),
    /// Processing instruction, e.g. `xml-stylesheet href="..."`
    Pi(String),
}

impl Node {
    /// Whether this is a text node consisting only of whitespace
    pub fn is_whitespace(&self) -> bool {
        matches!(self, Node::Text(t) if t.trim().is_empty())
    }

    /// Get the contained element, if any
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get the contained element mutably, if any
    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Node::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Write node to an XML writer
    pub fn write_to<W: std::io::Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        match self {
            Node::Element(e) => e.write_to(writer),
            Node::Text(t) => {
                writer.write_event(Event::Text(BytesText::from_escaped(t.as_str())))?;
                Ok(())
            }
            Node::Comment(c) => {
                writer.write_event(Event::Comment(BytesText::from_escaped(c.as_str())))?;
                Ok(())
            }
            Node::Pi(p) => {
                writer.write_event(Event::PI(BytesPI::new(p.as_str())))?;
                Ok(())
            }
        }
    }
}

/// An element with attributes and ordered children
#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    /// Full element name as written (possibly prefixed, e.g. `svg:image`)
    pub name: String,
    /// Attributes as (name, raw escaped value) pairs, in document order
    pub attributes: Vec<(String, String)>,
    /// Child nodes
    pub children: Vec<Node>,
    /// Whether this was a self-closing tag
    pub self_closing: bool,
}

impl Element {
    /// Create a new empty element
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
            self_closing: false,
        }
    }

    /// Element name without a namespace prefix, lowercased
    pub fn local_name(&self) -> String {
        let local = match self.name.rsplit_once(':') {
            Some((_, local)) => local,
            None => &self.name,
        };
        local.to_ascii_lowercase()
    }

    /// Whether the element's local name matches `tag` (case-insensitive)
    pub fn is(&self, tag: &str) -> bool {
        self.local_name() == tag
    }

    /// Get an attribute value by exact name
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Get an attribute value by local name, ignoring any prefix.
    ///
    /// `attr_local("href")` matches both `href` and `xlink:href`.
    pub fn attr_local(&self, local: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| {
                let k_local = match k.rsplit_once(':') {
                    Some((_, l)) => l,
                    None => k.as_str(),
                };
                k_local.eq_ignore_ascii_case(local)
            })
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, replacing an existing one of the same name
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == name) {
            Some(pair) => pair.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    /// Remove an attribute by local name; returns whether anything was removed
    pub fn remove_attr_local(&mut self, local: &str) -> bool {
        let before = self.attributes.len();
        self.attributes.retain(|(k, _)| {
            let k_local = match k.rsplit_once(':') {
                Some((_, l)) => l,
                None => k.as_str(),
            };
            !k_local.eq_ignore_ascii_case(local)
        });
        self.attributes.len() != before
    }

    /// Child elements, in order
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// Find the first descendant element with the given local name
    /// (depth-first, the element itself excluded)
    pub fn find_descendant(&self, tag: &str) -> Option<&Element> {
        for child in self.child_elements() {
            if child.is(tag) {
                return Some(child);
            }
            if let Some(found) = child.find_descendant(tag) {
                return Some(found);
            }
        }
        None
    }

    /// Find the first descendant element with the given local name, mutably
    pub fn find_descendant_mut(&mut self, tag: &str) -> Option<&mut Element> {
        for child in self.children.iter_mut().filter_map(Node::as_element_mut) {
            if child.is(tag) {
                return Some(child);
            }
            if let Some(found) = child.find_descendant_mut(tag) {
                return Some(found);
            }
        }
        None
    }

    /// Count descendant elements with the given local name
    pub fn count_descendants(&self, tag: &str) -> usize {
        self.child_elements()
            .map(|c| usize::from(c.is(tag)) + c.count_descendants(tag))
            .sum()
    }

    /// Apply `f` to this element and every descendant element, depth-first
    pub fn visit_mut(&mut self, f: &mut impl FnMut(&mut Element)) {
        f(self);
        for child in self.children.iter_mut().filter_map(Node::as_element_mut) {
            child.visit_mut(f);
        }
    }

    /// Read a complete element from an XML reader, the start tag already
    /// consumed
    pub fn from_reader(reader: &mut Reader<&[u8]>, start: &BytesStart) -> Result<Self> {
        let name = String::from_utf8_lossy(start.name().as_ref()).to_string();
        let attributes = read_attributes(start)?;

        let mut children = Vec::new();

        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    let child = Self::from_reader(reader, &e)?;
                    children.push(Node::Element(child));
                }
                Event::Empty(e) => {
                    children.push(Node::Element(Self::from_empty(&e)?));
                }
                Event::Text(t) => {
                    children.push(Node::Text(
                        String::from_utf8_lossy(t.as_ref()).to_string(),
                    ));
                }
                Event::CData(c) => {
                    // Folded into an ordinary text node; content is escaped
                    // so it serializes correctly outside a CDATA section.
                    let raw = String::from_utf8_lossy(c.as_ref()).to_string();
                    children.push(Node::Text(escape(raw.as_str()).into_owned()));
                }
                Event::Comment(c) => {
                    children.push(Node::Comment(
                        String::from_utf8_lossy(c.as_ref()).to_string(),
                    ));
                }
                Event::PI(p) => {
                    children.push(Node::Pi(String::from_utf8_lossy(p.as_ref()).to_string()));
                }
                Event::GeneralRef(r) => {
                    // Entity references come through as their own events;
                    // stored in written form so `&nbsp;` and friends pass
                    // through untouched.
                    children.push(Node::Text(format!(
                        "&{};",
                        String::from_utf8_lossy(r.as_ref())
                    )));
                }
                Event::End(e) => {
                    let end_name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                    if end_name == name {
                        break;
                    }
                }
                Event::Eof => {
                    return Err(Error::Parse {
                        reason: format!("unexpected EOF inside <{}>", name),
                    });
                }
                _ => {}
            }
        }

        Ok(Self {
            name,
            attributes,
            children,
            self_closing: false,
        })
    }

    /// Create from a self-closing tag
    pub fn from_empty(e: &BytesStart) -> Result<Self> {
        Ok(Self {
            name: String::from_utf8_lossy(e.name().as_ref()).to_string(),
            attributes: read_attributes(e)?,
            children: Vec::new(),
            self_closing: true,
        })
    }

    /// Write element to an XML writer
    pub fn write_to<W: std::io::Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        let mut start = BytesStart::new(&self.name);
        for (key, value) in &self.attributes {
            // Values are already in escaped form; bypass re-escaping.
            start.push_attribute(Attribute {
                key: QName(key.as_bytes()),
                value: Cow::Borrowed(value.as_bytes()),
            });
        }

        if self.children.is_empty() && self.self_closing {
            writer.write_event(Event::Empty(start))?;
        } else {
            writer.write_event(Event::Start(start))?;
            for child in &self.children {
                child.write_to(writer)?;
            }
            writer.write_event(Event::End(BytesEnd::new(&self.name)))?;
        }

        Ok(())
    }

    /// Add an attribute (builder style)
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Add a child element (builder style)
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    /// Add a text child (builder style); the text is escaped
    pub fn with_text(mut self, text: impl AsRef<str>) -> Self {
        self.children
            .push(Node::Text(escape(text.as_ref()).into_owned()));
        self
    }
}

fn read_attributes(start: &BytesStart) -> Result<Vec<(String, String)>> {
    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr?;
        attributes.push((
            String::from_utf8_lossy(attr.key.as_ref()).to_string(),
            String::from_utf8_lossy(&attr.value).to_string(),
        ));
    }
    Ok(attributes)
}
