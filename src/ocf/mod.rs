//! OCF container layer
//!
//! EPUB files are OCF containers: zip archives with a `mimetype` entry, an
//! OCF descriptor at `META-INF/container.xml` pointing at the OPF package
//! document, and the publication resources themselves. This module reads
//! and writes that structure while leaving untouched entries byte-for-byte
//! intact.

pub mod container;
pub mod entry_name;
pub mod manifest;
pub mod rootfile;
pub mod writer;

pub use container::{Container, Entry, EPUB_MIMETYPE};
pub use entry_name::{well_known, EntryName};
pub use manifest::Manifest;
pub use writer::write_container;

use crate::error::Result;
use quick_xml::events::BytesStart;

/// Get an unescaped attribute value from a start tag, by exact name.
pub(crate) fn attr_value(element: &BytesStart, name: &str) -> Result<Option<String>> {
    for attr in element.attributes() {
        let attr = attr?;
        if attr.key.as_ref() == name.as_bytes() {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}
