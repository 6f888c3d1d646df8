//! OPF manifest parsing
//!
//! The package document's `<manifest>` maps every publication resource to a
//! media type; it is how content documents are told apart from images,
//! fonts and stylesheets.

use crate::error::Result;
use crate::ocf::{attr_value, EntryName};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::HashMap;

/// Media types treated as transformable content documents.
const DOCUMENT_MEDIA_TYPES: &[&str] = &["application/xhtml+xml", "text/html"];

/// Entry-name to media-type registry parsed from an OPF package document.
#[derive(Clone, Debug, Default)]
pub struct Manifest {
    media_types: HashMap<EntryName, String>,
}

impl Manifest {
    /// Parse the manifest out of OPF content.
    ///
    /// Item hrefs are relative to the OPF's own directory and are resolved
    /// against `opf_path`. Items whose href does not resolve to a sane
    /// entry name are skipped.
    pub fn from_xml(xml: &str, opf_path: &EntryName) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut manifest = Self::default();
        let mut in_manifest = false;

        loop {
            match reader.read_event()? {
                Event::Start(e) if e.name().local_name().as_ref() == b"manifest" => {
                    in_manifest = true;
                }
                Event::End(e) if e.name().local_name().as_ref() == b"manifest" => {
                    in_manifest = false;
                }
                Event::Start(e) | Event::Empty(e)
                    if in_manifest && e.name().local_name().as_ref() == b"item" =>
                {
                    let href = attr_value(&e, "href")?;
                    let media_type = attr_value(&e, "media-type")?;
                    if let (Some(href), Some(media_type)) = (href, media_type) {
                        if let Ok(name) = opf_path.resolve(&href) {
                            manifest.media_types.insert(name, media_type);
                        }
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(manifest)
    }

    /// Get the declared media type for an entry
    pub fn media_type(&self, name: &EntryName) -> Option<&str> {
        self.media_types.get(name).map(String::as_str)
    }

    /// Whether the entry is declared as an (X)HTML content document
    pub fn is_document(&self, name: &EntryName) -> bool {
        match self.media_type(name) {
            Some(mt) => DOCUMENT_MEDIA_TYPES.contains(&mt),
            None => false,
        }
    }

    /// Number of manifest items
    pub fn len(&self) -> usize {
        self.media_types.len()
    }

    /// Whether the manifest is empty
    pub fn is_empty(&self) -> bool {
        self.media_types.is_empty()
    }
}

/// Extension fallback for entries the manifest does not list.
///
/// Some real-world EPUBs carry documents (cover pages especially) that never
/// made it into the manifest; those are still rewritten when their extension
/// is unambiguous.
pub fn looks_like_document(name: &EntryName) -> bool {
    matches!(
        name.extension().as_deref(),
        Some("xhtml") | Some("html") | Some("htm")
    )
}
