//! OCF container descriptor parsing
//!
//! Reads `META-INF/container.xml` to locate the OPF package document.

use crate::error::{Error, Result};
use crate::ocf::{attr_value, EntryName};
use quick_xml::events::Event;
use quick_xml::Reader;

/// Media type of the OPF package document in `<rootfile>` elements.
const PACKAGE_MEDIA_TYPE: &str = "application/oebps-package+xml";

/// Extract the OPF package path from `META-INF/container.xml` content.
///
/// Multiple rootfiles are allowed by the OCF spec; the first one carrying
/// the package media type wins, falling back to the first rootfile at all.
pub fn rootfile_path(xml: &str) -> Result<EntryName> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut first: Option<String> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) => {
                if e.name().local_name().as_ref() != b"rootfile" {
                    continue;
                }
                let Some(full_path) = attr_value(&e, "full-path")? else {
                    continue;
                };
                let media_type = attr_value(&e, "media-type")?;
                if media_type.as_deref() == Some(PACKAGE_MEDIA_TYPE) {
                    return EntryName::new(&full_path);
                }
                first.get_or_insert(full_path);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    match first {
        Some(path) => EntryName::new(&path),
        None => Err(Error::CorruptArchive(
            "container.xml declares no rootfile".into(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTAINER: &str = r#"<?xml version="1.0"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>"#;

    #[test]
    fn test_rootfile_path() {
        let path = rootfile_path(CONTAINER).unwrap();
        assert_eq!(path.as_str(), "OEBPS/content.opf");
    }

    #[test]
    fn test_prefers_package_media_type() {
        let xml = r#"<container>
  <rootfiles>
    <rootfile full-path="alt.pdf" media-type="application/pdf"/>
    <rootfile full-path="content.opf" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>"#;
        let path = rootfile_path(xml).unwrap();
        assert_eq!(path.as_str(), "content.opf");
    }

    #[test]
    fn test_falls_back_to_first_rootfile() {
        let xml = r#"<container><rootfiles>
    <rootfile full-path="book.opf"/>
</rootfiles></container>"#;
        let path = rootfile_path(xml).unwrap();
        assert_eq!(path.as_str(), "book.opf");
    }

    #[test]
    fn test_no_rootfile_is_error() {
        let err = rootfile_path("<container><rootfiles/></container>").unwrap_err();
        assert!(matches!(err, Error::CorruptArchive(_)));
    }
}
