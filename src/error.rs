//! Error types for epub-imgfix

use std::path::PathBuf;
use thiserror::Error;

/// Main error type
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("XML encoding error: {0}")]
    XmlEncoding(#[from] quick_xml::encoding::EncodingError),

    #[error("XML attribute error: {0}")]
    XmlAttr(#[from] quick_xml::events::attributes::AttrError),

    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("file not found: {0}")]
    NotFound(PathBuf),

    #[error("not a valid EPUB archive: {0}")]
    CorruptArchive(String),

    #[error("malformed document: {reason}")]
    Parse { reason: String },

    #[error("failed to write '{path}': {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: Box<Error>,
    },

    #[error("invalid entry name: {0}")]
    InvalidEntryName(String),
}

impl Error {
    pub(crate) fn write_failed(path: PathBuf, source: Error) -> Self {
        Error::WriteFailed {
            path,
            source: Box::new(source),
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
