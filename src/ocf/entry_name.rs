//! Entry name handling for EPUB containers

use crate::error::{Error, Result};
use std::fmt;

/// Name of an entry inside an EPUB zip container.
///
/// Entry names are slash-separated paths without a leading '/'.
/// Example: `OEBPS/Text/chapter01.xhtml`
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EntryName {
    path: String,
}

impl EntryName {
    /// Create a new EntryName from a string.
    ///
    /// The path is normalized: leading '/' and './' stripped, no trailing '/'.
    pub fn new(path: &str) -> Result<Self> {
        let path = path.trim();

        if path.is_empty() {
            return Err(Error::InvalidEntryName("empty path".into()));
        }

        let normalized = path
            .trim_start_matches("./")
            .trim_start_matches('/')
            .trim_end_matches('/');

        if normalized.is_empty() {
            return Err(Error::InvalidEntryName(path.into()));
        }

        if normalized.contains("//") || normalized.contains('\\') {
            return Err(Error::InvalidEntryName(format!(
                "invalid path '{}': contains double slashes or backslashes",
                path
            )));
        }

        Ok(Self {
            path: normalized.to_string(),
        })
    }

    /// Create EntryName without validation (for internal use)
    pub(crate) fn from_string_unchecked(path: String) -> Self {
        Self { path }
    }

    /// Get the path as a string slice
    pub fn as_str(&self) -> &str {
        &self.path
    }

    /// Get the file name portion
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    /// Get the file extension, lowercased
    pub fn extension(&self) -> Option<String> {
        let name = self.file_name();
        let (stem, ext) = name.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            None
        } else {
            Some(ext.to_ascii_lowercase())
        }
    }

    /// Get the parent directory, if any
    pub fn parent(&self) -> Option<&str> {
        let pos = self.path.rfind('/')?;
        Some(&self.path[..pos])
    }

    /// Resolve a relative href against this entry's directory.
    ///
    /// For `OEBPS/content.opf` and `Text/ch1.xhtml`, returns
    /// `OEBPS/Text/ch1.xhtml`. `..` segments walk up.
    pub fn resolve(&self, relative: &str) -> Result<EntryName> {
        if relative.starts_with('/') {
            return EntryName::new(relative);
        }

        let base_dir = self.parent().unwrap_or("");
        let mut parts: Vec<&str> = base_dir.split('/').filter(|s| !s.is_empty()).collect();

        for segment in relative.split('/') {
            match segment {
                "" | "." => continue,
                ".." => {
                    parts.pop();
                }
                s => parts.push(s),
            }
        }

        EntryName::new(&parts.join("/"))
    }
}

impl fmt::Display for EntryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path)
    }
}

impl std::str::FromStr for EntryName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        EntryName::new(s)
    }
}

/// Well-known entry names
pub mod well_known {
    use super::EntryName;

    pub fn mimetype() -> EntryName {
        EntryName::from_string_unchecked("mimetype".into())
    }

    pub fn container_xml() -> EntryName {
        EntryName::from_string_unchecked("META-INF/container.xml".into())
    }
}
