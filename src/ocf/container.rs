//! OCF container implementation
//!
//! Handles reading EPUB files as ZIP containers

use crate::error::{Error, Result};
use crate::ocf::manifest::looks_like_document;
use crate::ocf::{well_known, EntryName, Manifest};
use crate::ocf::rootfile;
use log::warn;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;
use zip::read::ZipArchive;

/// Expected content of the `mimetype` entry.
pub const EPUB_MIMETYPE: &str = "application/epub+zip";

/// One named entry of the container, with its raw (decompressed) bytes.
#[derive(Clone, Debug)]
pub struct Entry {
    name: EntryName,
    data: Vec<u8>,
    last_modified: Option<zip::DateTime>,
}

impl Entry {
    /// Get the entry name
    pub fn name(&self) -> &EntryName {
        &self.name
    }

    /// Get the raw data
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Get data as UTF-8 string
    pub fn data_as_str(&self) -> Result<&str> {
        Ok(std::str::from_utf8(&self.data)?)
    }

    /// Modification timestamp recorded in the source archive, if any.
    ///
    /// Carried through to the output so a rerun that changes nothing
    /// produces a byte-identical archive.
    pub fn last_modified(&self) -> Option<zip::DateTime> {
        self.last_modified
    }
}

/// An EPUB container: the ordered entry listing of one zip archive plus the
/// parsed package structure needed to tell content documents apart from
/// everything else.
#[derive(Clone, Debug)]
pub struct Container {
    /// All entries, in archive order
    entries: Vec<Entry>,
    /// Entry name -> position in `entries`
    index: HashMap<EntryName, usize>,
    /// Path of the OPF package document
    opf_path: EntryName,
    /// Parsed OPF manifest
    manifest: Manifest,
}

impl Container {
    /// Open a container from a file path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::NotFound(path.to_path_buf())
            } else {
                Error::Io(e)
            }
        })?;
        let reader = BufReader::new(file);
        Self::from_reader(reader)
    }

    /// Open a container from bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let cursor = Cursor::new(bytes);
        Self::from_reader(cursor)
    }

    /// Open a container from a reader
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut archive = ZipArchive::new(reader)
            .map_err(|e| Error::CorruptArchive(format!("not a zip archive: {}", e)))?;

        let mut entries = Vec::with_capacity(archive.len());
        let mut index = HashMap::new();

        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            let raw_name = file.name().to_string();

            // Skip directory markers
            if raw_name.ends_with('/') {
                continue;
            }

            let name = EntryName::new(&raw_name)
                .map_err(|_| Error::CorruptArchive(format!("bad entry name '{}'", raw_name)))?;

            let last_modified = file.last_modified();

            let mut data = Vec::new();
            file.read_to_end(&mut data)?;

            index.insert(name.clone(), entries.len());
            entries.push(Entry {
                name,
                data,
                last_modified,
            });
        }

        let (opf_path, manifest) = Self::read_package(&entries, &index)?;

        let container = Self {
            entries,
            index,
            opf_path,
            manifest,
        };
        container.check_mimetype();
        Ok(container)
    }

    /// Get an entry by name
    pub fn entry(&self, name: &EntryName) -> Option<&Entry> {
        self.index.get(name).map(|&i| &self.entries[i])
    }

    /// Iterate over all entries in archive order
    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the container holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Path of the OPF package document
    pub fn opf_path(&self) -> &EntryName {
        &self.opf_path
    }

    /// Parsed OPF manifest
    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Names of the (X)HTML content documents, in archive order.
    ///
    /// An entry counts as a document when the manifest declares it as one,
    /// or when it is absent from the manifest but carries an unambiguous
    /// document extension.
    pub fn document_names(&self) -> Vec<EntryName> {
        self.entries
            .iter()
            .map(Entry::name)
            .filter(|name| {
                self.manifest.is_document(name)
                    || (self.manifest.media_type(name).is_none() && looks_like_document(name))
            })
            .cloned()
            .collect()
    }

    // === Private methods ===

    fn read_package(
        entries: &[Entry],
        index: &HashMap<EntryName, usize>,
    ) -> Result<(EntryName, Manifest)> {
        let container_xml = index
            .get(&well_known::container_xml())
            .map(|&i| &entries[i])
            .ok_or_else(|| Error::CorruptArchive("missing META-INF/container.xml".into()))?;

        let opf_path = rootfile::rootfile_path(container_xml.data_as_str()?)?;

        let opf = index
            .get(&opf_path)
            .map(|&i| &entries[i])
            .ok_or_else(|| {
                Error::CorruptArchive(format!("rootfile '{}' not present in archive", opf_path))
            })?;

        let manifest = Manifest::from_xml(opf.data_as_str()?, &opf_path)
            .map_err(|e| Error::CorruptArchive(format!("unreadable package document: {}", e)))?;

        Ok((opf_path, manifest))
    }

    /// Spec requires a stored `mimetype` entry, but plenty of EPUBs in the
    /// wild lack it. Tolerate and warn rather than refuse the file.
    fn check_mimetype(&self) {
        match self.entry(&well_known::mimetype()) {
            Some(entry) => match entry.data_as_str() {
                Ok(s) if s.trim() == EPUB_MIMETYPE => {}
                _ => warn!("mimetype entry present but not '{}'", EPUB_MIMETYPE),
            },
            None => warn!("archive has no mimetype entry"),
        }
    }
}
