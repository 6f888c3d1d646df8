//! Container writing
//!
//! Produces the output archive: every original entry in original order,
//! rewritten documents swapped in, everything else byte-for-byte. The zip is
//! assembled in a temporary file next to the destination and renamed over it
//! only once fully written, so an interrupted run never leaves a truncated
//! EPUB behind.

use crate::error::{Error, Result};
use crate::ocf::{well_known, Container, Entry, EntryName};
use log::debug;
use std::collections::HashMap;
use std::io::{Seek, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Write the container to `dest`, replacing documents listed in `rewritten`.
///
/// `dest` may be the container's own source path; the temp-then-rename
/// commit makes in-place replacement safe. Every failure path deletes the
/// temporary file and leaves whatever was at `dest` untouched.
pub fn write_container(
    container: &Container,
    rewritten: &HashMap<EntryName, Vec<u8>>,
    dest: &Path,
) -> Result<()> {
    let dir = match dest.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let commit = || -> Result<()> {
        let temp = tempfile::Builder::new()
            .prefix(".epub-imgfix-")
            .suffix(".part")
            .tempfile_in(dir)?;

        write_entries(container, rewritten, temp.as_file())?;

        // Temp file is dropped (and deleted) on any earlier error.
        temp.persist(dest).map_err(|e| Error::Io(e.error))?;
        Ok(())
    };

    commit().map_err(|e| Error::write_failed(dest.to_path_buf(), e))?;
    debug!("committed {} entries to {}", container.len(), dest.display());
    Ok(())
}

/// Write all entries to an open zip writer.
///
/// The `mimetype` entry, when present, goes first and uncompressed, as the
/// OCF spec requires; remaining entries keep their original archive order.
fn write_entries<W: Write + Seek>(
    container: &Container,
    rewritten: &HashMap<EntryName, Vec<u8>>,
    writer: W,
) -> Result<()> {
    let mut zip = ZipWriter::new(writer);
    let mimetype = well_known::mimetype();

    if let Some(entry) = container.entry(&mimetype) {
        zip.start_file(
            entry.name().as_str(),
            entry_options(entry, CompressionMethod::Stored),
        )?;
        zip.write_all(entry.data())?;
    }

    for entry in container.entries() {
        if *entry.name() == mimetype {
            continue;
        }
        let data = rewritten
            .get(entry.name())
            .map(Vec::as_slice)
            .unwrap_or_else(|| entry.data());

        zip.start_file(
            entry.name().as_str(),
            entry_options(entry, CompressionMethod::Deflated),
        )?;
        zip.write_all(data)?;
    }

    zip.finish()?;
    Ok(())
}

/// File options carrying the entry's original timestamp. Entries without
/// one get the epoch constant rather than the current time, so repeated
/// runs stay deterministic.
fn entry_options(entry: &Entry, method: CompressionMethod) -> SimpleFileOptions {
    SimpleFileOptions::default()
        .compression_method(method)
        .last_modified_time(entry.last_modified().unwrap_or_default())
}
