//! The rewrite pipeline
//!
//! Loader → per-document transform → writer, one archive at a time. A
//! document that fails to parse is skipped and keeps its original bytes;
//! the rest of the archive is still processed. A file that fails entirely
//! is reported and batch processing moves on to the next one.

use crate::error::{Error, Result};
use crate::ocf::{write_container, Container, EntryName};
use crate::transform::{self, Transform};
use crate::xhtml::Document;
use log::{debug, info, warn};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Outcome of processing one archive
#[derive(Clone, Debug, Default)]
pub struct Report {
    /// Documents whose content was rewritten
    pub rewritten: Vec<EntryName>,
    /// Documents left as-is because they are not well-formed markup
    pub skipped: Vec<SkippedEntry>,
    /// Documents examined but not changed by the selected transforms
    pub unchanged: Vec<EntryName>,
}

/// A document entry that could not be parsed and was left untouched
#[derive(Clone, Debug)]
pub struct SkippedEntry {
    pub name: EntryName,
    pub reason: String,
}

/// Transform an EPUB in place.
///
/// The original file is only replaced once the full output has been
/// written; on any failure it stays exactly as it was.
pub fn process_file<P: AsRef<Path>>(path: P, transforms: &[Transform]) -> Result<Report> {
    let path = path.as_ref();
    process_file_to(path, path, transforms)
}

/// Transform an EPUB, writing the result to `dest`.
///
/// `dest` may equal `src` for in-place replacement.
pub fn process_file_to<P, Q>(src: P, dest: Q, transforms: &[Transform]) -> Result<Report>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let src = src.as_ref();
    let dest = dest.as_ref();

    let container = Container::open(src)?;
    debug!(
        "{}: {} entries, {} documents",
        src.display(),
        container.len(),
        container.document_names().len()
    );

    let (rewritten, report) = transform_documents(&container, transforms);
    write_container(&container, &rewritten, dest)?;

    info!(
        "{}: {} rewritten, {} unchanged, {} skipped",
        src.display(),
        report.rewritten.len(),
        report.unchanged.len(),
        report.skipped.len()
    );
    Ok(report)
}

/// Per-file outcome of a batch run
#[derive(Debug)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub result: Result<Report>,
}

/// Transform several EPUBs in place, sequentially.
///
/// One file failing does not stop the batch; its error is recorded in the
/// returned outcomes.
pub fn process_batch<I, P>(paths: I, transforms: &[Transform]) -> Vec<FileOutcome>
where
    I: IntoIterator<Item = P>,
    P: Into<PathBuf>,
{
    paths
        .into_iter()
        .map(|p| {
            let path = p.into();
            let result = process_file(&path, transforms);
            if let Err(e) = &result {
                warn!("{}: {}", path.display(), e);
            }
            FileOutcome { path, result }
        })
        .collect()
}

fn transform_documents(
    container: &Container,
    transforms: &[Transform],
) -> (HashMap<EntryName, Vec<u8>>, Report) {
    let mut rewritten = HashMap::new();
    let mut report = Report::default();

    for name in container.document_names() {
        let Some(entry) = container.entry(&name) else {
            continue;
        };

        let mut doc = match entry.data_as_str().and_then(Document::parse) {
            Ok(doc) => doc,
            Err(e) => {
                let reason = skip_reason(e);
                warn!("skipping '{}': {}", name, reason);
                report.skipped.push(SkippedEntry { name, reason });
                continue;
            }
        };

        if transform::apply_all(transforms, &mut doc) {
            match doc.to_xml() {
                Ok(xml) => {
                    rewritten.insert(name.clone(), xml.into_bytes());
                    report.rewritten.push(name);
                }
                Err(e) => {
                    let reason = skip_reason(e);
                    warn!("skipping '{}': {}", name, reason);
                    report.skipped.push(SkippedEntry { name, reason });
                }
            }
        } else {
            debug!("'{}' unchanged", name);
            report.unchanged.push(name);
        }
    }

    (rewritten, report)
}

// Reasons recorded in `SkippedEntry` keep the failure kind apart: a
// document entry holding binary garbage reads differently from one holding
// malformed markup.
fn skip_reason(e: Error) -> String {
    match e {
        Error::Parse { reason } => reason,
        Error::Utf8(e) => format!("not valid UTF-8: {}", e),
        other => other.to_string(),
    }
}
