//! # epub-imgfix
//!
//! Batch-edits image markup inside EPUB archives.
//!
//! ## Features
//!
//! - Rewrite SVG-wrapped images (and single-image figures) into plain
//!   `<img>` tags
//! - Strip fixed image sizes and inject a responsive style block, so images
//!   scale to the reading viewport
//! - Round-trip preservation: every entry the transforms do not touch is
//!   written back byte-for-byte
//! - Atomic in-place replacement: the original file is swapped out only
//!   after the full output archive has been written
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use epub_imgfix::{process_file, Transform};
//!
//! // Rewrite one book in place
//! let report = process_file("book.epub", &[Transform::SvgUnwrap])?;
//! println!("rewrote {} documents", report.rewritten.len());
//!
//! // Both transforms, writing to a new file
//! let transforms = [Transform::SvgUnwrap, Transform::ResponsiveImages];
//! epub_imgfix::process_file_to("book.epub", "book-fixed.epub", &transforms)?;
//! ```

pub mod error;
pub mod ocf;
pub mod pipeline;
pub mod transform;
pub mod xhtml;

pub use error::{Error, Result};
pub use ocf::{Container, Entry, EntryName, Manifest};
pub use pipeline::{
    process_batch, process_file, process_file_to, FileOutcome, Report, SkippedEntry,
};
pub use transform::Transform;
pub use xhtml::{Document, Element, Node};
