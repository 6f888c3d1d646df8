//! (X)HTML document model
//!
//! A tagged-variant markup tree plus whole-document parse/serialize with
//! declaration and DOCTYPE preservation.

mod document;
mod node;

pub use document::{Document, XmlDecl};
pub use node::{Element, Node};
