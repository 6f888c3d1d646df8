//! Document transform rules
//!
//! Each rule is a pure tree rewrite: it mutates a parsed [`Document`] and
//! reports whether anything changed. Rules keep no state between documents.

pub mod responsive;
pub mod svg_unwrap;

use crate::xhtml::Document;
use std::fmt;

/// Selects which rewrite to run. Passed explicitly into the pipeline entry
/// points; there is no process-wide transform state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transform {
    /// Replace SVG image wrappers (and single-image figures) with plain
    /// `<img>` tags
    SvgUnwrap,
    /// Strip fixed image sizes and inject a responsive style block
    ResponsiveImages,
}

impl Transform {
    /// Apply the rule to a document; returns whether the tree was modified
    pub fn apply(self, doc: &mut Document) -> bool {
        match self {
            Transform::SvgUnwrap => svg_unwrap::apply(doc),
            Transform::ResponsiveImages => responsive::apply(doc),
        }
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transform::SvgUnwrap => write!(f, "svg-unwrap"),
            Transform::ResponsiveImages => write!(f, "responsive-images"),
        }
    }
}

/// Apply several rules in order; returns whether any of them modified the
/// document
pub fn apply_all(transforms: &[Transform], doc: &mut Document) -> bool {
    let mut modified = false;
    for transform in transforms {
        modified |= transform.apply(doc);
    }
    modified
}
