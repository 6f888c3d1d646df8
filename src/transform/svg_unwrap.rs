//! SVG wrapper removal
//!
//! Many fixed-layout EPUBs wrap each illustration in an `<svg>` element
//! whose only content is an `<image>` pointing at the bitmap, purely to get
//! viewport scaling; some add a `<figure>` around that. Both wrappers are
//! replaced with the plain `<img>` they host. A wrapper without a
//! resolvable image reference is left alone: deleting it would delete the
//! page's only content.

use crate::xhtml::{Document, Element, Node};

/// Rewrite all SVG image wrappers in the document; returns whether the tree
/// was modified
pub fn apply(doc: &mut Document) -> bool {
    rewrite(doc.root_mut())
}

fn rewrite(elem: &mut Element) -> bool {
    let mut modified = false;

    // Bottom-up, so a figure wrapping an svg sees the replacement <img>
    // when its own turn comes.
    for child in elem.children.iter_mut().filter_map(Node::as_element_mut) {
        modified |= rewrite(child);
    }

    for node in elem.children.iter_mut() {
        let replacement = match node {
            Node::Element(child) if child.is("svg") => img_from_svg(child),
            Node::Element(child) if child.is("figure") => unwrap_figure(child),
            _ => None,
        };
        if let Some(img) = replacement {
            *node = Node::Element(img);
            modified = true;
        }
    }

    modified
}

/// Build the `<img>` replacing an svg wrapper.
///
/// Only fires when the svg is a pure wrapper: exactly one `<image>` child,
/// with nothing else inside besides `<title>`/`<desc>` and comments. An svg
/// with actual vector content stays as it is.
fn img_from_svg(svg: &Element) -> Option<Element> {
    let mut image = None;
    for node in &svg.children {
        match node {
            Node::Element(e) if e.is("image") => {
                if image.is_some() {
                    return None;
                }
                image = Some(e);
            }
            Node::Element(e) if e.is("title") || e.is("desc") => {}
            Node::Element(_) => return None,
            Node::Comment(_) => {}
            n if n.is_whitespace() => {}
            _ => return None,
        }
    }

    let image = image?;
    let href = image.attr_local("href").filter(|h| !h.trim().is_empty())?;

    let mut img = Element::new("img");
    img.self_closing = true;
    img.set_attr("src", href);

    let title_text = svg
        .child_elements()
        .find(|e| e.is("title"))
        .and_then(|t| {
            t.children.iter().find_map(|n| match n {
                Node::Text(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
                _ => None,
            })
        });
    if let Some(alt) = image
        .attr_local("alt")
        .map(str::to_string)
        .or_else(|| svg.attr("aria-label").map(str::to_string))
        .or(title_text)
    {
        img.set_attr("alt", alt);
    }

    Some(img)
}

/// Unwrap a figure whose content is a single image and nothing else
fn unwrap_figure(figure: &Element) -> Option<Element> {
    let mut img = None;
    for node in &figure.children {
        match node {
            Node::Element(e) if e.is("img") && img.is_none() => img = Some(e),
            Node::Element(_) => return None,
            n if n.is_whitespace() => {}
            Node::Comment(_) => {}
            _ => return None,
        }
    }
    img.cloned()
}
