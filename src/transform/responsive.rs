//! Responsive image sizing
//!
//! Strips literal `width`/`height` attributes from `<img>` elements and
//! injects one id-tagged style block per document so images scale with the
//! reading viewport. Running it again on an already-transformed document
//! changes nothing, which is what makes in-place batch reruns safe.

use crate::xhtml::{Document, Element, Node};
use log::warn;

/// id on the injected `<style>` element; its presence marks a document as
/// already transformed
pub const STYLE_ID: &str = "img-autoscale";

/// The injected rules: scale to the container, keep aspect ratio
pub const RESPONSIVE_CSS: &str = "img { max-width: 100%; height: auto; }";

/// Rewrite image sizing in the document; returns whether the tree was
/// modified
pub fn apply(doc: &mut Document) -> bool {
    let root = doc.root_mut();
    let mut modified = false;

    root.visit_mut(&mut |elem| {
        if elem.is("img") {
            modified |= elem.remove_attr_local("width");
            modified |= elem.remove_attr_local("height");
        }
    });

    let head = if root.is("head") {
        Some(root)
    } else {
        root.find_descendant_mut("head")
    };

    match head {
        Some(head) if !has_injected_style(head) => {
            head.children.push(Node::Element(style_element()));
            modified = true;
        }
        Some(_) => {}
        None => warn!("document has no <head>; responsive style not injected"),
    }

    modified
}

fn has_injected_style(head: &Element) -> bool {
    head.child_elements()
        .any(|e| e.is("style") && e.attr("id") == Some(STYLE_ID))
}

fn style_element() -> Element {
    Element::new("style")
        .with_attr("id", STYLE_ID)
        .with_attr("type", "text/css")
        .with_text(RESPONSIVE_CSS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn run(xml: &str) -> (String, bool) {
        let mut doc = Document::parse(xml).unwrap();
        let modified = apply(&mut doc);
        (doc.to_xml().unwrap(), modified)
    }

    #[test]
    fn test_strips_fixed_size() {
        let (out, modified) = run(
            r#"<html><head></head><body><img src="a.jpg" width="600" height="800"/></body></html>"#,
        );
        assert!(modified);
        assert!(out.contains(r#"<img src="a.jpg"/>"#));
        assert!(!out.contains("width=\"600\""));
    }

    #[test]
    fn test_injects_style_once() {
        let (out, _) = run(r#"<html><head><title>t</title></head><body/></html>"#);
        assert_eq!(out.matches("<style").count(), 1);
        assert!(out.contains(RESPONSIVE_CSS));
        assert!(out.contains(STYLE_ID));
    }

    #[test]
    fn test_idempotent() {
        let (once, first_modified) = run(
            r#"<html><head></head><body><img src="a.jpg" width="600" height="800"/></body></html>"#,
        );
        assert!(first_modified);

        let (twice, second_modified) = run(&once);
        assert!(!second_modified);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_other_img_attrs_kept() {
        let (out, _) = run(
            r#"<html><head/><body><img src="a.jpg" alt="pic" class="c" width="10"/></body></html>"#,
        );
        assert!(out.contains(r#"<img src="a.jpg" alt="pic" class="c"/>"#));
    }

    #[test]
    fn test_no_head_still_strips_sizes() {
        let (out, modified) = run(r#"<html><body><img src="a.jpg" width="10"/></body></html>"#);
        assert!(modified);
        assert!(!out.contains("width"));
        assert!(!out.contains("<style"));
    }

    #[test]
    fn test_svg_image_sizes_untouched() {
        let xml = r#"<html><head/><body><svg><image href="a.jpg" width="800" height="1200"/></svg></body></html>"#;
        let (out, _) = run(xml);
        assert!(out.contains(r#"width="800""#));
    }
}
