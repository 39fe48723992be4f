//! DOM Operations Adapter
//!
//! Thin helpers over the `dom_query` crate for the passes that need a real
//! tree: navigation metadata on raw pages and optional post-processing of
//! sanitized bodies.

pub use dom_query::{Document, Selection};

/// Parse an HTML string into a document.
#[inline]
#[must_use]
pub fn parse(html: &str) -> Document {
    Document::from(html)
}

/// Get an attribute value as an owned string.
#[inline]
#[must_use]
pub fn get_attribute(sel: &Selection, name: &str) -> Option<String> {
    sel.attr(name).map(|s| s.to_string())
}

/// Get the tag name (lowercase) of the first node in the selection.
#[must_use]
pub fn tag_name(sel: &Selection) -> Option<String> {
    sel.nodes()
        .first()
        .and_then(dom_query::NodeRef::node_name)
        .map(|t| t.to_string())
}

/// Whether the element's `class` attribute contains `class` as a token.
#[must_use]
pub fn has_class_token(sel: &Selection, class: &str) -> bool {
    get_attribute(sel, "class").is_some_and(|c| c.split_whitespace().any(|t| t == class))
}

/// Whether any ancestor of the selection has tag name `tag`.
#[must_use]
pub fn has_ancestor(sel: &Selection, tag: &str) -> bool {
    let mut current = sel.parent();
    while current.exists() {
        if tag_name(&current).as_deref() == Some(tag) {
            return true;
        }
        current = current.parent();
    }
    false
}

/// Trimmed text content of node and descendants.
#[must_use]
pub fn trimmed_text(sel: &Selection) -> String {
    sel.text().trim().to_string()
}

/// The first element matching any of `selectors`, tried in order.
#[must_use]
pub fn first_of<'a>(doc: &'a Document, selectors: &[&str]) -> Option<Selection<'a>> {
    selectors
        .iter()
        .map(|selector| doc.select(selector))
        .find(Selection::exists)
        .map(|sel| sel.first())
}

/// Inner HTML of `<body>`, i.e. a parsed fragment serialized back.
#[must_use]
pub fn body_inner_html(doc: &Document) -> String {
    doc.select("body").inner_html().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_of_respects_priority() {
        let doc = parse(r#"<div class="w3-sidebar">s</div><div id="leftmenuinner">l</div>"#);
        let found = first_of(&doc, &["#sidenav", "#leftmenuinner", ".w3-sidebar"]);
        assert_eq!(found.map(|s| trimmed_text(&s)).as_deref(), Some("l"));
        assert!(first_of(&doc, &["#nothing"]).is_none());
    }

    #[test]
    fn tag_and_attribute() {
        let doc = parse(r#"<a href="x.html">X</a>"#);
        let a = doc.select("a");
        assert_eq!(tag_name(&a).as_deref(), Some("a"));
        assert_eq!(get_attribute(&a, "href").as_deref(), Some("x.html"));
    }

    #[test]
    fn body_round_trip() {
        let doc = parse("<p>x</p>");
        assert_eq!(body_inner_html(&doc), "<p>x</p>");
    }
}
