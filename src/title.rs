//! Lesson title resolution.
//!
//! Priority: curated lookup table, then the page's primary heading (with
//! `<span>` decoration unwrapped), then a heuristic derived from the filename.

use std::collections::BTreeMap;

use crate::patterns::{PRIMARY_HEADING, SPAN_TAG, WHITESPACE};
use crate::url_utils::extract_filename;

/// Extensions dropped by the filename heuristic.
const PAGE_EXTENSIONS: &[&str] = &[".html", ".htm"];

/// Resolves titles for the pages of one section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TitleResolver {
    prefixes: Vec<String>,
    overrides: BTreeMap<String, String>,
}

impl TitleResolver {
    /// `prefixes` are stripped (in order) from filenames by the fallback
    /// heuristic; `overrides` maps source filenames to curated titles.
    #[must_use]
    pub fn new(prefixes: Vec<String>, overrides: BTreeMap<String, String>) -> Self {
        Self { prefixes, overrides }
    }

    /// Title for `file`, whose original (unsanitized) markup is `document`.
    #[must_use]
    pub fn resolve(&self, file: &str, document: &str) -> String {
        if let Some(curated) = self.overrides.get(file) {
            return curated.clone();
        }
        primary_heading(document).unwrap_or_else(|| title_from_filename(file, &self.prefixes))
    }
}

/// Text of the first `<h1>`, with `<span>` tags unwrapped and whitespace
/// runs collapsed. Other inline markup is kept as written.
#[must_use]
pub fn primary_heading(document: &str) -> Option<String> {
    let inner = PRIMARY_HEADING.captures(document)?.get(1)?.as_str();
    let unwrapped = SPAN_TAG.replace_all(inner, "");
    let title = WHITESPACE.replace_all(unwrapped.trim(), " ").into_owned();
    (!title.is_empty()).then_some(title)
}

/// Filename heuristic: `js_arrow-functions.html` with prefix `js_` becomes
/// `Arrow functions`.
#[must_use]
pub fn title_from_filename(file: &str, prefixes: &[String]) -> String {
    let mut name = extract_filename(file);
    if name.is_empty() {
        name = file.to_string();
    }

    let mut stem = name.as_str();
    for prefix in prefixes {
        if let Some(rest) = stem.strip_prefix(prefix.as_str()) {
            stem = rest;
        }
    }
    for ext in PAGE_EXTENSIONS {
        if let Some(rest) = stem.strip_suffix(ext) {
            stem = rest;
            break;
        }
    }

    let spaced = stem.replace(['_', '-'], " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prefixes(list: &[&str]) -> Vec<String> {
        list.iter().map(|p| (*p).to_string()).collect()
    }

    #[test]
    fn heading_unwraps_spans() {
        let html = r#"<div><h1>JavaScript <span class="color_h1">Arrays</span></h1></div>"#;
        assert_eq!(primary_heading(html).as_deref(), Some("JavaScript Arrays"));
    }

    #[test]
    fn heading_keeps_other_markup() {
        let html = "<h1>The <code>let</code> keyword</h1>";
        assert_eq!(primary_heading(html).as_deref(), Some("The <code>let</code> keyword"));
    }

    #[test]
    fn empty_heading_is_ignored() {
        assert_eq!(primary_heading("<h1> <span></span> </h1>"), None);
        assert_eq!(primary_heading("<h2>Not primary</h2>"), None);
    }

    #[test]
    fn filename_fallback() {
        assert_eq!(title_from_filename("sql_null_values.html", &prefixes(&["sql_"])), "Null values");
        assert_eq!(title_from_filename("css_max-width.html", &prefixes(&["css_", "css3_"])), "Max width");
        assert_eq!(title_from_filename("default.html", &prefixes(&["sql_"])), "Default");
        assert_eq!(title_from_filename("ref_html_x.html", &prefixes(&["html_", "ref_"])), "Html x");
    }

    #[test]
    fn overrides_beat_heading() {
        let mut overrides = BTreeMap::new();
        overrides.insert("ref_canvas.html".to_string(), "Canvas".to_string());
        let resolver = TitleResolver::new(prefixes(&["ref_"]), overrides);
        assert_eq!(resolver.resolve("ref_canvas.html", "<h1>HTML Canvas Reference</h1>"), "Canvas");
        assert_eq!(resolver.resolve("ref_other.html", "<h1>Other Ref</h1>"), "Other Ref");
        assert_eq!(resolver.resolve("ref_other.html", "<p>none</p>"), "Other");
    }
}
