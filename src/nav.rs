//! Navigation metadata read from the raw page.
//!
//! The sanitizer deletes navigation elements, so anything that depends on
//! them (the crawler's next link, sidebar menus) is read here from the
//! original markup, in a pass that runs before and apart from sanitization.

use crate::dom::{self, Document};
use crate::url_utils::strip_query_and_fragment;

/// Sidebar containers, most specific first.
const SIDEBAR_SELECTORS: &[&str] = &["#sidenav", "#leftmenuinner", ".w3-sidebar"];

/// Section title used for menu links that precede the first heading.
const GENERAL_SECTION: &str = "General";

/// Navigation facts extracted from an unsanitized page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationMetadata {
    /// `href` of the first anchor whose text contains "Next".
    pub next: Option<String>,
}

impl NavigationMetadata {
    /// Reads navigation metadata from the original page markup.
    #[must_use]
    pub fn from_document(raw_html: &str) -> Self {
        let doc = dom::parse(raw_html);
        Self {
            next: find_next_link(&doc),
        }
    }
}

/// First anchor whose text contains "Next" and whose `href` is non-empty.
#[must_use]
pub fn find_next_link(doc: &Document) -> Option<String> {
    doc.select("a[href]").iter().find_map(|a| {
        if !a.text().contains("Next") {
            return None;
        }
        let href = dom::get_attribute(&a, "href")?;
        let href = href.trim();
        (!href.is_empty()).then(|| href.to_string())
    })
}

/// One link of a sidebar menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuLink {
    pub title: String,
    /// Link target with query string removed.
    pub file: String,
}

/// A heading-delimited group of sidebar links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuSection {
    pub title: String,
    pub links: Vec<MenuLink>,
}

/// Parses the sidebar menu of a page into heading-delimited sections.
///
/// Each `h2` opens a new section; links before the first heading go to a
/// "General" section. Script links, in-page anchors and text-less links are
/// skipped, duplicates within a section are dropped, and sections without
/// links are omitted. Returns `None` when the page has no sidebar.
#[must_use]
pub fn parse_sidebar_menu(raw_html: &str) -> Option<Vec<MenuSection>> {
    let doc = dom::parse(raw_html);
    let sidebar = dom::first_of(&doc, SIDEBAR_SELECTORS)?;

    let mut sections = Vec::new();
    let mut current = MenuSection {
        title: GENERAL_SECTION.to_string(),
        links: Vec::new(),
    };

    for el in sidebar.select("h2, a").iter() {
        match dom::tag_name(&el).as_deref() {
            Some("h2") => {
                let finished = std::mem::replace(
                    &mut current,
                    MenuSection {
                        title: dom::trimmed_text(&el),
                        links: Vec::new(),
                    },
                );
                if !finished.links.is_empty() {
                    sections.push(finished);
                }
            }
            Some("a") => {
                let Some(href) = dom::get_attribute(&el, "href") else {
                    continue;
                };
                let href = href.trim();
                if href.is_empty() || href.starts_with("javascript:") || href.contains('#') {
                    continue;
                }
                let title = dom::trimmed_text(&el);
                let file = strip_query_and_fragment(href).to_string();
                if title.is_empty() || file.is_empty() {
                    continue;
                }
                let duplicate = current
                    .links
                    .iter()
                    .any(|link| link.file == file && link.title == title);
                if !duplicate {
                    current.links.push(MenuLink { title, file });
                }
            }
            _ => {}
        }
    }

    if !current.links.is_empty() {
        sections.push(current);
    }
    Some(sections)
}
