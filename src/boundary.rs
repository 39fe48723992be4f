//! Main-content boundary detection.
//!
//! Locates where the lesson body starts (just after the opening tag carrying
//! a main-content id) and where it ends (the earliest of several end
//! markers), and slices the page to that region.

use regex::Regex;
use tracing::debug;

use crate::options::Options;
use crate::patterns::{FOOTER_MARKER, NEXTPREV_MARKER, RIGHT_RAIL_MARKER, USER_PROFILE_MARKER};

/// Byte range of the content region within a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentBounds {
    pub start: usize,
    pub end: usize,
    /// Whether a main-content opening tag was found.
    pub found_start: bool,
    /// Whether any end marker was found.
    pub found_end: bool,
}

/// Compiled boundary rules for one set of [`Options`].
#[derive(Debug, Clone)]
pub struct BoundaryDetector {
    main_start: Option<Regex>,
    nav_threshold: usize,
}

impl BoundaryDetector {
    #[must_use]
    pub fn new(options: &Options) -> Self {
        let ids: Vec<String> = options
            .main_content_ids
            .iter()
            .filter(|id| !id.is_empty())
            .map(|id| regex::escape(id))
            .collect();

        // Escaped ids always produce a valid pattern; an empty id list
        // simply disables start detection.
        let main_start = if ids.is_empty() {
            None
        } else {
            Regex::new(&format!(
                r#"(?i)<[a-z][a-z0-9]*\b[^>]*\sid=['"](?:{})['"][^>]*>"#,
                ids.join("|")
            ))
            .ok()
        };

        Self {
            main_start,
            nav_threshold: options.nav_threshold,
        }
    }

    /// Computes the content bounds of `html`.
    #[must_use]
    pub fn bounds(&self, html: &str) -> ContentBounds {
        let start_match = self.main_start.as_ref().and_then(|re| re.find(html));
        let start = start_match.map_or(0, |m| m.end());
        let rest = &html[start..];

        let mut earliest = rest.len();
        let mut found_end = false;

        for marker in [&*USER_PROFILE_MARKER, &*FOOTER_MARKER, &*RIGHT_RAIL_MARKER] {
            if let Some(m) = marker.find(rest) {
                found_end = true;
                earliest = earliest.min(m.start());
            }
        }

        // The top-of-page nav bar sits within the first few hundred bytes of
        // the region; the last occurrence past the threshold is the real end.
        if let Some(bottom) = NEXTPREV_MARKER
            .find_iter(rest)
            .filter(|m| m.start() > self.nav_threshold)
            .last()
        {
            found_end = true;
            earliest = earliest.min(bottom.start());
        }

        debug!(
            start,
            end = start + earliest,
            found_start = start_match.is_some(),
            found_end,
            "content bounds"
        );

        ContentBounds {
            start,
            end: start + earliest,
            found_start: start_match.is_some(),
            found_end,
        }
    }

    /// Returns the content fragment of `html` (interior whitespace untouched).
    #[must_use]
    pub fn extract<'a>(&self, html: &'a str) -> &'a str {
        let bounds = self.bounds(html);
        &html[bounds.start..bounds.end]
    }
}

impl Default for BoundaryDetector {
    fn default() -> Self {
        Self::new(&Options::default())
    }
}

/// Extracts the content fragment using default options.
#[must_use]
pub fn extract_fragment(html: &str) -> &str {
    BoundaryDetector::default().extract(html)
}

/// Computes content bounds using default options.
#[must_use]
pub fn find_content_bounds(html: &str) -> ContentBounds {
    BoundaryDetector::default().bounds(html)
}
