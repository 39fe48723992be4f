//! Per-page pipeline.
//!
//! Raw page → navigation metadata (read first, from the raw markup) →
//! boundary extraction → sanitization → asset rewriting → optional
//! post-processing → title resolution.

use std::path::Path;

use tracing::debug;

use crate::assets::AssetResolver;
use crate::boundary::BoundaryDetector;
use crate::error::Result;
use crate::fs_utils::read_page;
use crate::nav::NavigationMetadata;
use crate::options::Options;
use crate::postprocess::postprocess;
use crate::sanitize::sanitize;
use crate::title::TitleResolver;

/// Output of the per-page pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedPage {
    pub title: String,
    /// Sanitized body with image references rewritten.
    pub body: String,
    /// Raw `href` of the page's "Next" link, read before sanitization.
    pub next: Option<String>,
}

/// Runs the page pipeline with one set of options.
#[derive(Debug, Clone)]
pub struct PageProcessor {
    detector: BoundaryDetector,
    options: Options,
}

impl PageProcessor {
    #[must_use]
    pub fn new(options: Options) -> Self {
        Self {
            detector: BoundaryDetector::new(&options),
            options,
        }
    }

    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Processes already-loaded markup.
    ///
    /// `file` is the page's course-relative name (used for the title
    /// fallback and lookup table), `page_dir` the directory holding it.
    pub fn process_html(
        &self,
        raw: &str,
        file: &str,
        page_dir: &Path,
        assets: &mut AssetResolver,
        titles: &TitleResolver,
    ) -> ProcessedPage {
        let nav = NavigationMetadata::from_document(raw);

        let fragment = self.detector.extract(raw);
        let cleaned = sanitize(fragment);
        let rewritten = assets.rewrite(&cleaned, page_dir);
        let body = postprocess(&rewritten, &self.options);

        let title = titles.resolve(file_key(file), raw);
        debug!(file, title = %title, bytes = body.len(), "processed page");

        ProcessedPage {
            title,
            body,
            next: nav.next,
        }
    }

    /// Reads `source_dir/file` and processes it.
    ///
    /// Fails with [`crate::Error::MissingSource`] when the page does not exist.
    pub fn process_file(
        &self,
        source_dir: &Path,
        file: &str,
        assets: &mut AssetResolver,
        titles: &TitleResolver,
    ) -> Result<ProcessedPage> {
        let path = source_dir.join(file);
        let raw = read_page(&path)?;
        let page_dir = path.parent().unwrap_or(source_dir);
        Ok(self.process_html(&raw, file, page_dir, assets, titles))
    }
}

impl Default for PageProcessor {
    fn default() -> Self {
        Self::new(Options::default())
    }
}

/// Title lookups and the filename fallback key on the bare filename.
fn file_key(file: &str) -> &str {
    file.rsplit(['/', '\\']).next().unwrap_or(file)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    use super::*;
    use crate::assets::{AssetLayout, AssetScope, CollisionPolicy};

    fn resolver() -> AssetResolver {
        let layout = AssetLayout::new(
            Path::new("/nonexistent/content"),
            "assets/content",
            AssetScope::Shared,
            "demo",
        );
        AssetResolver::new(layout, Vec::<PathBuf>::new(), CollisionPolicy::Overwrite)
    }

    #[test]
    fn next_link_survives_sanitization() {
        let padding = "x".repeat(600);
        let raw = format!(
            r#"<div id="main"><h1>Intro</h1><p>{padding}</p>
            <div class="w3-clear nextprev"><a href="b.html">Next &#10095;</a></div>
            <footer>f</footer></div>"#
        );
        let page = PageProcessor::default().process_html(
            &raw,
            "a.html",
            Path::new("."),
            &mut resolver(),
            &TitleResolver::default(),
        );
        assert_eq!(page.next.as_deref(), Some("b.html"));
        assert!(!page.body.contains("nextprev"));
        assert_eq!(page.title, "Intro");
    }

    #[test]
    fn title_key_is_bare_filename() {
        let mut titles = BTreeMap::new();
        titles.insert("ref_x.html".to_string(), "Curated".to_string());
        let page = PageProcessor::default().process_html(
            "<p>no heading</p>",
            "sub/ref_x.html",
            Path::new("."),
            &mut resolver(),
            &TitleResolver::new(Vec::new(), titles),
        );
        assert_eq!(page.title, "Curated");
    }

    #[test]
    fn missing_file_is_reported() {
        let result = PageProcessor::default().process_file(
            Path::new("/nonexistent"),
            "nope.html",
            &mut resolver(),
            &TitleResolver::default(),
        );
        assert!(matches!(result, Err(crate::Error::MissingSource(_))));
    }
}
