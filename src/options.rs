//! Configuration options for the extraction pipeline.
//!
//! The `Options` struct tunes the per-page heuristics, the crawler's
//! safeguards and the optional post-processing passes.

use crate::assets::CollisionPolicy;

/// Configuration options for page processing and curriculum discovery.
///
/// All fields are public for easy configuration. Use `Default::default()`
/// for the settings that match the source layout family.
///
/// # Example
///
/// ```rust
/// use rs_courseware::Options;
///
/// let options = Options {
///     crawl_ceiling: 50,
///     wrap_tables: true,
///     ..Options::default()
/// };
/// assert_eq!(options.nav_threshold, 500);
/// ```
#[derive(Debug, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct Options {
    /// `id` values that mark the opening tag of the main content region.
    ///
    /// The first one found (in document order) starts the fragment.
    ///
    /// Default: `["main"]`
    pub main_content_ids: Vec<String>,

    /// Minimum fragment offset for a next/prev container to count as the
    /// bottom-of-content marker.
    ///
    /// Occurrences at or below this offset are treated as the secondary nav
    /// bar near the top of the page and ignored.
    ///
    /// Default: `500`
    pub nav_threshold: usize,

    /// Maximum number of pages the chain crawler visits per course.
    ///
    /// Default: `200`
    pub crawl_ceiling: usize,

    /// Entry page names tried in order by the chain crawler.
    ///
    /// Default: `["index.html", "default.html"]`
    pub crawl_entry_names: Vec<String>,

    /// Section title used for the single section a crawl produces.
    ///
    /// Default: `"Tutorial"`
    pub crawl_section_title: String,

    /// Maximum number of files picked up by directory-listing discovery.
    ///
    /// Default: `30`
    pub directory_limit: usize,

    /// Filename substrings excluded from directory-listing discovery.
    ///
    /// Default: `["exercise", "quiz"]`
    pub directory_exclude: Vec<String>,

    /// What to do when two different source images share a basename.
    ///
    /// Default: `CollisionPolicy::Overwrite`
    pub collision_policy: CollisionPolicy,

    /// Rewrite `.w3-code` blocks into `<pre><code class="language-*">`.
    ///
    /// Default: `false`
    pub normalize_code_blocks: bool,

    /// Wrap top-level tables in a responsive wrapper `div`.
    ///
    /// Default: `false`
    pub wrap_tables: bool,

    /// Remove `target` attributes from links in the body.
    ///
    /// Default: `false`
    pub strip_link_targets: bool,
}

impl Options {
    /// True when any DOM post-processing pass is enabled.
    #[must_use]
    pub fn wants_postprocessing(&self) -> bool {
        self.normalize_code_blocks || self.wrap_tables || self.strip_link_targets
    }
}

impl Default for Options {
    fn default() -> Self {
        Self {
            main_content_ids: vec!["main".to_string()],
            nav_threshold: 500,
            crawl_ceiling: 200,
            crawl_entry_names: vec!["index.html".to_string(), "default.html".to_string()],
            crawl_section_title: "Tutorial".to_string(),
            directory_limit: 30,
            directory_exclude: vec!["exercise".to_string(), "quiz".to_string()],
            collision_policy: CollisionPolicy::Overwrite,
            normalize_code_blocks: false,
            wrap_tables: false,
            strip_link_targets: false,
        }
    }
}
