//! Compiled regex patterns for boundary detection, sanitization and rewriting.
//!
//! All patterns are compiled once at first use via `LazyLock`. Patterns are
//! grouped by the pipeline stage that consumes them.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

// =============================================================================
// Boundary Markers
// =============================================================================

/// Opening tag of the bottom user-profile container.
pub static USER_PROFILE_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<div[^>]*\sid=['"]user-profile-bottom-wrapper['"]"#)
        .expect("USER_PROFILE_MARKER regex")
});

/// Opening `<footer>` element.
pub static FOOTER_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<footer\b").expect("FOOTER_MARKER regex"));

/// Opening tag of the right-hand rail.
pub static RIGHT_RAIL_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<div[^>]*\sid=['"]right['"]"#).expect("RIGHT_RAIL_MARKER regex")
});

/// Opening tag of a next/previous navigation container.
///
/// Pages usually carry two: a secondary bar near the top and the real one
/// below the lesson body.
pub static NEXTPREV_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<div[^>]*\sclass=['"](?:w3-clear\s+)?nextprev['"]"#)
        .expect("NEXTPREV_MARKER regex")
});

// =============================================================================
// Noise Removal
// =============================================================================

/// Known ad containers. These do not nest, so a lazy match to the first
/// closing `</div>` is enough.
pub static AD_CONTAINER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<div[^>]*\sid=['"](?:midcontentadcontainer|mainLeaderboard)['"].*?</div>"#)
        .expect("AD_CONTAINER regex")
});

/// `<script>` blocks with their bodies.
pub static SCRIPT_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script\b.*?</script\s*>").expect("SCRIPT_BLOCK regex"));

/// Residual next/prev navigation blocks.
pub static NEXTPREV_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<div[^>]*\sclass=['"](?:w3-clear\s+)?nextprev['"].*?</div>"#)
        .expect("NEXTPREV_BLOCK regex")
});

/// "Try it Yourself" call-to-action anchors, plain or `w3-btn` styled.
///
/// The phrase must appear before any closing tag so the match cannot run
/// across several anchors.
pub static TRY_IT_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<a\b[^>]*>(?:[^<]|<[^/])*?try it yourself.*?</a>")
        .expect("TRY_IT_LINK regex")
});

/// Exercise / sandbox widget container.
pub static EXERCISE_CONTAINER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<div[^>]*\sid=['"]exercisecontainer['"].*?</div>"#)
        .expect("EXERCISE_CONTAINER regex")
});

/// "Track Your Progress" heading left behind by the exercise widget.
pub static TRACK_PROGRESS_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<h2>\s*Track Your Progress\s*</h2>").expect("TRACK_PROGRESS_HEADING regex")
});

/// Dark trailing panel: everything from this element to the end is dropped.
pub static DARK_PANEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<div[^>]*\sstyle=['"][^'"]*background-color:\s*#282b35[^'"]*['"].*"#)
        .expect("DARK_PANEL regex")
});

/// HTML comments.
pub static HTML_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("HTML_COMMENT regex"));

// =============================================================================
// Titles
// =============================================================================

/// First `<h1>` element and its inner markup.
pub static PRIMARY_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<h1\b[^>]*>(.*?)</h1\s*>").expect("PRIMARY_HEADING regex"));

/// Inline decoration tags unwrapped from headings.
pub static SPAN_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</?span\b[^>]*>").expect("SPAN_TAG regex"));

// =============================================================================
// Assets
// =============================================================================

/// Image reference attributes: `src` and the comma-separated `srcset`.
///
/// Group 1 is the attribute name, group 2 a double-quoted value, group 3 a
/// single-quoted value.
pub static IMAGE_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\b(srcset|src)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("IMAGE_REFERENCE regex")
});

/// Whitespace separating a `srcset` URL from its descriptor.
pub static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("WHITESPACE regex"));

// =============================================================================
// Code Block Normalization
// =============================================================================

/// Source-formatting whitespace (excludes `&nbsp;` / U+00A0).
pub static SOURCE_WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t\r\n]+").expect("SOURCE_WHITESPACE regex"));

/// `<br>` with surrounding spaces.
pub static LINE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i) *<br\s*/?> *").expect("LINE_BREAK regex"));

/// Runs of blank lines.
pub static MULTIPLE_NEWLINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{2,}").expect("MULTIPLE_NEWLINES regex"));
