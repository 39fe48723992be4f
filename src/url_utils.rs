//! URL and reference utilities.
//!
//! Classifies references found in page markup (remote vs. local), extracts
//! basenames, and resolves relative page links inside a course tree.

use percent_encoding::percent_decode_str;
use url::Url;

/// Base used to resolve page-relative links without touching the filesystem.
const PAGE_BASE: &str = "http://course.invalid/";

/// Check if a string is a valid absolute network URL (`http`/`https` with a host).
#[must_use]
pub fn is_absolute_url(s: &str) -> bool {
    let s = s.trim();
    if !s.starts_with("http://") && !s.starts_with("https://") {
        return false;
    }
    Url::parse(s).is_ok_and(|url| url.host().is_some())
}

/// True for references that must not be resolved against the source tree:
/// network URLs, protocol-relative URLs, inline `data:` payloads and other
/// non-file schemes.
#[must_use]
pub fn is_remote_reference(reference: &str) -> bool {
    let r = reference.trim();
    let lower = r.to_ascii_lowercase();
    if lower.starts_with("http:")
        || lower.starts_with("https:")
        || lower.starts_with("//")
        || lower.starts_with("data:")
        || lower.starts_with("javascript:")
        || lower.starts_with("mailto:")
    {
        return true;
    }
    is_absolute_url(r)
}

/// Strip query parameters and fragment identifiers from a reference.
#[must_use]
pub fn strip_query_and_fragment(reference: &str) -> &str {
    let without_query = reference.split('?').next().unwrap_or(reference);
    without_query.split('#').next().unwrap_or(without_query)
}

/// Extract the filename (last path segment) from a reference.
///
/// Query strings and fragments are dropped; `.`/`..` and empty segments
/// yield an empty string.
#[must_use]
pub fn extract_filename(reference: &str) -> String {
    let path = strip_query_and_fragment(reference.trim());
    let filename = path.rsplit(['/', '\\']).next().unwrap_or("").trim();

    if filename.is_empty() || filename == "." || filename == ".." {
        return String::new();
    }

    filename.to_string()
}

/// Resolve `href` found on page `current` (both relative to the course
/// directory) into a course-relative page key.
///
/// Returns `None` for empty, remote or fragment-only links. Links that climb
/// above the course root are clamped to it, as URL resolution does.
#[must_use]
pub fn resolve_page_link(current: &str, href: &str) -> Option<String> {
    let href = strip_query_and_fragment(href.trim());
    if href.is_empty() || is_remote_reference(href) {
        return None;
    }

    let base = Url::parse(PAGE_BASE).ok()?;
    let page = base.join(current).ok()?;
    let target = page.join(href).ok()?;

    if target.host_str() != base.host_str() {
        return None;
    }

    let key = target.path().trim_start_matches('/');
    if key.is_empty() || key.ends_with('/') {
        return None;
    }
    // `Url` percent-encodes spaces and non-ASCII; keys mirror filenames.
    Some(percent_decode_str(key).decode_utf8_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_references() {
        assert!(is_remote_reference("https://example.com/a.png"));
        assert!(is_remote_reference("http://example.com/a.png"));
        assert!(is_remote_reference("//cdn.example.com/a.png"));
        assert!(is_remote_reference("data:image/png;base64,AAAA"));
        assert!(!is_remote_reference("img_girl.jpg"));
        assert!(!is_remote_reference("../images/a.png"));
        assert!(!is_remote_reference("/images/a.png"));
    }

    #[test]
    fn test_extract_filename() {
        assert_eq!(extract_filename("../images/pic.jpg?v=2#x"), "pic.jpg");
        assert_eq!(extract_filename("pic.jpg"), "pic.jpg");
        assert_eq!(extract_filename("images\\pic.jpg"), "pic.jpg");
        assert_eq!(extract_filename("images/"), "");
        assert_eq!(extract_filename(".."), "");
    }

    #[test]
    fn test_resolve_page_link() {
        assert_eq!(resolve_page_link("default.html", "js_intro.html").as_deref(), Some("js_intro.html"));
        assert_eq!(
            resolve_page_link("sub/a.html", "b.html#top").as_deref(),
            Some("sub/b.html")
        );
        assert_eq!(resolve_page_link("sub/a.html", "../c.html").as_deref(), Some("c.html"));
        assert_eq!(
            resolve_page_link("a.html", "my page.html").as_deref(),
            Some("my page.html")
        );
        assert_eq!(
            resolve_page_link("a.html", "caf%C3%A9.html").as_deref(),
            Some("café.html")
        );
        assert_eq!(resolve_page_link("a.html", "https://x.com/b.html"), None);
        assert_eq!(resolve_page_link("a.html", "#top"), None);
        assert_eq!(resolve_page_link("a.html", ""), None);
    }
}
