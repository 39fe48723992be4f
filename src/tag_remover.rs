//! Balanced-tag element removal.
//!
//! Removes one element, selected by tag name and an attribute value, together
//! with its whole subtree. There is no DOM: a small lexer emits `<tag` and
//! `</tag>` boundaries for a single tag name and a depth counter finds the
//! closing tag that balances the matched opening tag.
//!
//! ```rust
//! use rs_courseware::tag_remover::{remove_element, ElementSelector, Removal};
//!
//! let html = r#"<p>a</p><div class="ad"><div>x</div></div><p>b</p>"#;
//! let selector = ElementSelector::class("div", "ad");
//! assert_eq!(remove_element(html, &selector), Removal::Removed("<p>a</p><p>b</p>".to_string()));
//! ```

use tracing::debug;

use crate::error::Error;

/// Identifies the element to remove: `<tag ... attr="value">`.
///
/// Tag and attribute names match case-insensitively, and so does the value
/// (the whole attribute value must match, not a single class token).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementSelector {
    tag: String,
    attr: String,
    value: String,
}

impl ElementSelector {
    #[must_use]
    pub fn new(tag: &str, attr: &str, value: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attr: attr.to_ascii_lowercase(),
            value: value.to_string(),
        }
    }

    /// Selector on the `class` attribute.
    #[must_use]
    pub fn class(tag: &str, value: &str) -> Self {
        Self::new(tag, "class", value)
    }

    /// Selector on the `id` attribute.
    #[must_use]
    pub fn id(tag: &str, value: &str) -> Self {
        Self::new(tag, "id", value)
    }

    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }
}

/// Outcome of a single removal attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Removal {
    /// The element was found and excised; holds the remaining markup.
    Removed(String),
    /// No opening tag carries the selected attribute value.
    NotFound,
    /// The opening tag was found at `offset` but the input ended before its
    /// closing tag balanced.
    Unbalanced { offset: usize },
}

impl Removal {
    /// Converts the outcome into the markup to keep, treating both
    /// `NotFound` and `Unbalanced` as "nothing removed".
    #[must_use]
    pub fn unwrap_or_original(self, original: &str) -> String {
        match self {
            Removal::Removed(html) => html,
            Removal::NotFound | Removal::Unbalanced { .. } => original.to_string(),
        }
    }

    /// Strict conversion: `Unbalanced` becomes an error.
    pub fn into_result(self, selector: &ElementSelector) -> crate::Result<Option<String>> {
        match self {
            Removal::Removed(html) => Ok(Some(html)),
            Removal::NotFound => Ok(None),
            Removal::Unbalanced { offset } => Err(Error::Unbalanced {
                tag: selector.tag.clone(),
                offset,
            }),
        }
    }
}

/// Removes the first element matching `selector`, including every nested
/// element of the same tag name, and returns the remaining markup.
///
/// Only one element is removed per call. Callers that expect duplicates
/// call again on the result.
#[must_use]
pub fn remove_element(html: &str, selector: &ElementSelector) -> Removal {
    let Some(start) = find_opening(html, selector) else {
        return Removal::NotFound;
    };

    let mut depth: usize = 0;
    for token in TagTokens::new(html, &selector.tag, start) {
        match token {
            TagToken::Open { .. } => depth += 1,
            TagToken::Close { end, .. } => {
                // A stray closing tag before any opening one cannot occur:
                // the scan starts on the matched opening tag.
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    let mut out = String::with_capacity(html.len() - (end - start));
                    out.push_str(&html[..start]);
                    out.push_str(&html[end..]);
                    return Removal::Removed(out);
                }
            }
        }
    }

    Removal::Unbalanced { offset: start }
}

/// Lenient removal: returns the input unchanged when nothing was removed.
#[must_use]
pub fn strip_element(html: &str, selector: &ElementSelector) -> String {
    let removal = remove_element(html, selector);
    if let Removal::Unbalanced { offset } = removal {
        debug!(
            tag = %selector.tag,
            attr = %selector.attr,
            value = %selector.value,
            offset,
            "element never closed; left in place"
        );
    }
    removal.unwrap_or_original(html)
}

/// Finds the byte offset of the first opening tag matching `selector`.
fn find_opening(html: &str, selector: &ElementSelector) -> Option<usize> {
    TagTokens::new(html, &selector.tag, 0).find_map(|token| match token {
        TagToken::Open { start, attrs_start } => {
            let attrs = tag_attributes(html, attrs_start);
            attrs
                .iter()
                .any(|(name, value)| {
                    name.eq_ignore_ascii_case(&selector.attr)
                        && value.is_some_and(|v| v.eq_ignore_ascii_case(&selector.value))
                })
                .then_some(start)
        }
        TagToken::Close { .. } => None,
    })
}

/// A boundary of the tracked tag name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TagToken {
    /// `<tag` at `start`; attributes begin at `attrs_start`.
    Open { start: usize, attrs_start: usize },
    /// `</tag>` spanning `start..end`.
    Close { start: usize, end: usize },
}

/// Lexer over the `<tag` / `</tag>` boundaries of one tag name.
struct TagTokens<'a> {
    bytes: &'a [u8],
    tag: &'a [u8],
    pos: usize,
}

impl<'a> TagTokens<'a> {
    fn new(html: &'a str, tag: &'a str, from: usize) -> Self {
        Self {
            bytes: html.as_bytes(),
            tag: tag.as_bytes(),
            pos: from,
        }
    }

    /// True when the tag name sits at `at` and is not a prefix of a longer name.
    fn name_at(&self, at: usize) -> bool {
        let end = at + self.tag.len();
        if end > self.bytes.len() || !self.bytes[at..end].eq_ignore_ascii_case(self.tag) {
            return false;
        }
        match self.bytes.get(end) {
            None => true,
            Some(b) => b.is_ascii_whitespace() || *b == b'>' || *b == b'/',
        }
    }
}

impl Iterator for TagTokens<'_> {
    type Item = TagToken;

    fn next(&mut self) -> Option<TagToken> {
        while self.pos < self.bytes.len() {
            let offset = self.bytes[self.pos..].iter().position(|&b| b == b'<')?;
            let start = self.pos + offset;
            self.pos = start + 1;

            if self.bytes.get(start + 1) == Some(&b'/') {
                if !self.name_at(start + 2) {
                    continue;
                }
                let mut cursor = start + 2 + self.tag.len();
                while self.bytes.get(cursor).is_some_and(u8::is_ascii_whitespace) {
                    cursor += 1;
                }
                if self.bytes.get(cursor) == Some(&b'>') {
                    self.pos = cursor + 1;
                    return Some(TagToken::Close { start, end: cursor + 1 });
                }
            } else if self.name_at(start + 1) {
                let attrs_start = start + 1 + self.tag.len();
                self.pos = attrs_start;
                return Some(TagToken::Open { start, attrs_start });
            }
        }
        None
    }
}

/// Parses the attributes of an opening tag whose attribute list begins at
/// `from`, stopping at the closing `>`.
///
/// Values may be double-quoted, single-quoted or bare. Names are returned as
/// written; callers compare case-insensitively.
fn tag_attributes(html: &str, from: usize) -> Vec<(&str, Option<&str>)> {
    let bytes = html.as_bytes();
    let mut attrs = Vec::new();
    let mut pos = from;

    let skip_ws = |mut p: usize| {
        while bytes.get(p).is_some_and(u8::is_ascii_whitespace) {
            p += 1;
        }
        p
    };

    loop {
        pos = skip_ws(pos);
        match bytes.get(pos) {
            None | Some(b'>') => break,
            Some(b'/') => {
                pos += 1;
                continue;
            }
            _ => {}
        }

        let name_start = pos;
        while bytes
            .get(pos)
            .is_some_and(|b| !b.is_ascii_whitespace() && !matches!(b, b'=' | b'>' | b'/'))
        {
            pos += 1;
        }
        let name = &html[name_start..pos];

        pos = skip_ws(pos);
        if bytes.get(pos) != Some(&b'=') {
            attrs.push((name, None));
            continue;
        }
        pos = skip_ws(pos + 1);

        let value = match bytes.get(pos) {
            Some(&quote) if quote == b'"' || quote == b'\'' => {
                let value_start = pos + 1;
                let len = bytes[value_start..].iter().position(|&b| b == quote);
                let value_end = len.map_or(bytes.len(), |len| value_start + len);
                pos = (value_end + 1).min(bytes.len());
                &html[value_start..value_end]
            }
            _ => {
                let value_start = pos;
                while bytes.get(pos).is_some_and(|b| !b.is_ascii_whitespace() && *b != b'>') {
                    pos += 1;
                }
                &html[value_start..pos]
            }
        };
        attrs.push((name, Some(value)));
    }

    attrs
}
