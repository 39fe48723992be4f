//! Optional DOM post-processing of sanitized lesson bodies.
//!
//! These passes reshape markup for the presentation layer: highlighted code
//! containers become `<pre><code>` blocks a client-side highlighter
//! understands, tables get a scroll wrapper, link targets are dropped.
//! They are off by default because they re-serialize the fragment.

use crate::dom::{self, Document};
use crate::options::Options;
use crate::patterns::{LINE_BREAK, MULTIPLE_NEWLINES, SOURCE_WHITESPACE};

/// Applies the post-processing passes enabled in `options`.
///
/// Returns `body` unchanged when no pass is enabled.
#[must_use]
pub fn postprocess(body: &str, options: &Options) -> String {
    if !options.wants_postprocessing() {
        return body.to_string();
    }

    let doc = dom::parse(body);
    if options.normalize_code_blocks {
        normalize_code_blocks(&doc);
    }
    if options.wrap_tables {
        wrap_tables(&doc);
    }
    if options.strip_link_targets {
        for a in doc.select("a[target]").iter() {
            a.remove_attr("target");
        }
    }
    dom::body_inner_html(&doc)
}

/// Language hint for a `.w3-code` container.
fn code_language(sel: &dom::Selection) -> &'static str {
    if dom::has_class_token(sel, "htmlHigh") {
        "html"
    } else if dom::has_class_token(sel, "cssHigh") {
        "css"
    } else {
        "javascript"
    }
}

/// Collapses source formatting so only `<br>` produces line breaks.
#[must_use]
pub fn code_text(inner_html: &str) -> String {
    let text = SOURCE_WHITESPACE.replace_all(inner_html, " ");
    let text = LINE_BREAK.replace_all(&text, "\n");
    let text = text.replace("&nbsp;", " ").replace('\u{a0}', " ");
    let text = MULTIPLE_NEWLINES.replace_all(&text, "\n");
    text.trim().to_string()
}

fn normalize_code_blocks(doc: &Document) {
    for block in doc.select(".w3-code").iter() {
        let lang = code_language(&block);
        let text = code_text(&block.inner_html());
        block.replace_with_html(format!(
            r#"<pre class="w3-code"><code class="language-{lang}">{text}</code></pre>"#
        ));
    }
}

fn wrap_tables(doc: &Document) {
    for table in doc.select("table").iter() {
        if dom::has_ancestor(&table, "table") {
            continue;
        }
        let html = table.html();
        table.replace_with_html(format!(r#"<div class="table-responsive-wrapper">{html}</div>"#));
    }
}
