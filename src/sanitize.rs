//! Noise removal for content fragments.
//!
//! Applies an ordered list of removals to a boundary-extracted fragment.
//! Structural containers that nest go through the balanced-tag remover;
//! everything else is plain pattern substitution. Later passes assume the
//! earlier ones already ran.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::patterns::{
    AD_CONTAINER, DARK_PANEL, EXERCISE_CONTAINER, HTML_COMMENT, NEXTPREV_BLOCK, SCRIPT_BLOCK,
    TRACK_PROGRESS_HEADING, TRY_IT_LINK,
};
use crate::tag_remover::{strip_element, ElementSelector};

/// Distracting containers removed with balanced-tag matching, with the
/// number of attempts each gets (some pages carry a duplicate instance).
static BALANCED_REMOVALS: LazyLock<Vec<(ElementSelector, usize)>> = LazyLock::new(|| {
    vec![
        (ElementSelector::class("div", "ws-learnhtml"), 1),
        (ElementSelector::class("div", "ws-hide-on-logged-in"), 2),
        (ElementSelector::id("div", "getdiploma"), 1),
        (ElementSelector::class("div", "containerlog"), 1),
    ]
});

/// Removes ads, scripts, call-to-action widgets, navigation remnants and
/// comments from `fragment`, then trims surrounding whitespace.
///
/// The pass list is repeated until the output stops changing. Every pass
/// only deletes text, so this terminates, and `sanitize(sanitize(x))` is
/// always equal to `sanitize(x)`.
#[must_use]
pub fn sanitize(fragment: &str) -> String {
    let mut current = run_passes(fragment);
    let mut rounds = 1;
    loop {
        let next = run_passes(&current);
        if next == current {
            break;
        }
        current = next;
        rounds += 1;
    }
    debug!(
        input_len = fragment.len(),
        output_len = current.len(),
        rounds,
        "sanitized fragment"
    );
    current
}

/// One application of every pass, in order.
fn run_passes(fragment: &str) -> String {
    // 1. Ad containers (do not nest).
    let mut html = replace(&AD_CONTAINER, fragment);

    // 2. Scripts.
    html = replace(&SCRIPT_BLOCK, &html);

    // 3. Login banners, diploma prompts, paywalls.
    for (selector, attempts) in BALANCED_REMOVALS.iter() {
        for _ in 0..*attempts {
            html = strip_element(&html, selector);
        }
    }

    // 4. Navigation remnants and "Try it Yourself" links.
    html = replace(&NEXTPREV_BLOCK, &html);
    html = replace(&TRY_IT_LINK, &html);

    // 5. Exercise widgets.
    html = replace(&EXERCISE_CONTAINER, &html);
    html = replace(&TRACK_PROGRESS_HEADING, &html);

    // 6. Dark trailing panel: everything after it is footer material.
    html = replace(&DARK_PANEL, &html);

    // 7. Comments.
    html = replace(&HTML_COMMENT, &html);

    html.trim().to_string()
}

fn replace(re: &Regex, html: &str) -> String {
    re.replace_all(html, "").into_owned()
}
