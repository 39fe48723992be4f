use proptest::prelude::*;
use rs_courseware::sanitize;

const LESSON_WITH_NOISE: &str = r#"
<div class="w3-clear nextprev"><a class="w3-left w3-btn" href="a.html">Previous</a></div>
<div id="midcontentadcontainer"><div>ad</div>
<h1>JavaScript <span class="color_h1">Arrays</span></h1>
<script>googletag.cmd.push(function() {});</script>
<div class="ws-learnhtml"><div class="inner"><a href="x">Learn</a></div></div>
<p>An array is a special variable.</p>
<div class="w3-example">
  <h3>Example</h3>
  <div class="w3-code">const cars = ["Saab", "Volvo"];</div>
  <a target="_blank" href="tryit.asp?filename=x" class="w3-btn w3-margin-bottom">Try it Yourself &raquo;</a>
</div>
<div id="getdiploma"><div><h2>Get Certified</h2></div></div>
<div class="containerlog"><div>log in</div></div>
<!-- Exercise -->
<div id="exercisecontainer"><form>quiz</form></div>
<h2>Track Your Progress</h2>
<p>Arrays hold many values.</p>
<div class="w3-panel" style="padding:8px;background-color:#282b35;color:white">Spaces promo</div>
<p>after the panel</p>
"#;

#[test]
fn strips_every_noise_kind_and_keeps_lesson() {
    let out = sanitize(LESSON_WITH_NOISE);

    assert!(out.contains("An array is a special variable."));
    assert!(out.contains("Arrays hold many values."));
    assert!(out.contains(r#"<div class="w3-code">"#));
    assert!(out.contains("<h1>JavaScript"));

    for noise in [
        "googletag",
        "ws-learnhtml",
        "Learn</a>",
        "Try it Yourself",
        "Get Certified",
        "log in",
        "Exercise",
        "quiz",
        "Track Your Progress",
        "Spaces promo",
        "after the panel",
        "nextprev",
        "midcontentadcontainer",
    ] {
        assert!(!out.contains(noise), "{noise:?} survived:\n{out}");
    }
    assert_eq!(out, out.trim());
}

#[test]
fn sanitize_is_idempotent_on_realistic_page() {
    let once = sanitize(LESSON_WITH_NOISE);
    assert_eq!(sanitize(&once), once);
}

#[test]
fn try_it_removal_does_not_swallow_neighbouring_links() {
    let html = r#"<a href="ref.html">Reference</a> and <a class="w3-btn" href="t.asp">Try it Yourself</a>"#;
    assert_eq!(sanitize(html), r#"<a href="ref.html">Reference</a> and"#);
}

fn token() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "<p>",
        "</p>",
        "text ",
        "<div>",
        "</div>",
        r#"<div class="ws-hide-on-logged-in">"#,
        r#"<div id="getdiploma">"#,
        r#"<div class="containerlog">"#,
        r#"<div class="w3-clear nextprev">"#,
        r#"<div id="exercisecontainer">"#,
        r#"<div id="mainLeaderboard">"#,
        r#"<div style="background-color:#282b35">"#,
        "<script>",
        "</script>",
        "<scr",
        "ipt>",
        "<!--",
        "-->",
        "<a href=\"t.asp\">",
        "Try it Yourself",
        "</a>",
        "<h2>Track Your Progress</h2>",
        "<h2>",
        "</h2>",
        " ",
        "\n",
    ])
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    #[test]
    fn sanitize_twice_equals_once(tokens in prop::collection::vec(token(), 0..40)) {
        let input: String = tokens.concat();
        let once = sanitize(&input);
        prop_assert_eq!(sanitize(&once), once);
    }

    #[test]
    fn sanitize_never_grows_input(tokens in prop::collection::vec(token(), 0..40)) {
        let input: String = tokens.concat();
        prop_assert!(sanitize(&input).len() <= input.len());
    }
}
