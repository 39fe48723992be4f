use std::fs;
use std::path::Path;

use rs_courseware::{AssetLayout, AssetResolver, AssetScope, CollisionPolicy};

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn write(path: &Path, contents: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)
}

#[test]
fn reference_resolved_through_shared_images_dir() -> TestResult {
    let tmp = tempfile::tempdir()?;
    let source = tmp.path().join("source");
    let page_dir = source.join("sql");
    let shared = source.join("images");
    write(&shared.join("img_x.jpg"), "jpeg")?;
    fs::create_dir_all(&page_dir)?;

    let content = tmp.path().join("out/content");
    let layout = AssetLayout::new(&content, "assets/content", AssetScope::Shared, "sql");
    let mut resolver = AssetResolver::new(layout, vec![shared], CollisionPolicy::Overwrite);

    let out = resolver.rewrite(r#"<img src="img_x.jpg" alt="x">"#, &page_dir);
    assert_eq!(out, r#"<img src="assets/content/images/img_x.jpg" alt="x">"#);
    assert_eq!(fs::read_to_string(content.join("images/img_x.jpg"))?, "jpeg");
    assert_eq!(resolver.stats().rewritten, 1);
    Ok(())
}

#[test]
fn page_relative_reference_wins_over_shared() -> TestResult {
    let tmp = tempfile::tempdir()?;
    let page_dir = tmp.path().join("html");
    write(&page_dir.join("pics/logo.png"), "local")?;
    write(&tmp.path().join("shared/logo.png"), "shared")?;

    let content = tmp.path().join("content");
    let layout = AssetLayout::new(&content, "assets/content", AssetScope::Shared, "html");
    let mut resolver = AssetResolver::new(layout, vec![tmp.path().join("shared")], CollisionPolicy::Overwrite);

    let out = resolver.rewrite("<img src='pics/logo.png'>", &page_dir);
    assert_eq!(out, "<img src='assets/content/images/logo.png'>");
    assert_eq!(fs::read_to_string(content.join("images/logo.png"))?, "local");
    Ok(())
}

#[test]
fn srcset_candidates_are_rewritten_individually() -> TestResult {
    let tmp = tempfile::tempdir()?;
    let page_dir = tmp.path().join("css");
    write(&page_dir.join("images/a.jpg"), "a")?;

    let layout = AssetLayout::new(&tmp.path().join("content"), "assets/content", AssetScope::Course, "css");
    let mut resolver = AssetResolver::new(layout, Vec::new(), CollisionPolicy::Overwrite);

    let out = resolver.rewrite(
        r#"<img srcset="a.jpg 1x, https://cdn.example/b.jpg 2x" src="a.jpg">"#,
        &page_dir,
    );
    assert_eq!(
        out,
        r#"<img srcset="assets/content/css/images/a.jpg 1x, https://cdn.example/b.jpg 2x" src="assets/content/css/images/a.jpg">"#
    );
    assert!(tmp.path().join("content/css/images/a.jpg").is_file());
    Ok(())
}

#[test]
fn missing_image_leaves_reference_untouched() -> TestResult {
    let tmp = tempfile::tempdir()?;
    let layout = AssetLayout::new(&tmp.path().join("content"), "assets/content", AssetScope::Shared, "x");
    let mut resolver = AssetResolver::new(layout, Vec::new(), CollisionPolicy::Overwrite);

    let html = r#"<img src="nowhere.gif">"#;
    assert_eq!(resolver.rewrite(html, tmp.path()), html);
    assert_eq!(resolver.stats().unresolved, 1);
    assert!(!tmp.path().join("content/images").exists());
    Ok(())
}

fn collide(policy: CollisionPolicy) -> Result<(String, usize), Box<dyn std::error::Error>> {
    let tmp = tempfile::tempdir()?;
    write(&tmp.path().join("one/pic.png"), "first")?;
    write(&tmp.path().join("two/pic.png"), "second")?;

    let content = tmp.path().join("content");
    let layout = AssetLayout::new(&content, "assets/content", AssetScope::Shared, "c");
    let mut resolver = AssetResolver::new(layout, Vec::new(), policy);
    resolver.rewrite(r#"<img src="pic.png">"#, &tmp.path().join("one"));
    resolver.rewrite(r#"<img src="pic.png">"#, &tmp.path().join("two"));
    // Only counts as a collision while the name is held by the other file.
    resolver.rewrite(r#"<img src="pic.png">"#, &tmp.path().join("two"));

    Ok((fs::read_to_string(content.join("images/pic.png"))?, resolver.stats().collisions))
}

#[test]
fn collision_policy_overwrite_keeps_last() -> TestResult {
    assert_eq!(collide(CollisionPolicy::Overwrite)?, ("second".to_string(), 1));
    Ok(())
}

#[test]
fn collision_policy_keep_first() -> TestResult {
    assert_eq!(collide(CollisionPolicy::KeepFirst)?, ("first".to_string(), 2));
    Ok(())
}
