use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use rs_courseware::catalog::Catalog;
use rs_courseware::{build_all, sitemap, CourseManifest, Curriculum, Options, StopReason};

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn lesson(title: &str, next: Option<&str>) -> String {
    let filler = "<p>Lesson text.</p>".repeat(40);
    let nav = next.map_or(String::new(), |n| {
        format!(r#"<div class="w3-clear nextprev"><a href="{n}">Next &#10095;</a></div>"#)
    });
    format!(r#"<html><body><div id="main"><h1>{title}</h1>{filler}{nav}</div></body></html>"#)
}

fn write(path: &Path, contents: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)
}

fn fixture_tree(root: &Path) -> std::io::Result<()> {
    write(&root.join("src/sql/default.html"), &lesson("SQL Home", None))?;
    write(&root.join("src/sql/sql_select.html"), &lesson("SQL SELECT", None))?;

    write(&root.join("src/go/index.html"), &lesson("Go Intro", Some("go_syntax.html")))?;
    write(&root.join("src/go/go_syntax.html"), &lesson("Go Syntax", Some("index.html")))?;

    write(&root.join("src/js/js_b.html"), &lesson("JS B", None))?;
    write(&root.join("src/js/default.html"), &lesson("JS Home", None))?;
    write(&root.join("src/js/js_exercise1.html"), &lesson("Exercise", None))?;

    write(
        &root.join("src/css/default.html"),
        r#"<div id="leftmenuinner"><h2>CSS Basics</h2><a href="css_intro.html">CSS Intro</a>
           <h2>Missing</h2><a href="css_gone.html">Gone</a></div>"#,
    )?;
    write(&root.join("src/css/css_intro.html"), &lesson("CSS Introduction", None))?;
    Ok(())
}

const MANIFEST: &str = r#"{
    "outputDir": "out",
    "courses": [
        { "id": "sql", "title": "SQL", "sourceDir": "src/sql",
          "discovery": { "type": "sections", "sections": [
              { "title": "SQL Tutorial", "files": ["default.html", "sql_select.html", "sql_missing.html"] },
              { "title": "SQL Ghosts", "files": ["nothing.html"] } ] } },
        { "id": "go", "title": "Go", "sourceDir": "src/go", "scope": "course",
          "discovery": { "type": "chain" } },
        { "id": "js", "title": "JavaScript", "sourceDir": "src/js",
          "discovery": { "type": "directory" } },
        { "id": "css", "title": "CSS", "sourceDir": "src/css",
          "discovery": { "type": "menu" } },
        { "id": "broken", "title": "Broken", "sourceDir": "src/none",
          "discovery": { "type": "chain" } }
    ]
}"#;

fn load(root: &Path) -> Result<CourseManifest, Box<dyn std::error::Error>> {
    let path = root.join("manifest.json");
    fs::write(&path, MANIFEST)?;
    Ok(CourseManifest::load(&path)?)
}

fn read_curriculum(path: &Path) -> Result<Curriculum, Box<dyn std::error::Error>> {
    Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
}

#[test]
fn builds_every_discovery_kind() -> TestResult {
    let tmp = tempfile::tempdir()?;
    fixture_tree(tmp.path())?;
    let manifest = load(tmp.path())?;

    let summary = build_all(&manifest, &Options::default(), &[]);
    assert_eq!(summary.built.len(), 4);
    assert_eq!(summary.failed.len(), 1);
    assert_eq!(summary.failed[0].0, "broken");

    let sql = read_curriculum(&manifest.curriculum_path("sql"))?;
    assert_eq!(sql.sections().len(), 1);
    let files: Vec<&str> = sql.lessons().map(|l| l.file.as_str()).collect();
    assert_eq!(files, vec!["sql_default.html", "sql_select.html"]);
    assert!(tmp.path().join("out/content/sql_select.html").is_file());

    let go = summary.built.iter().find(|r| r.course_id == "go").map(|r| r.crawl_stop.clone());
    assert_eq!(go, Some(Some(StopReason::Cycle { file: "index.html".to_string() })));
    let go = read_curriculum(&manifest.curriculum_path("go"))?;
    assert_eq!(go.sections()[0].title, "Tutorial");
    assert_eq!(go.lesson_count(), 2);

    let js = read_curriculum(&manifest.curriculum_path("js"))?;
    assert_eq!(js.sections()[0].title, "JavaScript Tutorial");
    let titles: Vec<&str> = js.lessons().map(|l| l.title.as_str()).collect();
    assert_eq!(titles, vec!["JS Home", "JS B"]);

    let css = read_curriculum(&manifest.curriculum_path("css"))?;
    assert_eq!(css.sections().len(), 1);
    assert_eq!(css.sections()[0].title, "CSS Basics");
    assert_eq!(css.lessons().next().map(|l| l.title.as_str()), Some("CSS Introduction"));

    let catalog = Catalog::load(&manifest.catalog_path())?;
    let ids: Vec<&str> = catalog.entries().iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["sql", "go", "js", "css"]);
    let sql_entry = catalog.get("sql").map(|e| (e.lesson_count, e.route.clone(), e.file.clone()));
    assert_eq!(
        sql_entry,
        Some((2, "/tutorial/sql_default.html".to_string(), "assets/data/sql.json".to_string()))
    );
    Ok(())
}

#[test]
fn rebuild_preserves_hand_edited_catalog_fields() -> TestResult {
    let tmp = tempfile::tempdir()?;
    fixture_tree(tmp.path())?;
    let manifest = load(tmp.path())?;
    let only = vec!["sql".to_string()];

    build_all(&manifest, &Options::default(), &only);
    let catalog_path = manifest.catalog_path();
    let edited = fs::read_to_string(&catalog_path)?.replacen(r#""id": "sql","#, r#""id": "sql", "featured": true,"#, 1);
    fs::write(&catalog_path, edited)?;

    build_all(&manifest, &Options::default(), &only);
    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&catalog_path)?)?;
    assert_eq!(json[0]["featured"], serde_json::Value::Bool(true));
    assert_eq!(json[0]["lessonCount"], 2);
    assert_eq!(json.as_array().map(Vec::len), Some(1));
    Ok(())
}

#[test]
fn sitemap_lists_courses_and_lessons() -> TestResult {
    let tmp = tempfile::tempdir()?;
    fixture_tree(tmp.path())?;
    let manifest = load(tmp.path())?;
    build_all(&manifest, &Options::default(), &["sql".to_string(), "js".to_string()]);

    let catalog = Catalog::load(&manifest.catalog_path())?;
    let out = tmp.path().join("sitemap.xml");
    let date = NaiveDate::from_ymd_opt(2025, 1, 31).ok_or("bad date")?;
    let count = sitemap::write_sitemap(&out, "https://learn.example/", &catalog, &manifest.data_dir(), date)?;

    // root + home + 2 courses + 2 sql lessons + 2 js lessons
    assert_eq!(count, 8);
    let xml = fs::read_to_string(&out)?;
    assert!(xml.contains("<loc>https://learn.example/course/js</loc>"));
    assert!(xml.contains("<loc>https://learn.example/tutorial/sql_select</loc>"));
    assert!(xml.contains("<lastmod>2025-01-31</lastmod>"));
    assert_eq!(xml.matches("<url>").count(), 8);
    Ok(())
}
