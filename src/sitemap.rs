//! `sitemap.xml` generation from the course catalog.

use std::fmt::Write as _;
use std::path::Path;

use chrono::NaiveDate;
use quick_xml::escape::escape;
use tracing::{info, warn};

use crate::catalog::Catalog;
use crate::curriculum::Curriculum;
use crate::error::Result;
use crate::fs_utils::{is_regular_file, read_json, write_file};

/// How often a URL is expected to change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeFreq {
    Daily,
    Weekly,
    Monthly,
}

impl ChangeFreq {
    fn as_str(self) -> &'static str {
        match self {
            ChangeFreq::Daily => "daily",
            ChangeFreq::Weekly => "weekly",
            ChangeFreq::Monthly => "monthly",
        }
    }
}

/// One `<url>` element.
#[derive(Debug, Clone, PartialEq)]
pub struct SitemapUrl {
    /// Path below the base URL, starting with `/`.
    pub path: String,
    pub changefreq: ChangeFreq,
    pub priority: f32,
}

impl SitemapUrl {
    fn new(path: impl Into<String>, changefreq: ChangeFreq, priority: f32) -> Self {
        Self {
            path: path.into(),
            changefreq,
            priority,
        }
    }
}

/// Route of a lesson page: its file key without the `.html` extension.
#[must_use]
pub fn lesson_route(file: &str) -> String {
    format!("/tutorial/{}", file.strip_suffix(".html").unwrap_or(file))
}

/// Sitemap URLs for the site root, the dashboard, every course in `catalog`
/// and every lesson of the curricula found by `curriculum_for`.
pub fn collect_urls<F>(catalog: &Catalog, mut curriculum_for: F) -> Vec<SitemapUrl>
where
    F: FnMut(&str) -> Option<Curriculum>,
{
    let mut urls = vec![
        SitemapUrl::new("/", ChangeFreq::Daily, 1.0),
        SitemapUrl::new("/home", ChangeFreq::Daily, 0.9),
    ];
    for course in catalog.entries() {
        urls.push(SitemapUrl::new(format!("/course/{}", course.id), ChangeFreq::Weekly, 0.9));
        let Some(curriculum) = curriculum_for(&course.id) else {
            warn!(course = %course.id, "no curriculum for course; lessons not listed");
            continue;
        };
        let before = urls.len();
        urls.extend(
            curriculum
                .lessons()
                .filter(|lesson| !lesson.file.is_empty())
                .map(|lesson| SitemapUrl::new(lesson_route(&lesson.file), ChangeFreq::Monthly, 0.7)),
        );
        info!(course = %course.id, lessons = urls.len() - before, "listed course");
    }
    urls
}

/// Renders a `<urlset>` document for `base_url`.
#[must_use]
pub fn render(base_url: &str, urls: &[SitemapUrl], lastmod: NaiveDate) -> String {
    let base = base_url.trim_end_matches('/');
    let date = lastmod.format("%Y-%m-%d");

    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );
    for url in urls {
        let loc = format!("{base}{}", url.path);
        let loc = escape(loc.as_str());
        // Writing into a String cannot fail.
        let _ = write!(
            xml,
            "  <url>\n    <loc>{loc}</loc>\n    <lastmod>{date}</lastmod>\n    \
             <changefreq>{}</changefreq>\n    <priority>{:.1}</priority>\n  </url>\n",
            url.changefreq.as_str(),
            url.priority
        );
    }
    xml.push_str("</urlset>\n");
    xml
}

/// Builds the sitemap from `catalog`, reading curricula from `data_dir`,
/// and writes it to `out`. Returns the number of URLs.
pub fn write_sitemap(
    out: &Path,
    base_url: &str,
    catalog: &Catalog,
    data_dir: &Path,
    lastmod: NaiveDate,
) -> Result<usize> {
    let urls = collect_urls(catalog, |id| {
        let path = data_dir.join(format!("{id}.json"));
        if !is_regular_file(&path) {
            return None;
        }
        read_json(&path)
            .map_err(|err| warn!(error = %err, "unreadable curriculum"))
            .ok()
    });
    write_file(out, &render(base_url, &urls, lastmod))?;
    info!(path = %out.display(), urls = urls.len(), "wrote sitemap");
    Ok(urls.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogEntry, CourseMeta};
    use crate::curriculum::CurriculumSection;

    fn fixture() -> (Catalog, Curriculum) {
        let mut section = CurriculumSection::new("Tutorial");
        section.push("Intro", "go_intro.html");
        let curriculum: Curriculum = std::iter::once(section).collect();
        let mut catalog = Catalog::default();
        catalog.upsert(CatalogEntry::for_course("go", "Go", &CourseMeta::default(), &curriculum, "assets/data"));
        (catalog, curriculum)
    }

    #[test]
    fn urls_cover_home_courses_and_lessons() {
        let (catalog, curriculum) = fixture();
        let urls = collect_urls(&catalog, |_| Some(curriculum.clone()));
        let paths: Vec<_> = urls.iter().map(|u| u.path.as_str()).collect();
        assert_eq!(paths, vec!["/", "/home", "/course/go", "/tutorial/go_intro"]);
        assert_eq!(urls[3].changefreq, ChangeFreq::Monthly);
    }

    #[test]
    fn missing_curriculum_lists_course_only() {
        let (catalog, _) = fixture();
        assert_eq!(collect_urls(&catalog, |_| None).len(), 3);
    }

    #[test]
    fn render_format() {
        let urls = vec![SitemapUrl::new("/a?b&c", ChangeFreq::Weekly, 0.9)];
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap_or_default();
        let xml = render("https://example.com/", &urls, date);
        assert!(xml.contains("<loc>https://example.com/a?b&amp;c</loc>"));
        assert!(xml.contains("<lastmod>2024-05-01</lastmod>"));
        assert!(xml.contains("<priority>0.9</priority>"));
        assert!(xml.ends_with("</urlset>\n"));
    }

    #[test]
    fn render_escapes_markup_in_paths() {
        let urls = vec![SitemapUrl::new("/tutorial/a<b>\"c'", ChangeFreq::Monthly, 0.7)];
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap_or_default();
        let xml = render("https://example.com", &urls, date);
        assert!(xml.contains("<loc>https://example.com/tutorial/a&lt;b&gt;&quot;c&apos;</loc>"), "{xml}");
    }
}
