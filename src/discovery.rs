//! Discovery of section specs without a declared file list.
//!
//! Two sources: a plain listing of the course directory, and the sidebar
//! menu of one of the course's pages. Both produce ordinary
//! [`SectionSpec`]s for the assembler.

use std::cmp::Ordering;
use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::fs_utils::read_page;
use crate::manifest::SectionSpec;
use crate::nav::parse_sidebar_menu;
use crate::options::Options;
use crate::url_utils::resolve_page_link;

/// Page that leads a directory listing when present.
const LEADING_PAGE: &str = "default.html";

/// `.html` files of `dir`, minus excluded names, `default.html` first and
/// the rest sorted, capped at `options.directory_limit`.
pub fn list_pages(dir: &Path, options: &Options) -> Result<Vec<String>> {
    let entries = fs::read_dir(dir).map_err(|err| Error::io(dir, err))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|err| Error::io(dir, err))?;
        if entry.file_type().map_err(|err| Error::io(entry.path(), err))?.is_dir() {
            continue;
        }
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        if !name.ends_with(".html") {
            continue;
        }
        if options.directory_exclude.iter().any(|ex| name.contains(ex.as_str())) {
            continue;
        }
        files.push(name);
    }

    files.sort_by(|a, b| match (a == LEADING_PAGE, b == LEADING_PAGE) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => a.cmp(b),
    });
    files.truncate(options.directory_limit);
    debug!(dir = %dir.display(), count = files.len(), "listed pages");
    Ok(files)
}

/// One section holding the directory listing of a course.
///
/// The section is titled `section_title`, or `"<course title> Tutorial"`,
/// and strips the `<course id>_` prefix in filename titles.
pub fn directory_sections(
    dir: &Path,
    course_id: &str,
    course_title: &str,
    section_title: Option<&str>,
    options: &Options,
) -> Result<Vec<SectionSpec>> {
    let files = list_pages(dir, options)?;
    let title = section_title.map_or_else(|| format!("{course_title} Tutorial"), str::to_string);
    Ok(vec![SectionSpec {
        title_prefixes: vec![format!("{course_id}_")],
        ..SectionSpec::new(title, files)
    }])
}

/// Sections read from the sidebar menu of `dir/page`.
///
/// Menu link targets are resolved relative to `page`; remote links are
/// dropped. Only the ordering comes from the menu; titles are resolved from
/// the pages themselves. A page without a sidebar yields no sections.
pub fn menu_sections(dir: &Path, page: &str) -> Result<Vec<SectionSpec>> {
    let raw = read_page(&dir.join(page))?;
    let Some(menu) = parse_sidebar_menu(&raw) else {
        warn!(page, "no sidebar menu found");
        return Ok(Vec::new());
    };

    let sections = menu
        .into_iter()
        .filter_map(|section| {
            let mut files: Vec<String> = Vec::new();
            for link in &section.links {
                let Some(file) = resolve_page_link(page, &link.file) else {
                    continue;
                };
                if !files.contains(&file) {
                    files.push(file);
                }
            }
            debug!(section = %section.title, pages = files.len(), "menu section");
            (!files.is_empty()).then(|| SectionSpec::new(section.title, files))
        })
        .collect();
    Ok(sections)
}
