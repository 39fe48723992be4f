//! Section/curriculum assembly.
//!
//! Runs the page pipeline over each declared `(section, files)` group in
//! order, writes every processed body to the content directory, and keeps
//! `{title, file}` entries for the pages that succeeded. Per-page failures
//! are logged and skipped; sections that end up empty are dropped. A lesson
//! key is written from one source page only: a second page mapping to the
//! same key is rejected.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::assets::AssetResolver;
use crate::curriculum::{Curriculum, CurriculumSection, LessonItem};
use crate::error::{Error, Result};
use crate::fs_utils::{write_file, write_json};
use crate::manifest::SectionSpec;
use crate::page::{PageProcessor, ProcessedPage};
use crate::title::TitleResolver;

/// Destination file key for `file` under `prefix`.
///
/// Path separators are flattened so every lesson lands directly in the
/// content directory, and the prefix is not applied twice.
#[must_use]
pub fn destination_name(prefix: &str, file: &str) -> String {
    let flat = file.trim_start_matches("./").replace(['/', '\\'], "_");
    if flat.starts_with(prefix) {
        flat
    } else {
        format!("{prefix}{flat}")
    }
}

/// Per-course assembly state: page processor, asset resolver and output
/// locations.
#[derive(Debug)]
pub struct Assembler {
    processor: PageProcessor,
    assets: AssetResolver,
    source_dir: PathBuf,
    content_dir: PathBuf,
    dest_prefix: String,
    /// Lesson key to the source page it was written from.
    written: HashMap<String, PathBuf>,
}

impl Assembler {
    /// `source_dir` is the course's page directory, `content_dir` receives
    /// the sanitized bodies, `dest_prefix` is the default key prefix.
    #[must_use]
    pub fn new(
        processor: PageProcessor,
        assets: AssetResolver,
        source_dir: impl Into<PathBuf>,
        content_dir: impl Into<PathBuf>,
        dest_prefix: impl Into<String>,
    ) -> Self {
        Self {
            processor,
            assets,
            source_dir: source_dir.into(),
            content_dir: content_dir.into(),
            dest_prefix: dest_prefix.into(),
            written: HashMap::new(),
        }
    }

    #[must_use]
    pub fn processor(&self) -> &PageProcessor {
        &self.processor
    }

    #[must_use]
    pub fn assets(&self) -> &AssetResolver {
        &self.assets
    }

    #[must_use]
    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    #[must_use]
    pub fn content_dir(&self) -> &Path {
        &self.content_dir
    }

    /// Processes one page and writes its body.
    ///
    /// Returns the lesson entry plus the processed page (for its next link).
    pub fn process_lesson(
        &mut self,
        source_dir: &Path,
        file: &str,
        dest_prefix: &str,
        titles: &TitleResolver,
    ) -> Result<(LessonItem, ProcessedPage)> {
        let dest = destination_name(dest_prefix, file);
        let source = source_dir.join(file);
        if let Some(first) = self.written.get(&dest) {
            if *first != source {
                return Err(Error::DuplicateLesson {
                    key: dest,
                    first: first.clone(),
                });
            }
        }

        let page = self
            .processor
            .process_file(source_dir, file, &mut self.assets, titles)?;
        write_file(&self.content_dir.join(&dest), &page.body)?;
        self.written.insert(dest.clone(), source);
        info!(source = file, dest = %dest, title = %page.title, "wrote lesson");

        let item = LessonItem {
            title: page.title.clone(),
            file: dest,
        };
        Ok((item, page))
    }

    /// Processes a page with the course defaults.
    pub fn process_course_page(
        &mut self,
        file: &str,
        titles: &TitleResolver,
    ) -> Result<(LessonItem, ProcessedPage)> {
        let source_dir = self.source_dir.clone();
        let prefix = self.dest_prefix.clone();
        self.process_lesson(&source_dir, file, &prefix, titles)
    }

    /// Builds one section. Failed pages are logged and left out.
    pub fn assemble_section(&mut self, spec: &SectionSpec) -> CurriculumSection {
        let source_dir = spec.source_dir.clone().unwrap_or_else(|| self.source_dir.clone());
        let prefix = spec.dest_prefix.clone().unwrap_or_else(|| self.dest_prefix.clone());
        let titles = TitleResolver::new(self.title_prefixes(spec), spec.titles.clone());

        let mut section = CurriculumSection::new(spec.title.clone());
        for file in &spec.files {
            match self.process_lesson(&source_dir, file, &prefix, &titles) {
                Ok((item, _)) => section.items.push(item),
                Err(Error::MissingSource(path)) => {
                    warn!(section = %spec.title, path = %path.display(), "source page missing; skipped");
                }
                Err(err) => {
                    warn!(section = %spec.title, file = %file, error = %err, "page failed; skipped");
                }
            }
        }
        section
    }

    /// Declared prefixes of `spec`, then the course prefix unless declared.
    fn title_prefixes(&self, spec: &SectionSpec) -> Vec<String> {
        let mut prefixes = spec.title_prefixes.clone();
        if !self.dest_prefix.is_empty() && !prefixes.contains(&self.dest_prefix) {
            prefixes.push(self.dest_prefix.clone());
        }
        prefixes
    }

    /// Builds the curriculum for `specs`, in declared order, dropping
    /// sections without any processed page.
    pub fn assemble(&mut self, specs: &[SectionSpec]) -> Curriculum {
        let mut curriculum = Curriculum::new();
        for spec in specs {
            let section = self.assemble_section(spec);
            let lessons = section.len();
            if curriculum.push(section) {
                info!(section = %spec.title, lessons, "assembled section");
            } else {
                warn!(section = %spec.title, "section has no lessons; dropped");
            }
        }
        let stats = self.assets.stats();
        info!(
            sections = curriculum.sections().len(),
            lessons = curriculum.lesson_count(),
            images = stats.rewritten,
            unresolved_images = stats.unresolved,
            "assembled curriculum"
        );
        curriculum
    }
}

/// Writes the curriculum index as pretty JSON.
pub fn write_curriculum(path: &Path, curriculum: &Curriculum) -> Result<()> {
    write_json(path, curriculum)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn destination_prefixing() {
        assert_eq!(destination_name("sql_", "sql_intro.html"), "sql_intro.html");
        assert_eq!(destination_name("sql_", "default.html"), "sql_default.html");
        assert_eq!(destination_name("go_", "sub/a.html"), "go_sub_a.html");
        assert_eq!(destination_name("", "a.html"), "a.html");
    }
}
