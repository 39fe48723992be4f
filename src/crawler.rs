//! Sequential chain crawler.
//!
//! Discovers a course's lesson order by following "Next" links from an
//! entry page. The crawl is an explicit state machine:
//!
//! ```text
//! Processing(file) --page ok, next link--> Following(next) --> Processing(next)
//!        |                  \--no next link--> Done(NoNextLink)
//!        |--visited before--> Done(Cycle)
//!        |--ceiling reached--> Done(Ceiling)
//!        \--page failed-----> Done(PageFailed)
//! ```
//!
//! Next links are taken from the page's navigation metadata, which is read
//! from the raw markup before sanitization removes the navigation bar.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::assembler::Assembler;
use crate::curriculum::CurriculumSection;
use crate::error::{Error, Result};
use crate::fs_utils::is_regular_file;
use crate::title::TitleResolver;
use crate::url_utils::resolve_page_link;

/// Why a crawl ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// The last page has no usable "Next" link.
    NoNextLink,
    /// The next link points at a page already visited.
    Cycle { file: String },
    /// The page ceiling was reached.
    Ceiling,
    /// Processing a page failed; the crawl ends without retrying.
    PageFailed { file: String, error: String },
}

/// Crawler state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrawlState {
    Processing(String),
    Following(String),
    Done(StopReason),
}

/// Result of a finished crawl.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlOutcome {
    /// Lessons in traversal order. May be empty.
    pub section: CurriculumSection,
    pub stop: StopReason,
}

/// First existing entry page among `names` in `source_dir`.
pub fn find_entry(source_dir: &Path, names: &[String]) -> Result<String> {
    names
        .iter()
        .find(|name| is_regular_file(&source_dir.join(name)))
        .cloned()
        .ok_or_else(|| Error::MissingEntryPoint(source_dir.to_path_buf()))
}

/// Walks the "Next" chain of one course through an [`Assembler`].
pub struct ChainCrawler<'a> {
    assembler: &'a mut Assembler,
    titles: TitleResolver,
    entry: Option<String>,
    section_title: String,
    ceiling: usize,
    entry_names: Vec<String>,
}

impl<'a> ChainCrawler<'a> {
    /// Crawler using the assembler's options for ceiling, entry names and
    /// section title.
    #[must_use]
    pub fn new(assembler: &'a mut Assembler) -> Self {
        let options = assembler.processor().options();
        let section_title = options.crawl_section_title.clone();
        let ceiling = options.crawl_ceiling;
        let entry_names = options.crawl_entry_names.clone();
        Self {
            assembler,
            titles: TitleResolver::default(),
            entry: None,
            section_title,
            ceiling,
            entry_names,
        }
    }

    /// Title resolver applied to every crawled page.
    #[must_use]
    pub fn with_titles(mut self, titles: TitleResolver) -> Self {
        self.titles = titles;
        self
    }

    /// Starts at `entry` instead of the conventional entry names.
    #[must_use]
    pub fn with_entry(mut self, entry: Option<String>) -> Self {
        self.entry = entry;
        self
    }

    #[must_use]
    pub fn with_section_title(mut self, title: impl Into<String>) -> Self {
        self.section_title = title.into();
        self
    }

    fn entry_point(&self) -> Result<String> {
        let source_dir = self.assembler.source_dir();
        match &self.entry {
            Some(entry) if is_regular_file(&source_dir.join(entry)) => Ok(entry.clone()),
            Some(_) => Err(Error::MissingEntryPoint(PathBuf::from(source_dir))),
            None => find_entry(source_dir, &self.entry_names),
        }
    }

    /// Crawls the chain. Fails only when no entry point exists.
    pub fn crawl(&mut self) -> Result<CrawlOutcome> {
        self.crawl_with(|_| Ok(()))
    }

    /// Crawls the chain, calling `on_page` with the partial section after
    /// each processed page so progress can be persisted incrementally.
    pub fn crawl_with<F>(&mut self, mut on_page: F) -> Result<CrawlOutcome>
    where
        F: FnMut(&CurriculumSection) -> Result<()>,
    {
        let entry = self.entry_point()?;
        info!(entry = %entry, ceiling = self.ceiling, "starting crawl");

        let mut section = CurriculumSection::new(self.section_title.clone());
        let mut visited: HashSet<String> = HashSet::new();
        let mut state = CrawlState::Processing(entry);

        let stop = loop {
            state = match state {
                CrawlState::Processing(file) => {
                    if visited.contains(&file) {
                        CrawlState::Done(StopReason::Cycle { file })
                    } else if visited.len() >= self.ceiling {
                        CrawlState::Done(StopReason::Ceiling)
                    } else {
                        visited.insert(file.clone());
                        self.step(&file, &mut section, &mut on_page)?
                    }
                }
                CrawlState::Following(next) => {
                    debug!(next = %next, "following next link");
                    CrawlState::Processing(next)
                }
                CrawlState::Done(reason) => break reason,
            };
        };

        match &stop {
            StopReason::NoNextLink => info!(pages = section.len(), "crawl finished"),
            StopReason::Cycle { file } => warn!(pages = section.len(), file = %file, "crawl stopped at cycle"),
            StopReason::Ceiling => warn!(pages = section.len(), "crawl stopped at page ceiling"),
            StopReason::PageFailed { file, error } => {
                warn!(pages = section.len(), file = %file, error = %error, "crawl stopped at failed page");
            }
        }
        Ok(CrawlOutcome { section, stop })
    }

    /// Processes `file` and decides the next state.
    fn step<F>(&mut self, file: &str, section: &mut CurriculumSection, on_page: &mut F) -> Result<CrawlState>
    where
        F: FnMut(&CurriculumSection) -> Result<()>,
    {
        let (item, page) = match self.assembler.process_course_page(file, &self.titles) {
            Ok(done) => done,
            Err(err) => {
                return Ok(CrawlState::Done(StopReason::PageFailed {
                    file: file.to_string(),
                    error: err.to_string(),
                }));
            }
        };
        section.items.push(item);
        on_page(section)?;

        let next = page.next.as_deref().and_then(|href| resolve_page_link(file, href));
        Ok(match next {
            Some(next) => CrawlState::Following(next),
            None => CrawlState::Done(StopReason::NoNextLink),
        })
    }
}
