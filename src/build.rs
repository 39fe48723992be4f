//! Course build orchestration.
//!
//! Ties discovery, assembly, curriculum output and the catalog together for
//! the courses of a manifest. A failure is fatal for its course only.

use std::collections::BTreeMap;

use tracing::{error, info, warn};

use crate::assembler::{write_curriculum, Assembler};
use crate::assets::{AssetLayout, AssetResolver, AssetStats};
use crate::catalog::{Catalog, CatalogEntry};
use crate::crawler::{ChainCrawler, StopReason};
use crate::curriculum::Curriculum;
use crate::discovery::{directory_sections, menu_sections};
use crate::error::{Error, Result};
use crate::manifest::{CourseManifest, CourseSpec, Discovery};
use crate::options::Options;
use crate::page::PageProcessor;
use crate::title::TitleResolver;

/// Outcome of building one course.
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub course_id: String,
    pub curriculum: Curriculum,
    pub assets: AssetStats,
    /// Set for chain-discovered courses.
    pub crawl_stop: Option<StopReason>,
}

/// Outcome of building every course of a manifest.
#[derive(Debug, Default)]
pub struct BuildSummary {
    pub built: Vec<BuildReport>,
    pub failed: Vec<(String, Error)>,
}

/// Builds one course: discovers its pages, writes lesson bodies, images and
/// the curriculum index, then upserts the course into the catalog.
pub fn build_course(manifest: &CourseManifest, course: &CourseSpec, options: &Options) -> Result<BuildReport> {
    info!(course = %course.id, source = %course.source_dir.display(), "building course");

    let content_dir = manifest.content_dir();
    let layout = AssetLayout::new(&content_dir, &manifest.public_root, course.scope, &course.id);
    let resolver = AssetResolver::new(layout, manifest.shared_asset_dirs.clone(), options.collision_policy);
    let mut assembler = Assembler::new(
        PageProcessor::new(options.clone()),
        resolver,
        &course.source_dir,
        content_dir,
        course.dest_prefix(),
    );
    let curriculum_path = manifest.curriculum_path(&course.id);

    let mut crawl_stop = None;
    let curriculum = match &course.discovery {
        Discovery::Sections { sections } => assembler.assemble(sections),
        Discovery::Directory { section_title } => {
            let specs = directory_sections(
                &course.source_dir,
                &course.id,
                &course.title,
                section_title.as_deref(),
                options,
            )?;
            assembler.assemble(&specs)
        }
        Discovery::Menu { page } => {
            let specs = menu_sections(&course.source_dir, page)?;
            assembler.assemble(&specs)
        }
        Discovery::Chain { entry } => {
            let titles = TitleResolver::new(vec![course.dest_prefix()], BTreeMap::new());
            let outcome = ChainCrawler::new(&mut assembler)
                .with_titles(titles)
                .with_entry(entry.clone())
                .crawl_with(|partial| {
                    let checkpoint: Curriculum = std::iter::once(partial.clone()).collect();
                    write_curriculum(&curriculum_path, &checkpoint)
                })?;
            crawl_stop = Some(outcome.stop);
            std::iter::once(outcome.section).collect()
        }
    };

    write_curriculum(&curriculum_path, &curriculum)?;

    if curriculum.is_empty() {
        warn!(course = %course.id, "course produced no lessons; catalog left unchanged");
    } else {
        let catalog_path = manifest.catalog_path();
        let mut catalog = Catalog::load(&catalog_path)?;
        catalog.upsert(CatalogEntry::for_course(
            &course.id,
            &course.title,
            &course.meta,
            &curriculum,
            &manifest.data_prefix,
        ));
        catalog.save(&catalog_path)?;
    }

    info!(
        course = %course.id,
        sections = curriculum.sections().len(),
        lessons = curriculum.lesson_count(),
        "course built"
    );
    Ok(BuildReport {
        course_id: course.id.clone(),
        curriculum,
        assets: assembler.assets().stats(),
        crawl_stop,
    })
}

/// Builds every course of `manifest`, or only those in `only` when given.
/// Failed courses are logged and collected; the others still build.
pub fn build_all(manifest: &CourseManifest, options: &Options, only: &[String]) -> BuildSummary {
    let mut summary = BuildSummary::default();
    for course in &manifest.courses {
        if !only.is_empty() && !only.contains(&course.id) {
            continue;
        }
        match build_course(manifest, course, options) {
            Ok(report) => summary.built.push(report),
            Err(err) => {
                error!(course = %course.id, error = %err, "course failed");
                summary.failed.push((course.id.clone(), err));
            }
        }
    }
    summary
}
