//! # rs-courseware
//!
//! Turns a tree of static tutorial pages into per-course curricula.
//!
//! Each page is cut down to its instructional content, stripped of site
//! furniture (ads, scripts, call-to-action widgets, navigation bars), its
//! images are copied into one asset store with references rewritten, and a
//! title is resolved. The processed pages are grouped into an ordered
//! curriculum index that a presentation layer can render.
//!
//! ## Quick Start
//!
//! ```rust
//! use rs_courseware::{extract_fragment, sanitize};
//!
//! let html = r#"<html><body><div id="main"><h1>Intro</h1>
//! <script>track()</script><p>Hello</p></div><footer>(c)</footer></body></html>"#;
//!
//! let body = sanitize(extract_fragment(html));
//! assert!(body.contains("<p>Hello</p>"));
//! assert!(!body.contains("track()"));
//! assert!(!body.contains("(c)"));
//! ```
//!
//! ## Features
//!
//! - **Balanced-tag removal**: deletes whole nested elements without a DOM
//! - **Boundary detection**: isolates the main content region of a page
//! - **Sanitization**: idempotent ordered noise-removal passes
//! - **Asset relocation**: resolves, copies and rewrites image references
//! - **Curriculum discovery**: declared sections, directory listings,
//!   sidebar menus, or "Next" link chains

mod error;
mod options;
mod patterns;

/// DOM operations adapter over `dom_query`.
pub mod dom;

/// Balanced-tag element removal over raw markup.
pub mod tag_remover;

/// Main-content boundary detection.
pub mod boundary;

/// Ordered noise-removal passes.
pub mod sanitize;

/// Image reference resolution, copying and rewriting.
pub mod assets;

/// Lesson title resolution.
pub mod title;

/// Navigation metadata read from unsanitized pages.
pub mod nav;

/// Optional DOM post-processing of lesson bodies.
pub mod postprocess;

/// The per-page pipeline.
pub mod page;

/// Curriculum data model.
pub mod curriculum;

/// Course manifest.
pub mod manifest;

/// Section/curriculum assembly.
pub mod assembler;

/// "Next" link chain crawler.
pub mod crawler;

/// Directory-listing and sidebar-menu discovery.
pub mod discovery;

/// Course catalog upsert.
pub mod catalog;

/// Sitemap generation.
pub mod sitemap;

/// Course build orchestration.
pub mod build;

/// Filesystem helpers.
pub mod fs_utils;

/// URL and reference utilities.
pub mod url_utils;

// Public API - re-exports
pub use assembler::{destination_name, Assembler};
pub use assets::{AssetLayout, AssetResolver, AssetScope, CollisionPolicy};
pub use boundary::{extract_fragment, find_content_bounds, BoundaryDetector, ContentBounds};
pub use build::{build_all, build_course, BuildReport, BuildSummary};
pub use crawler::{ChainCrawler, CrawlOutcome, CrawlState, StopReason};
pub use curriculum::{Curriculum, CurriculumSection, LessonItem};
pub use error::{Error, Result};
pub use manifest::{CourseManifest, CourseSpec, Discovery, SectionSpec};
pub use options::Options;
pub use page::{PageProcessor, ProcessedPage};
pub use sanitize::sanitize;
pub use tag_remover::{remove_element, strip_element, ElementSelector, Removal};
pub use title::TitleResolver;
