//! Course manifest: which courses to build and how to discover their pages.
//!
//! A manifest is a JSON document (camelCase keys):
//!
//! ```json
//! {
//!   "outputDir": "src/assets",
//!   "courses": [
//!     {
//!       "id": "sql",
//!       "title": "SQL",
//!       "sourceDir": "w3schools/sql",
//!       "discovery": {
//!         "type": "sections",
//!         "sections": [{ "title": "SQL Tutorial", "files": ["sql_intro.html"] }]
//!       }
//!     }
//!   ]
//! }
//! ```
//!
//! Relative paths are resolved against the manifest's own directory.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::assets::AssetScope;
use crate::catalog::CourseMeta;
use crate::error::{Error, Result};
use crate::fs_utils::read_json;

fn default_output_dir() -> PathBuf {
    PathBuf::from("assets")
}

fn default_public_root() -> String {
    "assets/content".to_string()
}

fn default_data_prefix() -> String {
    "assets/data".to_string()
}

fn default_menu_page() -> String {
    "default.html".to_string()
}

/// Top-level manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseManifest {
    /// Root of all outputs: `content/`, `data/`, `courses.json`.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Published prefix of the content directory.
    #[serde(default = "default_public_root")]
    pub public_root: String,
    /// Published prefix of the curriculum directory, used in the catalog.
    #[serde(default = "default_data_prefix")]
    pub data_prefix: String,
    /// Image directories probed for every course after the page-local ones.
    #[serde(default)]
    pub shared_asset_dirs: Vec<PathBuf>,
    pub courses: Vec<CourseSpec>,
}

/// One course to build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseSpec {
    pub id: String,
    pub title: String,
    pub source_dir: PathBuf,
    #[serde(default)]
    pub scope: AssetScope,
    pub discovery: Discovery,
    #[serde(flatten)]
    pub meta: CourseMeta,
}

/// How a course's lesson ordering is obtained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Discovery {
    /// Explicitly declared sections.
    Sections { sections: Vec<SectionSpec> },
    /// Every page in the source directory, one section.
    #[serde(rename_all = "camelCase")]
    Directory {
        #[serde(default)]
        section_title: Option<String>,
    },
    /// Sections read from the sidebar menu of `page`.
    Menu {
        #[serde(default = "default_menu_page")]
        page: String,
    },
    /// Follow "Next" links from the entry page.
    Chain {
        #[serde(default)]
        entry: Option<String>,
    },
}

/// A declared section: title plus ordered source files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionSpec {
    pub title: String,
    /// Overrides the course source directory for this section's files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_dir: Option<PathBuf>,
    pub files: Vec<String>,
    /// Prefix of destination file keys. Defaults to `<courseId>_`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dest_prefix: Option<String>,
    /// Filename prefixes stripped by the title fallback.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub title_prefixes: Vec<String>,
    /// Curated titles keyed by source filename.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub titles: BTreeMap<String, String>,
}

impl SectionSpec {
    #[must_use]
    pub fn new(title: impl Into<String>, files: Vec<String>) -> Self {
        Self {
            title: title.into(),
            files,
            ..Self::default()
        }
    }
}

impl CourseManifest {
    /// Loads, validates and resolves relative paths of a manifest file.
    pub fn load(path: &Path) -> Result<Self> {
        let mut manifest: Self = read_json(path)?;
        manifest.validate()?;
        if let Some(base) = path.parent() {
            manifest.resolve_paths(base);
        }
        Ok(manifest)
    }

    /// Checks ids and section declarations.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for course in &self.courses {
            if course.id.is_empty()
                || !course
                    .id
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
            {
                return Err(Error::Manifest(format!("invalid course id {:?}", course.id)));
            }
            if !seen.insert(course.id.as_str()) {
                return Err(Error::Manifest(format!("duplicate course id {:?}", course.id)));
            }
            if let Discovery::Sections { sections } = &course.discovery {
                if sections.is_empty() {
                    return Err(Error::Manifest(format!(
                        "course {:?} declares no sections",
                        course.id
                    )));
                }
            }
        }
        Ok(())
    }

    /// Makes every relative path absolute against `base`.
    pub fn resolve_paths(&mut self, base: &Path) {
        let join = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        join(&mut self.output_dir);
        self.shared_asset_dirs.iter_mut().for_each(join);
        for course in &mut self.courses {
            join(&mut course.source_dir);
            if let Discovery::Sections { sections } = &mut course.discovery {
                for dir in sections.iter_mut().filter_map(|s| s.source_dir.as_mut()) {
                    join(dir);
                }
            }
        }
    }

    #[must_use]
    pub fn course(&self, id: &str) -> Option<&CourseSpec> {
        self.courses.iter().find(|c| c.id == id)
    }

    /// Directory receiving sanitized lesson bodies and images.
    #[must_use]
    pub fn content_dir(&self) -> PathBuf {
        self.output_dir.join("content")
    }

    /// Directory receiving curriculum indexes.
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.output_dir.join("data")
    }

    #[must_use]
    pub fn catalog_path(&self) -> PathBuf {
        self.output_dir.join("courses.json")
    }

    /// Curriculum index path for `course_id`.
    #[must_use]
    pub fn curriculum_path(&self, course_id: &str) -> PathBuf {
        self.data_dir().join(format!("{course_id}.json"))
    }
}

impl CourseSpec {
    /// Default destination prefix for this course's lesson files.
    #[must_use]
    pub fn dest_prefix(&self) -> String {
        format!("{}_", self.id)
    }
}
