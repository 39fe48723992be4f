//! Course catalog (`courses.json`).
//!
//! The catalog lists every built course for the presentation layer. Entries
//! are upserted by id after a course is built; fields this crate does not
//! know about are carried through untouched.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

use crate::curriculum::Curriculum;
use crate::error::Result;
use crate::fs_utils::{is_regular_file, read_json, write_json};

const DEFAULT_ICON: &str = "code-slash-outline";
const DEFAULT_COLOR: &str = "#555555";
const DEFAULT_LEVEL: &str = "Beginner";
const DEFAULT_DURATION: &str = "10h";

/// Optional presentation metadata for a course, as declared in a manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
}

/// One course in `courses.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub color: String,
    /// Path of the curriculum index, as the presentation layer loads it.
    #[serde(default)]
    pub file: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub lesson_count: usize,
    /// Route of the first lesson.
    #[serde(default)]
    pub route: String,
    /// Fields not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CatalogEntry {
    /// Entry for a freshly built course. `data_prefix` is the published
    /// directory of curriculum files (normally `assets/data`).
    #[must_use]
    pub fn for_course(
        id: &str,
        title: &str,
        meta: &CourseMeta,
        curriculum: &Curriculum,
        data_prefix: &str,
    ) -> Self {
        let first = curriculum.lessons().next().map_or("", |l| l.file.as_str());
        Self {
            id: id.to_string(),
            title: title.to_string(),
            icon: meta.icon.clone().unwrap_or_else(|| DEFAULT_ICON.to_string()),
            color: meta.color.clone().unwrap_or_else(|| DEFAULT_COLOR.to_string()),
            file: format!("{}/{id}.json", data_prefix.trim_end_matches('/')),
            description: meta
                .description
                .clone()
                .unwrap_or_else(|| format!("Learn {title}.")),
            level: meta.level.clone().unwrap_or_else(|| DEFAULT_LEVEL.to_string()),
            duration: meta
                .duration
                .clone()
                .unwrap_or_else(|| DEFAULT_DURATION.to_string()),
            lesson_count: curriculum.lesson_count(),
            route: format!("/tutorial/{first}"),
            extra: Map::new(),
        }
    }
}

/// The whole catalog, in file order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Loads `path`, or returns an empty catalog when it does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !is_regular_file(path) {
            return Ok(Self::default());
        }
        read_json(path)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        write_json(path, self)
    }

    #[must_use]
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Inserts `entry` or merges it over the existing entry with the same id.
    ///
    /// Known fields take the new values; unknown fields of the existing
    /// entry are preserved unless `entry` carries the same key. Returns
    /// `true` when the entry is new.
    pub fn upsert(&mut self, entry: CatalogEntry) -> bool {
        match self.entries.iter_mut().find(|e| e.id == entry.id) {
            Some(existing) => {
                let mut extra = std::mem::take(&mut existing.extra);
                extra.extend(entry.extra.clone());
                *existing = CatalogEntry { extra, ..entry };
                info!(course = %existing.id, "updated catalog entry");
                false
            }
            None => {
                info!(course = %entry.id, "added catalog entry");
                self.entries.push(entry);
                true
            }
        }
    }
}
