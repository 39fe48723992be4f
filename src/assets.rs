//! Image asset resolution and reference rewriting.
//!
//! Every local image reference in a sanitized fragment is resolved against
//! a prioritized list of candidate files. The first hit is copied into the
//! unified asset directory under its basename and the reference is rewritten
//! to the published path `<public root>/images/<basename>`. References that
//! resolve nowhere are left untouched.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use regex::Captures;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::fs_utils::{copy_file, is_regular_file};
use crate::patterns::{IMAGE_REFERENCE, WHITESPACE};
use crate::url_utils::{extract_filename, is_remote_reference, strip_query_and_fragment};

/// Where a course's content and images are published.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetScope {
    /// One flat namespace for every course: `assets/content/images/<name>`.
    #[default]
    Shared,
    /// Namespaced per course: `assets/content/<courseId>/images/<name>`.
    Course,
}

/// What happens when two different source images share a basename.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CollisionPolicy {
    /// The later image replaces the earlier copy.
    #[default]
    Overwrite,
    /// The first copy is kept; later references still point at it.
    KeepFirst,
}

/// Destination of copied images and the URL prefix that publishes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetLayout {
    /// On-disk directory receiving image copies.
    pub images_dir: PathBuf,
    /// Published prefix; rewritten references are `<prefix>/<basename>`.
    pub public_prefix: String,
}

impl AssetLayout {
    /// Layout for `course_id` under `content_dir`, published under `public_root`
    /// (normally `assets/content`).
    #[must_use]
    pub fn new(content_dir: &Path, public_root: &str, scope: AssetScope, course_id: &str) -> Self {
        let public_root = public_root.trim_end_matches('/');
        match scope {
            AssetScope::Shared => Self {
                images_dir: content_dir.join("images"),
                public_prefix: format!("{public_root}/images"),
            },
            AssetScope::Course => Self {
                images_dir: content_dir.join(course_id).join("images"),
                public_prefix: format!("{public_root}/{course_id}/images"),
            },
        }
    }
}

/// Counters accumulated over a resolver's lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssetStats {
    pub rewritten: usize,
    pub unresolved: usize,
    pub collisions: usize,
}

/// Resolves, copies and rewrites image references for one course run.
#[derive(Debug)]
pub struct AssetResolver {
    layout: AssetLayout,
    shared_dirs: Vec<PathBuf>,
    policy: CollisionPolicy,
    /// basename -> source file currently occupying that name.
    copied: HashMap<String, PathBuf>,
    stats: AssetStats,
}

impl AssetResolver {
    #[must_use]
    pub fn new(layout: AssetLayout, shared_dirs: Vec<PathBuf>, policy: CollisionPolicy) -> Self {
        Self {
            layout,
            shared_dirs,
            policy,
            copied: HashMap::new(),
            stats: AssetStats::default(),
        }
    }

    #[must_use]
    pub fn layout(&self) -> &AssetLayout {
        &self.layout
    }

    #[must_use]
    pub fn stats(&self) -> AssetStats {
        self.stats
    }

    /// Rewrites every resolvable `src` / `srcset` reference in `fragment`.
    /// `page_dir` is the directory of the page the fragment came from.
    pub fn rewrite(&mut self, fragment: &str, page_dir: &Path) -> String {
        IMAGE_REFERENCE
            .replace_all(fragment, |caps: &Captures| {
                let whole = caps.get(0).map_or("", |m| m.as_str());
                let attr = caps.get(1).map_or("src", |m| m.as_str());
                let (value, quote) = match (caps.get(2), caps.get(3)) {
                    (Some(v), _) => (v.as_str(), '"'),
                    (None, Some(v)) => (v.as_str(), '\''),
                    (None, None) => return whole.to_string(),
                };

                let rewritten = if attr.eq_ignore_ascii_case("srcset") {
                    self.rewrite_srcset(value, page_dir)
                } else {
                    self.resolve(value, page_dir)
                };

                match rewritten {
                    Some(new_value) if new_value != value => {
                        format!("{attr}={quote}{new_value}{quote}")
                    }
                    _ => whole.to_string(),
                }
            })
            .into_owned()
    }

    /// Rewrites each candidate of a `srcset` list, keeping descriptors.
    fn rewrite_srcset(&mut self, value: &str, page_dir: &Path) -> Option<String> {
        let mut any_resolved = false;
        let parts: Vec<String> = value
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| {
                let mut bits = WHITESPACE.splitn(part, 2);
                let url = bits.next().unwrap_or(part);
                let descriptor = bits.next().map(str::trim).unwrap_or_default();
                let new_url = match self.resolve(url, page_dir) {
                    Some(resolved) => {
                        any_resolved = true;
                        resolved
                    }
                    None => url.to_string(),
                };
                if descriptor.is_empty() {
                    new_url
                } else {
                    format!("{new_url} {descriptor}")
                }
            })
            .collect();
        any_resolved.then(|| parts.join(", "))
    }

    /// Resolves one reference. Returns the published path, or `None` when the
    /// reference is remote or no candidate exists.
    fn resolve(&mut self, reference: &str, page_dir: &Path) -> Option<String> {
        let reference = reference.trim();
        if reference.is_empty() || is_remote_reference(reference) {
            return None;
        }

        let basename = extract_filename(reference);
        if basename.is_empty() {
            return None;
        }

        let Some(source) = candidate_paths(reference, &basename, page_dir, &self.shared_dirs)
            .into_iter()
            .find(|path| is_regular_file(path))
        else {
            self.stats.unresolved += 1;
            debug!(reference, page_dir = %page_dir.display(), "image not found; reference kept");
            return None;
        };

        if self.store(&basename, &source) {
            self.stats.rewritten += 1;
            Some(format!("{}/{basename}", self.layout.public_prefix))
        } else {
            None
        }
    }

    /// Places `source` at `images_dir/basename` according to the collision
    /// policy. Returns false when the copy failed.
    fn store(&mut self, basename: &str, source: &Path) -> bool {
        let source_key = fs::canonicalize(source).unwrap_or_else(|_| source.to_path_buf());

        let should_copy = match self.copied.get(basename) {
            Some(previous) if *previous == source_key => false,
            Some(previous) => {
                self.stats.collisions += 1;
                warn!(
                    basename,
                    kept = %previous.display(),
                    incoming = %source_key.display(),
                    policy = ?self.policy,
                    "asset basename collision"
                );
                self.policy == CollisionPolicy::Overwrite
            }
            None => true,
        };

        if !should_copy {
            return true;
        }

        let dest = self.layout.images_dir.join(basename);
        match copy_file(source, &dest) {
            Ok(()) => {
                self.copied.insert(basename.to_string(), source_key);
                true
            }
            Err(err) => {
                warn!(error = %err, dest = %dest.display(), "failed to copy image; reference kept");
                false
            }
        }
    }
}

/// Candidate files for `reference`, in probing order:
/// the reference against the page directory, `images/<basename>` next to the
/// page, `<basename>` next to the page, then `<basename>` in each shared dir.
#[must_use]
pub fn candidate_paths(
    reference: &str,
    basename: &str,
    page_dir: &Path,
    shared_dirs: &[PathBuf],
) -> Vec<PathBuf> {
    let relative = strip_query_and_fragment(reference).trim_start_matches(['/', '\\']);
    let mut candidates = Vec::with_capacity(3 + shared_dirs.len());
    if !relative.is_empty() {
        candidates.push(page_dir.join(relative));
    }
    candidates.push(page_dir.join("images").join(basename));
    candidates.push(page_dir.join(basename));
    candidates.extend(shared_dirs.iter().map(|dir| dir.join(basename)));
    candidates
}
