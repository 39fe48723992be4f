//! Filesystem helpers shared by every component.
//!
//! `ensure_dir` is the only place that creates directories. It is idempotent
//! and tolerates a concurrent creator, so parallel workers can call it
//! without a check-then-create race.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Error, Result};

/// Creates `dir` and its parents if they do not exist yet.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    match fs::create_dir_all(dir) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists && dir.is_dir() => Ok(()),
        Err(err) => Err(Error::io(dir, err)),
    }
}

/// Reads a page as UTF-8 text.
///
/// A missing file is reported as [`Error::MissingSource`] so callers can
/// skip it without treating it as an I/O failure.
pub fn read_page(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|err| {
        if err.kind() == std::io::ErrorKind::NotFound {
            Error::MissingSource(path.to_path_buf())
        } else {
            Error::io(path, err)
        }
    })
}

/// Writes `contents` to `path`, creating the parent directory on demand.
pub fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    fs::write(path, contents).map_err(|err| Error::io(path, err))
}

/// Copies `from` to `to`, creating the destination directory on demand.
pub fn copy_file(from: &Path, to: &Path) -> Result<()> {
    if let Some(parent) = to.parent() {
        ensure_dir(parent)?;
    }
    fs::copy(from, to).map(|_| ()).map_err(|err| Error::io(from, err))
}

/// Pretty-prints `value` as JSON (two-space indent) into `path`.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).map_err(|err| Error::json(path, err))?;
    write_file(path, &json)
}

/// Reads and deserializes a JSON document.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path).map_err(|err| Error::io(path, err))?;
    serde_json::from_str(&text).map_err(|err| Error::json(path, err))
}

/// True when `path` exists and is not a directory.
#[must_use]
pub fn is_regular_file(path: &Path) -> bool {
    fs::metadata(path).is_ok_and(|meta| !meta.is_dir())
}
