//! Filesystem helpers used while preparing the distribution clone.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{DistPublishError, Result};

/// A path in a working tree, tagged with what it points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FsEntry {
    File(PathBuf),
    Directory(PathBuf),
}

impl FsEntry {
    /// Classify `path` by looking at it without following symlinks.
    ///
    /// Paths that no longer exist (e.g. deleted but still tracked) are files.
    pub fn classify(path: PathBuf) -> Self {
        match fs::symlink_metadata(&path) {
            Ok(meta) if meta.is_dir() => FsEntry::Directory(path),
            _ => FsEntry::File(path),
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            FsEntry::File(p) | FsEntry::Directory(p) => p,
        }
    }

    /// Remove the entry; an already missing entry counts as removed
    pub async fn delete(&self) -> Result<()> {
        let result = match self {
            FsEntry::File(p) => tokio::fs::remove_file(p).await,
            FsEntry::Directory(p) => tokio::fs::remove_dir_all(p).await,
        };
        match result {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

/// Delete `dir` and everything below it if it exists.
///
/// Returns whether anything was removed.
pub async fn remove_dir_if_exists(dir: &Path) -> Result<bool> {
    match tokio::fs::symlink_metadata(dir).await {
        Ok(meta) if meta.is_dir() => {
            tokio::fs::remove_dir_all(dir).await?;
            Ok(true)
        }
        Ok(_) => Err(DistPublishError::resource(format!(
            "{} exists but is not a directory",
            dir.display()
        ))),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}

/// Run synchronous filesystem work on tokio's blocking pool
pub async fn run_blocking<T, F>(work: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| DistPublishError::resource(format!("filesystem task failed: {}", e)))?
}

/// Remove every empty directory below `root`, bottom up.
///
/// `.git` is never entered and `root` itself is kept. Returns the number of
/// directories removed.
pub fn prune_empty_dirs(root: &Path) -> Result<usize> {
    fn prune(dir: &Path) -> Result<(usize, bool)> {
        let mut removed = 0;
        let mut empty = true;
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            if entry.file_type()?.is_dir() {
                if entry.file_name() == ".git" {
                    empty = false;
                    continue;
                }
                let (count, child_empty) = prune(&path)?;
                removed += count;
                if child_empty {
                    fs::remove_dir(&path)?;
                    removed += 1;
                } else {
                    empty = false;
                }
            } else {
                empty = false;
            }
        }
        Ok((removed, empty))
    }

    Ok(prune(root)?.0)
}

/// Copy a file or a whole directory tree from `src` to `dst`.
///
/// Parent directories of `dst` are created as needed.
pub fn copy_recursive(src: &Path, dst: &Path) -> Result<()> {
    let meta = fs::metadata(src).map_err(|e| {
        DistPublishError::resource(format!("cannot read {}: {}", src.display(), e))
    })?;

    if meta.is_dir() {
        fs::create_dir_all(dst)?;
        for entry in fs::read_dir(src)? {
            let entry = entry?;
            if entry.file_name() == ".git" {
                continue;
            }
            copy_recursive(&entry.path(), &dst.join(entry.file_name()))?;
        }
    } else {
        if let Some(parent) = dst.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(src, dst)?;
    }
    Ok(())
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Write pretty-printed JSON with a trailing newline
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut text = serde_json::to_string_pretty(value)?;
    text.push('\n');
    fs::write(path, text)?;
    Ok(())
}
