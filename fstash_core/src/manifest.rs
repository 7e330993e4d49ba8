//! Directory scanning into a manifest of files per directory.

use crate::error::{Error, Result};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Relative path naming the root of a scanned tree.
pub const ROOT_DIR: &str = ".";

/// Files of a tree, grouped by the directory that directly contains them.
///
/// Keys are paths relative to the scanned root (`.` for the root itself).
/// Only directories holding at least one regular file appear, so empty
/// directories are never reproduced from a manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    entries: BTreeMap<PathBuf, BTreeSet<String>>,
}

impl Manifest {
    /// Create an empty manifest.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan a directory tree.
    ///
    /// Every regular file below `root` is recorded under its parent
    /// directory. Symlinks and other special entries are skipped with a
    /// warning. Hidden files and ignore files get no special treatment.
    pub fn scan(root: &Path) -> Result<Self> {
        let metadata = fs::metadata(root).map_err(|e| match e.kind() {
            ErrorKind::NotFound => Error::not_found(root),
            _ => Error::io_at(root, e),
        })?;
        if !metadata.is_dir() {
            return Err(Error::not_a_directory(root));
        }

        let mut manifest = Manifest::new();

        let walker = ignore::WalkBuilder::new(root)
            .standard_filters(false) // Snapshot everything, including dotfiles
            .follow_links(false)
            .build();

        for entry in walker {
            let entry = entry?;
            let entry_path = entry.path();

            // Skip the root itself
            if entry.depth() == 0 {
                continue;
            }

            let Some(file_type) = entry.file_type() else {
                continue;
            };
            if file_type.is_dir() {
                continue;
            }
            if !file_type.is_file() {
                tracing::warn!(path = %entry_path.display(), "skipping non-regular file");
                continue;
            }

            let relative = entry_path
                .strip_prefix(root)
                .map_err(|_| Error::invalid_path(entry_path))?;
            let file_name = relative
                .file_name()
                .and_then(|n| n.to_str())
                .ok_or_else(|| Error::invalid_path(entry_path))?;
            let dir = match relative.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent,
                _ => Path::new(ROOT_DIR),
            };
            if dir.to_str().is_none() {
                return Err(Error::invalid_path(entry_path));
            }

            manifest.insert(dir, file_name);
        }

        tracing::debug!(
            root = %root.display(),
            directories = manifest.len(),
            files = manifest.file_count(),
            "scanned tree"
        );

        Ok(manifest)
    }

    /// Record a file under a directory.
    pub fn insert(&mut self, dir: impl Into<PathBuf>, file_name: impl Into<String>) {
        self.entries
            .entry(dir.into())
            .or_default()
            .insert(file_name.into());
    }

    /// Directories that hold files.
    pub fn directories(&self) -> impl Iterator<Item = &Path> {
        self.entries.keys().map(PathBuf::as_path)
    }

    /// Files directly inside `dir`, if any.
    pub fn files(&self, dir: impl AsRef<Path>) -> Option<&BTreeSet<String>> {
        self.entries.get(dir.as_ref())
    }

    /// Iterate over `(directory, files)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&Path, &BTreeSet<String>)> {
        self.entries.iter().map(|(dir, files)| (dir.as_path(), files))
    }

    /// Number of directories.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of files across all directories.
    pub fn file_count(&self) -> usize {
        self.entries.values().map(BTreeSet::len).sum()
    }
}

impl fmt::Display for Manifest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (dir, files) in &self.entries {
            let files: Vec<&str> = files.iter().map(String::as_str).collect();
            writeln!(f, "{} [{}]", dir.display(), files.join(" "))?;
        }
        Ok(())
    }
}
