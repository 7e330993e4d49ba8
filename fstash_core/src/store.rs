//! Stash storage: create, expand, delete and list stashes under a root.

use crate::error::{Error, Result};
use crate::key::KEY_SIZE;
use crate::manifest::Manifest;
use crate::name::StashName;
use crate::replicate::{CopyStats, replicate, replicate_with};
use crate::template::{TemplateData, TemplateRenderer};
use serde::Serialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Depth of a stash directory below the storage root: the shard segments
/// plus the name segment.
pub const STASH_DEPTH: usize = KEY_SIZE + 1;

/// Outcome of a create or expand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StashSummary {
    /// Normalized stash name.
    pub name: String,
    /// Stash directory inside the storage root.
    pub path: PathBuf,
    /// What was copied.
    #[serde(flatten)]
    pub stats: CopyStats,
}

/// A stash storage area.
///
/// Layout: `<root>/<XX>/<XX>/<XX>/<XX>/<name>/<files...>` where the `XX`
/// segments are the name's [`LocationKey`](crate::LocationKey).
#[derive(Debug, Clone)]
pub struct StashStore {
    root: PathBuf,
}

impl StashStore {
    /// Open the store at `root`, creating the directory if needed.
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).map_err(|e| Error::io_at(&root, e))?;
        Ok(Self { root })
    }

    /// Get the root directory of the store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding a stash, whether or not it exists.
    pub fn stash_path(&self, name: &StashName) -> PathBuf {
        self.root
            .join(name.location_key().relative_path())
            .join(name.as_str())
    }

    /// Snapshot `source` as stash `name`.
    ///
    /// An existing stash with the same name is overwritten file by file;
    /// files it has that `source` lacks are kept.
    pub fn create(&self, name: &str, source: &Path) -> Result<StashSummary> {
        let name = StashName::parse(name)?;
        let manifest = Manifest::scan(source)?;
        let stash_dir = self.stash_path(&name);

        tracing::debug!(stash = %name, source = %source.display(), dest = %stash_dir.display(), "creating stash");

        let stats = replicate(&manifest, source, &stash_dir)?;

        tracing::info!(stash = %name, files = stats.files, bytes = stats.bytes, "created stash");

        Ok(StashSummary {
            name: name.to_string(),
            path: stash_dir,
            stats,
        })
    }

    /// Restore stash `name` into `dest`, rendering files that have an entry
    /// in `data`.
    pub fn expand(&self, name: &str, dest: &Path, data: &TemplateData) -> Result<StashSummary> {
        let name = StashName::normalize(name);
        let stash_dir = self.existing_stash(&name)?;
        let manifest = Manifest::scan(&stash_dir)?;

        tracing::debug!(
            stash = %name,
            dest = %dest.display(),
            templates = data.len(),
            "expanding stash"
        );

        let stats = if data.is_empty() {
            replicate(&manifest, &stash_dir, dest)?
        } else {
            let renderer = TemplateRenderer::new();
            replicate_with(&manifest, &stash_dir, dest, |_, file_name, bytes| {
                renderer.apply(data, file_name, bytes)
            })?
        };

        tracing::info!(stash = %name, files = stats.files, dest = %dest.display(), "expanded stash");

        Ok(StashSummary {
            name: name.to_string(),
            path: stash_dir,
            stats,
        })
    }

    /// Restore stash `name` into `dest` as plain copies.
    pub fn pop(&self, name: &str, dest: &Path) -> Result<StashSummary> {
        self.expand(name, dest, &TemplateData::new())
    }

    /// Remove stash `name`.
    ///
    /// Returns `false` if there was nothing to remove. Shard directories
    /// left empty are removed too.
    pub fn delete(&self, name: &str) -> Result<bool> {
        let name = StashName::parse(name)?;
        let stash_dir = self.stash_path(&name);

        match fs::remove_dir_all(&stash_dir) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(stash = %name, "stash already absent");
                return Ok(false);
            }
            Err(e) => return Err(Error::io_at(&stash_dir, e)),
        }

        self.prune_empty_shards(&stash_dir);

        tracing::info!(stash = %name, "deleted stash");
        Ok(true)
    }

    /// Names of all stashes, sorted.
    pub fn list(&self) -> Result<Vec<String>> {
        let mut names = list_depth(&self.root, STASH_DEPTH)?;
        names.sort();
        Ok(names)
    }

    /// Manifest of an existing stash.
    pub fn manifest(&self, name: &str) -> Result<Manifest> {
        let name = StashName::normalize(name);
        let stash_dir = self.existing_stash(&name)?;
        Manifest::scan(&stash_dir)
    }

    /// Resolve a lookup name to an existing stash directory.
    ///
    /// Lookup names are not validated, so anything that is not a single
    /// path segment (absolute paths, `..`, separators) cannot name a stash.
    fn existing_stash(&self, name: &StashName) -> Result<PathBuf> {
        if !name.is_single_segment() {
            return Err(Error::not_found(name.as_str()));
        }
        let stash_dir = self.stash_path(name);
        match fs::metadata(&stash_dir) {
            Ok(metadata) if metadata.is_dir() => Ok(stash_dir),
            Ok(_) => Err(Error::not_found(stash_dir)),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(Error::not_found(stash_dir)),
            Err(e) => Err(Error::io_at(&stash_dir, e)),
        }
    }

    /// Remove empty shard directories above a deleted stash, stopping at
    /// the first non-empty one or the root.
    fn prune_empty_shards(&self, stash_dir: &Path) {
        let mut current = stash_dir.parent();
        while let Some(dir) = current {
            if dir == self.root.as_path() || !dir.starts_with(&self.root) {
                break;
            }
            match fs::remove_dir(dir) {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => {
                    // Usually a shard still shared with another stash
                    tracing::debug!(dir = %dir.display(), error = %e, "stopped pruning shard directories");
                    break;
                }
            }
            current = dir.parent();
        }
    }
}

/// Base names of directories exactly `depth` levels below `root`.
///
/// Order follows the directory walk. A depth of zero yields nothing.
pub fn list_depth(root: &Path, depth: usize) -> Result<Vec<String>> {
    if depth == 0 {
        return Ok(Vec::new());
    }
    if !root.is_dir() {
        return Err(Error::not_found(root));
    }

    let walker = ignore::WalkBuilder::new(root)
        .standard_filters(false)
        .follow_links(false)
        .max_depth(Some(depth))
        .build();

    let mut names = Vec::new();
    for entry in walker {
        let entry = entry?;
        if entry.depth() != depth || !entry.file_type().is_some_and(|t| t.is_dir()) {
            continue;
        }
        let name = entry
            .file_name()
            .to_str()
            .ok_or_else(|| Error::invalid_path(entry.path()))?;
        names.push(name.to_string());
    }

    Ok(names)
}
