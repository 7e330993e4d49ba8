//! Copying a manifest's files from one tree into another.

use crate::error::{Error, Result};
use crate::manifest::{Manifest, ROOT_DIR};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Counters for a replication run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CopyStats {
    /// Directories ensured in the destination.
    pub directories: usize,
    /// Files written.
    pub files: usize,
    /// Bytes written.
    pub bytes: u64,
}

/// Copy every file named by `manifest` from `source` to `dest`.
///
/// Directories are created as needed and existing files are truncated.
/// The copy is not transactional: on error, files written so far remain.
pub fn replicate(manifest: &Manifest, source: &Path, dest: &Path) -> Result<CopyStats> {
    replicate_with(manifest, source, dest, |_, _, bytes| Ok(bytes))
}

/// Like [`replicate`], passing each file's bytes through `transform`
/// before writing.
///
/// The transform receives the manifest directory, the file name and the
/// source bytes. If it fails, that file is not written and the run stops.
pub fn replicate_with<F>(
    manifest: &Manifest,
    source: &Path,
    dest: &Path,
    mut transform: F,
) -> Result<CopyStats>
where
    F: FnMut(&Path, &str, Vec<u8>) -> Result<Vec<u8>>,
{
    let mut stats = CopyStats::default();

    for (dir, files) in manifest.iter() {
        let src_dir = under(source, dir);
        let dst_dir = under(dest, dir);

        fs::create_dir_all(&dst_dir).map_err(|e| Error::io_at(&dst_dir, e))?;
        stats.directories += 1;

        for file_name in files {
            let src = src_dir.join(file_name);
            let dst = dst_dir.join(file_name);

            let content = fs::read(&src).map_err(|e| Error::io_at(&src, e))?;
            let content = transform(dir, file_name.as_str(), content)?;
            fs::write(&dst, &content).map_err(|e| Error::io_at(&dst, e))?;

            tracing::trace!(from = %src.display(), to = %dst.display(), bytes = content.len(), "copied file");

            stats.files += 1;
            stats.bytes += content.len() as u64;
        }
    }

    Ok(stats)
}

/// Join a manifest directory onto `base`, mapping [`ROOT_DIR`] to `base`
/// itself. `create_dir_all("missing/.")` fails, so `.` is never joined.
fn under(base: &Path, dir: &Path) -> PathBuf {
    if dir == Path::new(ROOT_DIR) {
        base.to_path_buf()
    } else {
        base.join(dir)
    }
}
