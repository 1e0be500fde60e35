//! Static asset mirroring.
//!
//! Copies every file under the static root into `<output>/static/`, keeping
//! relative paths. Assets are treated as essential (stylesheets, fonts), so any
//! failed copy aborts the build. A static root that does not exist at all is
//! reported as [`AssetOutcome::Skipped`] rather than an error.

use crate::paths;
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Directory under the output root that receives the mirrored assets.
pub const STATIC_DIR: &str = "static";

#[derive(Error, Debug)]
pub enum AssetError {
    #[error("cannot read {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
    #[error("cannot copy {from} to {to}: {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot create {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum AssetOutcome {
    /// Number of files copied into the destination
    Copied(usize),
    /// The static root does not exist
    Skipped,
}

/// Mirror `static_root` into `dest`. Directories are created before the files
/// inside them are copied.
pub fn copy_static(static_root: &Path, dest: &Path) -> Result<AssetOutcome, AssetError> {
    if !static_root.is_dir() {
        return Ok(AssetOutcome::Skipped);
    }

    let mut copied = 0;
    // WalkDir yields a directory before its contents
    for entry in WalkDir::new(static_root).sort_by_file_name() {
        let entry = entry.map_err(|e| AssetError::Walk {
            path: e
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| static_root.to_path_buf()),
            source: e,
        })?;

        let rel = paths::relativize(static_root, entry.path()).unwrap_or_default();
        let target = dest.join(&rel);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(|e| AssetError::CreateDir {
                path: target.clone(),
                source: e,
            })?;
        } else {
            fs::copy(entry.path(), &target).map_err(|e| AssetError::Copy {
                from: entry.path().to_path_buf(),
                to: target.clone(),
                source: e,
            })?;
            debug!("copied asset {}", paths::to_url_path(&rel));
            copied += 1;
        }
    }

    Ok(AssetOutcome::Copied(copied))
}
