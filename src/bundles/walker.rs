//! Top-down traversal of a bundle that stops at tracked directories.
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::ignore::IgnoreSet;
use crate::error::{HomefilesError, Result};
use crate::paths;
use crate::tracking::TrackingResolver;

/// One untracked directory of a bundle and its immediate children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkedDir {
    /// Absolute path of the directory.
    pub path: PathBuf,
    /// Names of immediate subdirectories, sorted.
    pub subdirs: Vec<OsString>,
    /// Names of immediate non-directory entries (symlinks included), sorted.
    pub files: Vec<OsString>,
    /// Path of the directory relative to the bundle root; empty for the root.
    pub relative: PathBuf,
}

/// Lazily walk `bundle_root`.
///
/// A missing bundle yields nothing.  Tracked directories are neither
/// yielded nor descended into; their parent lists them as a subdirectory so
/// the caller can link them as a unit.  Ignored names are dropped at every
/// level.
pub fn walk<'a>(
    bundle_root: &'a Path,
    resolver: &'a TrackingResolver,
    ignore: &'a IgnoreSet,
) -> impl Iterator<Item = Result<WalkedDir>> + 'a {
    let entries = bundle_root.is_dir().then(|| {
        WalkDir::new(bundle_root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |entry| {
                entry.file_type().is_dir()
                    && (entry.depth() == 0 || !ignore.is_ignored(entry.file_name()))
                    && !resolver.is_tracked(entry.path())
            })
    });

    entries.into_iter().flatten().map(move |entry| {
        let entry = entry?;
        list_dir(bundle_root, entry.path(), ignore)
    })
}

fn list_dir(bundle_root: &Path, dir: &Path, ignore: &IgnoreSet) -> Result<WalkedDir> {
    let read_err = |e: std::io::Error| HomefilesError::io(format!("listing {}", dir.display()), e);

    let mut subdirs = Vec::new();
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        let name = entry.file_name();
        if ignore.is_ignored(&name) {
            continue;
        }
        if entry.file_type().map_err(read_err)?.is_dir() {
            subdirs.push(name);
        } else {
            files.push(name);
        }
    }
    subdirs.sort();
    files.sort();

    Ok(WalkedDir {
        path: dir.to_path_buf(),
        subdirs,
        files,
        relative: paths::relative(bundle_root, dir),
    })
}
