//! Tracked-directory resolution.
//!
//! A directory containing a [`MARKER`] file is linked into the root tree as
//! one opaque symlink instead of being walked file by file.  The marker
//! applies to the whole subtree, so a path is tracked when it or any
//! ancestor carries the marker.
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{HomefilesError, Result};
use crate::logging::Log;
use crate::operations::{FileSystemOps, SystemFileSystemOps};

/// Name of the zero-byte sentinel file that marks a tracked directory.
pub const MARKER: &str = ".trackeddir";

/// Memoizing resolver for the tracked status of directories.
///
/// Results are cached per path for the lifetime of the resolver; markers are
/// not expected to change while an operation runs.
#[derive(Debug)]
pub struct TrackingResolver {
    fs: Arc<dyn FileSystemOps>,
    cache: RefCell<HashMap<PathBuf, bool>>,
}

impl Default for TrackingResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl TrackingResolver {
    /// Create a resolver backed by the real filesystem.
    #[must_use]
    pub fn new() -> Self {
        Self::with_fs_ops(Arc::new(SystemFileSystemOps))
    }

    /// Create a resolver with a custom [`FileSystemOps`] implementation.
    #[must_use]
    pub fn with_fs_ops(fs: Arc<dyn FileSystemOps>) -> Self {
        Self {
            fs,
            cache: RefCell::new(HashMap::new()),
        }
    }

    /// Whether `path` or one of its ancestors contains a [`MARKER`].
    pub fn is_tracked(&self, path: &Path) -> bool {
        if let Some(&tracked) = self.cache.borrow().get(path) {
            return tracked;
        }

        let tracked = self.fs.exists(&path.join(MARKER))
            || path.parent().is_some_and(|parent| self.is_tracked(parent));

        self.cache.borrow_mut().insert(path.to_path_buf(), tracked);
        tracked
    }

    /// Number of paths whose status has been computed.
    #[must_use]
    pub fn cached_len(&self) -> usize {
        self.cache.borrow().len()
    }

    /// Write the marker into `dir` and return its path so it can be
    /// registered with version control.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the marker cannot be written.
    pub fn mark_tracked(&self, dir: &Path, dry_run: bool, log: &dyn Log) -> Result<PathBuf> {
        let marker = dir.join(MARKER);
        if dry_run {
            log.dry_run(&format!("would mark {} as tracked", dir.display()));
            return Ok(marker);
        }

        std::fs::File::create(&marker)
            .map_err(|e| HomefilesError::io(format!("writing {}", marker.display()), e))?;
        log.debug(&format!("tracking directory {}", dir.display()));
        Ok(marker)
    }
}
