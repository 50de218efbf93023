//! Filesystem query abstraction for dependency injection.
//!
//! Provides the [`FileSystemOps`] trait so that the tracking resolver can be
//! unit-tested without touching the real filesystem.  Production code uses
//! [`SystemFileSystemOps`]; tests use `MockFileSystemOps`.

use std::path::Path;

/// Abstraction over the filesystem queries made while resolving tracked
/// directories.
pub trait FileSystemOps: std::fmt::Debug {
    /// Returns `true` if `path` exists on the filesystem.
    fn exists(&self, path: &Path) -> bool;
}

/// Production [`FileSystemOps`] implementation that delegates to [`std::fs`].
#[derive(Debug, Default)]
pub struct SystemFileSystemOps;

impl FileSystemOps for SystemFileSystemOps {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

/// Mock [`FileSystemOps`] for unit tests.
///
/// Pre-configure existing paths with [`with_existing`](Self::with_existing)
/// and inspect how many queries were made with
/// [`lookup_count`](Self::lookup_count).
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MockFileSystemOps {
    existing: Vec<std::path::PathBuf>,
    lookups: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl MockFileSystemOps {
    /// Create an empty mock with nothing configured.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `path` as existing.
    #[must_use]
    pub fn with_existing(mut self, path: impl Into<std::path::PathBuf>) -> Self {
        let p = path.into();
        if !self.existing.contains(&p) {
            self.existing.push(p);
        }
        self
    }

    /// Number of [`FileSystemOps::exists`] calls made so far.
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(test)]
impl FileSystemOps for MockFileSystemOps {
    fn exists(&self, path: &Path) -> bool {
        self.lookups.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        self.existing.iter().any(|p| p == path)
    }
}
