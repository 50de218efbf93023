//! Undo log for multi-step filesystem mutations.
//!
//! Every mutating primitive in [`FsMutator`] appends an [`Operation`]
//! describing what it did once it succeeds.  When a later step fails the
//! caller hands the log to [`UndoLog::rollback`], which replays the inverse
//! of each operation in strict reverse order without recording anything
//! further.
//!
//! ```ignore
//! let mut undo = UndoLog::new();
//! let result = (|| {
//!     fs.mkdir(&dir, Some(&mut undo))?;
//!     fs.symlink(&source, &dir.join("file"), Some(&mut undo))
//! })();
//! undo.finish(result, &fs)?;
//! ```

mod mutator;

pub use mutator::FsMutator;

use std::path::PathBuf;

use crate::error::{HomefilesError, Result};

/// A completed mutation together with the arguments needed to invert it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// `link` was created pointing at `target`; undone by removing `link`.
    SymlinkCreated {
        /// Symlink location.
        link: PathBuf,
        /// What the symlink points to.
        target: PathBuf,
    },
    /// The symlink `link -> target` was removed; undone by recreating it.
    SymlinkRemoved {
        /// Symlink location.
        link: PathBuf,
        /// What the symlink pointed to.
        target: PathBuf,
    },
    /// An empty directory was created; undone by removing it.
    DirectoryCreated {
        /// Created directory.
        path: PathBuf,
    },
    /// An empty directory was removed; undone by creating it again.
    DirectoryRemoved {
        /// Removed directory.
        path: PathBuf,
    },
    /// `from` was moved to `to`; undone by moving it back.
    Renamed {
        /// Original location.
        from: PathBuf,
        /// New location.
        to: PathBuf,
    },
}

impl Operation {
    /// Execute the inverse of this operation in rollback mode.
    ///
    /// # Errors
    ///
    /// Returns the error raised by the inverse primitive.
    pub fn invert(&self, fs: &FsMutator<'_>) -> Result<()> {
        match self {
            Self::SymlinkCreated { link, .. } => fs.remove_symlink(link, None),
            Self::SymlinkRemoved { link, target } => fs.symlink(target, link, None),
            Self::DirectoryCreated { path } => fs.rmdir(path, None),
            Self::DirectoryRemoved { path } => fs.mkdir(path, None),
            Self::Renamed { from, to } => fs.rename(to, from, None),
        }
    }
}

/// Ordered record of completed operations for one top-level invocation.
#[derive(Debug, Default)]
pub struct UndoLog {
    operations: Vec<Operation>,
}

impl UndoLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a completed operation.
    pub fn record(&mut self, operation: Operation) {
        self.operations.push(operation);
    }

    /// Recorded operations in execution order.
    #[must_use]
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Number of recorded operations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Returns `true` if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Replay the inverse of every recorded operation, newest first.
    ///
    /// Stops at the first inverse that fails and returns its error.
    ///
    /// # Errors
    ///
    /// Returns the error raised by the failing inverse operation.
    pub fn rollback(self, fs: &FsMutator<'_>) -> Result<()> {
        if !self.operations.is_empty() {
            fs.log()
                .warn(&format!("rolling back {} operation(s)", self.operations.len()));
        }
        for operation in self.operations.iter().rev() {
            operation.invert(fs)?;
        }
        Ok(())
    }

    /// Resolve a multi-step operation: on error roll back and return the
    /// original error (or a [`HomefilesError::RollbackFailed`] if the
    /// rollback itself failed); on success keep the changes.
    ///
    /// # Errors
    ///
    /// Returns the original error, or the rollback failure wrapping it.
    pub fn finish<T>(self, result: Result<T>, fs: &FsMutator<'_>) -> Result<T> {
        match result {
            Ok(value) => Ok(value),
            Err(original) => match self.rollback(fs) {
                Ok(()) => Err(original),
                Err(rollback) => Err(HomefilesError::RollbackFailed {
                    rollback: Box::new(rollback),
                    original: Box::new(original),
                }),
            },
        }
    }
}
