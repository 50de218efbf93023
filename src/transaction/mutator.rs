//! Dry-run aware filesystem mutations that record their inverse.
use std::path::Path;

use super::{Operation, UndoLog};
use crate::error::{HomefilesError, Result};
use crate::logging::Log;

/// The mutating primitives used by link, unlink, track and untrack.
///
/// Each primitive takes an optional [`UndoLog`]; passing `None` is rollback
/// mode, where nothing further is recorded.  In dry-run mode the intended
/// action is logged and the filesystem is left untouched.
#[derive(Debug, Clone, Copy)]
pub struct FsMutator<'a> {
    dry_run: bool,
    log: &'a dyn Log,
}

impl<'a> FsMutator<'a> {
    /// Create a mutator that logs through `log`.
    #[must_use]
    pub const fn new(dry_run: bool, log: &'a dyn Log) -> Self {
        Self { dry_run, log }
    }

    /// The logger mutations are reported to.
    #[must_use]
    pub const fn log(&self) -> &'a dyn Log {
        self.log
    }

    /// Create a symlink at `link` pointing to `source`.
    ///
    /// An existing symlink at `link` is left alone; any other existing entry
    /// is refused rather than overwritten, in dry-run mode too.
    ///
    /// # Errors
    ///
    /// Returns [`HomefilesError::NotASymlink`] if `link` is a real file or
    /// directory, or an I/O error if the link cannot be created.
    pub fn symlink(&self, source: &Path, link: &Path, undo: Option<&mut UndoLog>) -> Result<()> {
        match link.symlink_metadata() {
            Ok(meta) if meta.file_type().is_symlink() => {
                self.log
                    .debug(&format!("already linked, skipping: {}", link.display()));
                return Ok(());
            }
            Ok(_) => return Err(HomefilesError::NotASymlink(link.to_path_buf())),
            Err(_) => {}
        }

        if self.dry_run {
            self.log.dry_run(&format!(
                "would link {} -> {}",
                link.display(),
                source.display()
            ));
            return Ok(());
        }

        create_symlink(source, link).map_err(|e| {
            HomefilesError::io(
                format!("creating symlink {} -> {}", link.display(), source.display()),
                e,
            )
        })?;
        self.log
            .debug(&format!("linked {} -> {}", link.display(), source.display()));

        if let Some(undo) = undo {
            undo.record(Operation::SymlinkCreated {
                link: link.to_path_buf(),
                target: source.to_path_buf(),
            });
        }
        Ok(())
    }

    /// Remove the symlink at `link`.
    ///
    /// A missing path, or a symlink whose target no longer exists, is skipped.
    ///
    /// # Errors
    ///
    /// Returns [`HomefilesError::NotASymlink`] if `link` is real content, or
    /// an I/O error if it cannot be removed.
    pub fn remove_symlink(&self, link: &Path, undo: Option<&mut UndoLog>) -> Result<()> {
        if !link.exists() {
            self.log
                .debug(&format!("not present, skipping: {}", link.display()));
            return Ok(());
        }

        let meta = link
            .symlink_metadata()
            .map_err(|e| HomefilesError::io(format!("reading metadata: {}", link.display()), e))?;
        if !meta.file_type().is_symlink() {
            return Err(HomefilesError::NotASymlink(link.to_path_buf()));
        }
        let target = std::fs::read_link(link)
            .map_err(|e| HomefilesError::io(format!("reading link: {}", link.display()), e))?;

        if self.dry_run {
            self.log
                .dry_run(&format!("would remove symlink {}", link.display()));
            return Ok(());
        }

        remove_link(link, &meta)
            .map_err(|e| HomefilesError::io(format!("removing symlink: {}", link.display()), e))?;
        self.log
            .debug(&format!("removed symlink {}", link.display()));

        if let Some(undo) = undo {
            undo.record(Operation::SymlinkRemoved {
                link: link.to_path_buf(),
                target,
            });
        }
        Ok(())
    }

    /// Create the directory `path` if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the directory cannot be created.
    pub fn mkdir(&self, path: &Path, undo: Option<&mut UndoLog>) -> Result<()> {
        if path.exists() {
            self.log
                .debug(&format!("directory exists, skipping: {}", path.display()));
            return Ok(());
        }

        if self.dry_run {
            self.log
                .dry_run(&format!("would create directory {}", path.display()));
            return Ok(());
        }

        std::fs::create_dir(path)
            .map_err(|e| HomefilesError::io(format!("creating directory {}", path.display()), e))?;
        self.log
            .debug(&format!("created directory {}", path.display()));

        if let Some(undo) = undo {
            undo.record(Operation::DirectoryCreated {
                path: path.to_path_buf(),
            });
        }
        Ok(())
    }

    /// Create `path` and every missing ancestor, recording each one.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if any directory cannot be created.
    pub fn makedirs(&self, path: &Path, mut undo: Option<&mut UndoLog>) -> Result<()> {
        let mut missing: Vec<&Path> = path.ancestors().take_while(|p| !p.exists()).collect();
        missing.reverse();
        for dir in missing {
            self.mkdir(dir, undo.as_deref_mut())?;
        }
        Ok(())
    }

    /// Remove the empty directory `path`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the directory is not empty or cannot be removed.
    pub fn rmdir(&self, path: &Path, undo: Option<&mut UndoLog>) -> Result<()> {
        if !path.exists() {
            self.log
                .debug(&format!("not present, skipping: {}", path.display()));
            return Ok(());
        }

        if self.dry_run {
            self.log
                .dry_run(&format!("would remove directory {}", path.display()));
            return Ok(());
        }

        std::fs::remove_dir(path)
            .map_err(|e| HomefilesError::io(format!("removing directory {}", path.display()), e))?;
        self.log
            .debug(&format!("removed directory {}", path.display()));

        if let Some(undo) = undo {
            undo.record(Operation::DirectoryRemoved {
                path: path.to_path_buf(),
            });
        }
        Ok(())
    }

    /// Move `from` to `to`.
    ///
    /// # Errors
    ///
    /// Returns [`HomefilesError::PathNotFound`] if `from` is missing,
    /// [`HomefilesError::AlreadyExists`] if `to` is taken, or an I/O error.
    pub fn rename(&self, from: &Path, to: &Path, undo: Option<&mut UndoLog>) -> Result<()> {
        if from.symlink_metadata().is_err() {
            return Err(HomefilesError::PathNotFound(from.to_path_buf()));
        }
        if to.symlink_metadata().is_ok() {
            return Err(HomefilesError::AlreadyExists(to.to_path_buf()));
        }

        if self.dry_run {
            self.log.dry_run(&format!(
                "would move {} -> {}",
                from.display(),
                to.display()
            ));
            return Ok(());
        }

        std::fs::rename(from, to).map_err(|e| {
            HomefilesError::io(format!("moving {} -> {}", from.display(), to.display()), e)
        })?;
        self.log
            .debug(&format!("moved {} -> {}", from.display(), to.display()));

        if let Some(undo) = undo {
            undo.record(Operation::Renamed {
                from: from.to_path_buf(),
                to: to.to_path_buf(),
            });
        }
        Ok(())
    }
}

/// Create a symlink at `link` pointing to `target`.
fn create_symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    #[cfg(unix)]
    {
        std::os::unix::fs::symlink(target, link)
    }

    #[cfg(windows)]
    {
        if target.is_dir() {
            std::os::windows::fs::symlink_dir(target, link)
        } else {
            std::os::windows::fs::symlink_file(target, link)
        }
    }
}

/// Remove a symlink, handling platform differences.
///
/// On Windows, directory symlinks must be removed with `remove_dir`.
fn remove_link(path: &Path, meta: &std::fs::Metadata) -> std::io::Result<()> {
    if is_dir_like(meta) {
        std::fs::remove_dir(path)
    } else {
        std::fs::remove_file(path)
    }
}

/// Check if metadata represents a directory-like entry.
/// On Windows, `symlink_metadata().is_dir()` returns `false` for directory symlinks,
/// so we check the raw `FILE_ATTRIBUTE_DIRECTORY` bit instead.
fn is_dir_like(meta: &std::fs::Metadata) -> bool {
    #[cfg(windows)]
    {
        use std::os::windows::fs::MetadataExt;
        meta.file_attributes() & 0x10 != 0 // FILE_ATTRIBUTE_DIRECTORY
    }
    #[cfg(not(windows))]
    {
        meta.is_dir()
    }
}
