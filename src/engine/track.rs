//! Moving live content into the repository and back.
use std::path::{Path, PathBuf};

use crate::bundles::DEFAULT_BUNDLE;
use crate::error::{HomefilesError, Result};
use crate::paths;
use crate::tracking::MARKER;
use crate::transaction::UndoLog;

use super::Homefiles;

impl Homefiles {
    /// Move `path` into `bundle` (default `Default`) and leave a symlink to
    /// it in its place, then commit the new content.
    ///
    /// Directories are tracked as a unit: a marker is written inside them so
    /// they are linked back as one symlink.  Returns the path of the content
    /// inside the repository.
    ///
    /// # Errors
    ///
    /// Returns [`HomefilesError::PathOutsideRoot`],
    /// [`HomefilesError::AlreadyTracked`] or [`HomefilesError::PathNotFound`]
    /// before anything is touched, a filesystem error after the move was
    /// rolled back, or a version-control error once the filesystem change is
    /// in place.
    pub fn track(&self, path: &Path, bundle: Option<&str>) -> Result<PathBuf> {
        let bundle = bundle.unwrap_or(DEFAULT_BUNDLE);
        let src = paths::normalize(path);

        if src.starts_with(&self.repo) {
            return Err(HomefilesError::AlreadyTracked(src));
        }
        if src == self.root || !src.starts_with(&self.root) {
            return Err(HomefilesError::PathOutsideRoot {
                path: src,
                root: self.root.clone(),
            });
        }
        let meta = src
            .symlink_metadata()
            .map_err(|_| HomefilesError::PathNotFound(src.clone()))?;
        let is_dir = meta.is_dir();

        let dst = self
            .repo
            .join(bundle)
            .join(paths::relative(&self.root, &src));
        self.log.stage(&format!(
            "Tracking {} in bundle {bundle}",
            src.display()
        ));

        let fs = self.mutator();
        let mut undo = UndoLog::new();
        let result = (|| {
            if let Some(parent) = dst.parent() {
                fs.makedirs(parent, Some(&mut undo))?;
            }
            fs.rename(&src, &dst, Some(&mut undo))?;
            if self.dry_run {
                // The source was not moved, so there is nothing to link over.
                self.log.dry_run(&format!(
                    "would link {} -> {}",
                    src.display(),
                    dst.display()
                ));
                return Ok(());
            }
            fs.symlink(&dst, &src, Some(&mut undo))
        })();
        undo.finish(result, &fs)?;

        self.vcs.add(&dst)?;
        if is_dir {
            let marker = self
                .resolver
                .mark_tracked(&dst, self.dry_run, self.log.as_ref())?;
            self.vcs.add(&marker)?;
        }
        self.vcs
            .commit(&format!("Tracking '{}'", path.display()), false)?;
        Ok(dst)
    }

    /// Replace the managed symlink at `path` with the content it points to,
    /// then commit the removal from the repository.
    ///
    /// Returns the repository path the content was moved out of.
    ///
    /// # Errors
    ///
    /// Returns [`HomefilesError::PathNotFound`],
    /// [`HomefilesError::NotASymlink`] or [`HomefilesError::NotManaged`]
    /// before anything is touched, a filesystem error after the change was
    /// rolled back, or a version-control error once the content is restored.
    pub fn untrack(&self, path: &Path) -> Result<PathBuf> {
        let link = paths::normalize(path);

        if !link.exists() {
            return Err(HomefilesError::PathNotFound(link));
        }
        let is_symlink = link
            .symlink_metadata()
            .is_ok_and(|m| m.file_type().is_symlink());
        if !is_symlink {
            return Err(HomefilesError::NotASymlink(link));
        }
        let content = dunce::canonicalize(&link)
            .map_err(|e| HomefilesError::io(format!("resolving {}", link.display()), e))?;
        if !content.starts_with(&self.repo) {
            return Err(HomefilesError::NotManaged(link));
        }
        self.log.stage(&format!("Untracking {}", link.display()));

        let fs = self.mutator();
        let mut undo = UndoLog::new();
        let result = (|| {
            fs.remove_symlink(&link, Some(&mut undo))?;
            if self.dry_run {
                // The symlink is still in place; only preview the move.
                self.log.dry_run(&format!(
                    "would move {} -> {}",
                    content.display(),
                    link.display()
                ));
                return Ok(());
            }
            fs.rename(&content, &link, Some(&mut undo))
        })();
        undo.finish(result, &fs)?;

        let marker = link.join(MARKER);
        if marker.is_file() {
            if self.dry_run {
                self.log
                    .dry_run(&format!("would remove {}", marker.display()));
            } else {
                std::fs::remove_file(&marker)
                    .map_err(|e| HomefilesError::io(format!("removing {}", marker.display()), e))?;
                self.log.debug(&format!("removed {}", marker.display()));
            }
        }

        self.vcs.remove(&content)?;
        self.vcs
            .commit(&format!("Untracking '{}'", path.display()), false)?;
        Ok(content)
    }
}
