//! Mirroring bundles into the root tree and removing them again.
use crate::bundles::{Bundle, BundleKind, walker};
use crate::error::Result;
use crate::transaction::{FsMutator, UndoLog};

use super::Homefiles;

impl Homefiles {
    /// Link `bundle` into the root tree, recording every change on `undo`.
    ///
    /// Tracked subdirectories become one symlink, other subdirectories become
    /// real directories, and every file becomes a symlink.  Destinations that
    /// are already symlinks are left alone, so the first bundle to claim a
    /// path wins.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::HomefilesError::NotASymlink`] if a destination
    /// is real content, or any walk or I/O failure.
    pub fn link_bundle(&self, bundle: &Bundle, fs: &FsMutator<'_>, undo: &mut UndoLog) -> Result<()> {
        self.log.info(&format!("linking bundle {bundle}"));
        let bundle_root = self.repo.join(&bundle.name);

        for walked in walker::walk(&bundle_root, &self.resolver, &self.ignore) {
            let walked = walked?;
            let dst_dir = self.root.join(&walked.relative);

            for name in &walked.subdirs {
                let src = walked.path.join(name);
                let dst = dst_dir.join(name);
                if self.resolver.is_tracked(&src) {
                    fs.symlink(&src, &dst, Some(undo))?;
                } else {
                    fs.mkdir(&dst, Some(undo))?;
                }
            }

            for name in &walked.files {
                fs.symlink(&walked.path.join(name), &dst_dir.join(name), Some(undo))?;
            }
        }
        Ok(())
    }

    /// Link the bundles selected for `explicit` as one transaction.
    ///
    /// Custom bundles are recorded in the state file once everything
    /// succeeded.
    ///
    /// # Errors
    ///
    /// Returns the selection error before anything is touched, or the first
    /// failure after every change made so far was rolled back.
    pub fn link(&self, explicit: &[String]) -> Result<()> {
        let bundles = self.selected_bundles(explicit)?;
        self.log.stage("Linking bundles");

        let fs = self.mutator();
        let mut undo = UndoLog::new();
        let result = bundles
            .iter()
            .try_for_each(|bundle| self.link_bundle(bundle, &fs, &mut undo));
        undo.finish(result, &fs)?;

        let custom: Vec<&str> = bundles
            .iter()
            .filter(|b| b.kind == BundleKind::Custom)
            .map(|b| b.name.as_str())
            .collect();
        if self.dry_run {
            if !custom.is_empty() {
                self.log
                    .dry_run(&format!("would record custom bundles: {}", custom.join(", ")));
            }
        } else {
            self.state.append(custom)?;
        }
        Ok(())
    }

    /// Remove the symlinks `bundle` placed in the root tree.
    ///
    /// Real directories created while linking are left in place.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::HomefilesError::NotASymlink`] if a destination
    /// is real content, or any walk or I/O failure.
    pub fn unlink_bundle(&self, bundle: &Bundle, fs: &FsMutator<'_>, undo: &mut UndoLog) -> Result<()> {
        self.log.info(&format!("unlinking bundle {bundle}"));
        let bundle_root = self.repo.join(&bundle.name);

        for walked in walker::walk(&bundle_root, &self.resolver, &self.ignore) {
            let walked = walked?;
            let dst_dir = self.root.join(&walked.relative);

            for name in &walked.subdirs {
                if self.resolver.is_tracked(&walked.path.join(name)) {
                    fs.remove_symlink(&dst_dir.join(name), Some(undo))?;
                }
            }

            for name in &walked.files {
                fs.remove_symlink(&dst_dir.join(name), Some(undo))?;
            }
        }
        Ok(())
    }

    /// Unlink every bundle that may have been linked on this machine, in
    /// sorted order, as one transaction.
    ///
    /// # Errors
    ///
    /// Returns the first failure after every change made so far was rolled
    /// back, or an error clearing the state file.
    pub fn unlink(&self, clear_custom_state: bool) -> Result<()> {
        let names = self.bundle_breakdown()?.all();
        self.log.stage("Unlinking bundles");

        let fs = self.mutator();
        let mut undo = UndoLog::new();
        let result = names
            .iter()
            .map(Bundle::new)
            .try_for_each(|bundle| self.unlink_bundle(&bundle, &fs, &mut undo));
        undo.finish(result, &fs)?;

        if clear_custom_state {
            if self.dry_run {
                self.log.dry_run("would clear recorded custom bundles");
            } else {
                self.state.clear()?;
            }
        }
        Ok(())
    }

    /// Link again the recorded custom bundles that still exist, together with
    /// the platform and `Default` bundles.
    ///
    /// # Errors
    ///
    /// Returns any failure from [`link`](Self::link).
    pub fn relink(&self) -> Result<()> {
        let custom: Vec<String> = self
            .state
            .read()?
            .into_iter()
            .filter(|name| self.repo.join(name).is_dir())
            .collect();
        self.log
            .info(&format!("relinking custom bundles: {}", custom.join(", ")));
        self.link(&custom)
    }
}
