//! The bundle synchronization engine.
//!
//! [`Homefiles`] owns everything one invocation needs: the resolved root and
//! repository paths, the host platform, the ignore list, the tracked-directory
//! cache and the version-control collaborator.  Its operations are split
//! across [`link`] (link, unlink, relink), [`track`] (track, untrack) and
//! [`remote`] (sync, clone, init).
pub mod link;
pub mod remote;
pub mod track;

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

use crate::bundles::ignore::IgnoreSet;
use crate::bundles::state::CustomBundleState;
use crate::bundles::{self, Breakdown, Bundle};
use crate::config::Config;
use crate::error::Result;
use crate::git::VersionControl;
use crate::logging::Log;
use crate::paths;
use crate::platform::Platform;
use crate::tracking::TrackingResolver;
use crate::transaction::FsMutator;

/// Synchronizes bundles between the repository and the root tree.
pub struct Homefiles {
    root: PathBuf,
    repo: PathBuf,
    remote_repo: String,
    dry_run: bool,
    platform: Platform,
    ignore: IgnoreSet,
    resolver: TrackingResolver,
    state: CustomBundleState,
    vcs: Box<dyn VersionControl>,
    log: Arc<dyn Log>,
}

impl std::fmt::Debug for Homefiles {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Homefiles")
            .field("root", &self.root)
            .field("repo", &self.repo)
            .field("remote_repo", &self.remote_repo)
            .field("dry_run", &self.dry_run)
            .field("platform", &self.platform)
            .field("ignore", &self.ignore)
            .field("resolver", &self.resolver)
            .field("vcs", &"<dyn VersionControl>")
            .field("log", &"<dyn Log>")
            .finish()
    }
}

impl Homefiles {
    /// Create an engine for `config` on `platform`.
    ///
    /// # Errors
    ///
    /// Returns an error if an ignore pattern is invalid.
    pub fn new(
        config: &Config,
        platform: Platform,
        vcs: Box<dyn VersionControl>,
        log: Arc<dyn Log>,
        dry_run: bool,
    ) -> Result<Self> {
        let root = paths::resolve_dir(&config.root);
        let repo = paths::resolve_dir(&config.repo);
        Ok(Self {
            state: CustomBundleState::for_repo(&repo),
            ignore: IgnoreSet::with_defaults(&config.ignore)?,
            resolver: TrackingResolver::new(),
            remote_repo: config.remote_repo.clone(),
            root,
            repo,
            dry_run,
            platform,
            vcs,
            log,
        })
    }

    /// Bundle names matching this machine, most specific first.
    #[must_use]
    pub fn platform_identifiers(&self) -> Vec<String> {
        self.platform.bundle_identifiers()
    }

    /// Top-level bundle directories in the repository.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository cannot be listed.
    pub fn present_bundles(&self) -> Result<BTreeSet<String>> {
        bundles::present_bundles(&self.repo)
    }

    /// Bundles `link` would apply for `explicit`, in application order.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::HomefilesError::SelectedBundlesNotFound`] if
    /// any explicit bundle is unavailable.
    pub fn selected_bundles(&self, explicit: &[String]) -> Result<Vec<Bundle>> {
        bundles::select(
            explicit,
            &self.present_bundles()?,
            &self.platform_identifiers(),
        )
    }

    /// Bundles applicable to this machine and the other present bundles.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository or the state file cannot be read.
    pub fn bundle_breakdown(&self) -> Result<Breakdown> {
        Ok(bundles::breakdown(
            &self.present_bundles()?,
            &self.platform_identifiers(),
            &self.state.read()?,
        ))
    }

    fn mutator(&self) -> FsMutator<'_> {
        FsMutator::new(self.dry_run, self.log.as_ref())
    }
}
