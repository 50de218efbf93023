//! Subcommand orchestration.
//!
//! Each submodule exposes a `run` function taking the parsed options and the
//! shared [`CommandSetup`]; they convert engine errors to [`anyhow::Error`].
pub mod bundles;
pub mod link;
pub mod remote;
pub mod track;
pub mod version;

use std::sync::Arc;

use anyhow::{Context as _, Result};

use crate::cli::GlobalOpts;
use crate::config::Config;
use crate::engine::Homefiles;
use crate::git::GitRepo;
use crate::logging::{Log, Logger};
use crate::paths;
use crate::platform::Platform;

/// Shared state produced by the common command setup sequence.
///
/// Encapsulates configuration loading, platform detection, and engine
/// construction so that each command does not have to repeat the
/// boilerplate.
#[derive(Debug)]
pub struct CommandSetup {
    /// Resolved configuration.
    pub config: Config,
    /// Engine built from the configuration.
    pub engine: Homefiles,
}

impl CommandSetup {
    /// Load configuration, detect the platform, and build the engine.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file fails to parse or an ignore
    /// pattern is invalid.
    pub fn init(global: &GlobalOpts, log: Arc<Logger>) -> Result<Self> {
        let config = Config::load(&global.overrides())?;
        let platform = Platform::detect();

        log.debug(&format!("root: {}", config.root.display()));
        log.debug(&format!("repo: {}", config.repo.display()));
        log.debug(&format!(
            "platform bundles: {}",
            platform.bundle_identifiers().join(", ")
        ));
        if let Some(path) = log.log_path() {
            log.debug(&format!("log file: {}", path.display()));
        }

        let log: Arc<dyn Log> = log;
        let vcs = GitRepo::new(
            paths::resolve_dir(&config.repo),
            global.dry_run,
            Arc::clone(&log),
        );
        let engine = Homefiles::new(&config, platform, Box::new(vcs), log, global.dry_run)
            .context("Failed to set up homefiles")?;

        Ok(Self { config, engine })
    }
}
