//! Commands: track and untrack paths.
use anyhow::Result;

use crate::cli::{TrackOpts, UntrackOpts};
use crate::logging::Logger;

use super::CommandSetup;

/// Move a path into a bundle and link it back.
///
/// # Errors
///
/// Returns an error if the path is outside the root tree, missing, or the
/// move or commit failed.
pub fn track(opts: &TrackOpts, setup: &CommandSetup, log: &Logger) -> Result<()> {
    let stored = setup.engine.track(&opts.path, opts.bundle.as_deref())?;
    log.info(&format!("tracked as {}", stored.display()));
    Ok(())
}

/// Restore a tracked path from the repository.
///
/// # Errors
///
/// Returns an error if the path is not a managed symlink or the restore or
/// commit failed.
pub fn untrack(opts: &UntrackOpts, setup: &CommandSetup, log: &Logger) -> Result<()> {
    let removed = setup.engine.untrack(&opts.path)?;
    log.info(&format!("restored from {}", removed.display()));
    Ok(())
}
