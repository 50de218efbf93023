//! Commands: link and unlink bundles.
use anyhow::Result;

use crate::cli::LinkOpts;

use super::CommandSetup;

/// Link the bundles for this machine plus any requested with `--bundle`.
///
/// # Errors
///
/// Returns an error if a requested bundle is missing or linking failed and
/// was rolled back.
pub fn link(opts: &LinkOpts, setup: &CommandSetup) -> Result<()> {
    setup.engine.link(&opts.bundle)?;
    Ok(())
}

/// Remove every link pointing into the repository and forget the custom
/// bundles that were linked.
///
/// # Errors
///
/// Returns an error if unlinking failed and was rolled back.
pub fn unlink(setup: &CommandSetup) -> Result<()> {
    setup.engine.unlink(true)?;
    Ok(())
}
