//! Commands: sync, clone and init.
use std::io::{BufRead, Write};

use anyhow::Result;

use crate::cli::{CloneOpts, SyncOpts};
use crate::error::HomefilesError;

use super::CommandSetup;

const ORIGIN_PROMPT: &str = "GitHub username or URL to repo: ";

/// Commit, pull and push the repository, asking for the remote on first use.
///
/// # Errors
///
/// Returns an error if git fails, no git identity is configured, or
/// relinking failed.
pub fn sync(opts: &SyncOpts, setup: &CommandSetup) -> Result<()> {
    setup.engine.sync(&opts.message, || {
        ask(ORIGIN_PROMPT, &mut std::io::stdin().lock(), &mut std::io::stdout())
    })?;
    Ok(())
}

/// Clone a homefiles repository into the configured location.
///
/// # Errors
///
/// Returns an error if the clone is refused or the repository exists.
pub fn clone(opts: &CloneOpts, setup: &CommandSetup) -> Result<()> {
    setup.engine.clone(&opts.origin)?;
    Ok(())
}

/// Create an empty homefiles repository.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or git fails.
pub fn init(setup: &CommandSetup) -> Result<()> {
    setup.engine.init()?;
    Ok(())
}

/// Write `prompt` and read one trimmed line of answer.
fn ask(
    prompt: &str,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> crate::error::Result<String> {
    let io_err = |e| HomefilesError::io("reading the remote origin", e);
    write!(output, "{prompt}").map_err(io_err)?;
    output.flush().map_err(io_err)?;

    let mut line = String::new();
    input.read_line(&mut line).map_err(io_err)?;
    let answer = line.trim();
    if answer.is_empty() {
        return Err(HomefilesError::Config("no remote origin given".to_string()));
    }
    Ok(answer.to_string())
}
