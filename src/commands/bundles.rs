//! Command: list bundles.
use anyhow::Result;

use crate::bundles::Breakdown;

use super::CommandSetup;

/// Print the bundles matching this machine, then the others.
///
/// # Errors
///
/// Returns an error if the repository cannot be read.
#[allow(clippy::print_stdout)]
pub fn run(setup: &CommandSetup) -> Result<()> {
    let breakdown = setup.engine.bundle_breakdown()?;
    print!("{}", format_breakdown(&breakdown));
    Ok(())
}

/// Render a [`Breakdown`] as two sorted lists.
#[must_use]
pub fn format_breakdown(breakdown: &Breakdown) -> String {
    let mut out = String::from("Match this machine:\n");
    for name in &breakdown.matching {
        out.push_str(&format!("- {name}\n"));
    }
    out.push_str("\nOthers:\n");
    for name in &breakdown.non_matching {
        out.push_str(&format!("- {name}\n"));
    }
    out
}
