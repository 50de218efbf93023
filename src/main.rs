//! `homefiles` binary entry point.
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use homefiles::cli::{Cli, Command};
use homefiles::commands::{self, CommandSetup};
use homefiles::logging::{self, Logger};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = Cli::parse();

    if matches!(args.command, Command::Version) {
        commands::version::run();
        return Ok(());
    }

    let name = args.command.name();
    logging::init_subscriber(args.verbose || args.global.dry_run, name);
    let log = Arc::new(Logger::new(name));
    let setup = CommandSetup::init(&args.global, Arc::clone(&log))?;

    match &args.command {
        Command::Bundles => commands::bundles::run(&setup),
        Command::Clone(opts) => commands::remote::clone(opts, &setup),
        Command::Init => commands::remote::init(&setup),
        Command::Link(opts) => commands::link::link(opts, &setup),
        Command::Sync(opts) => commands::remote::sync(opts, &setup),
        Command::Track(opts) => commands::track::track(opts, &setup, &log),
        Command::Unlink => commands::link::unlink(&setup),
        Command::Untrack(opts) => commands::track::untrack(opts, &setup, &log),
        Command::Version => Ok(()),
    }
}
