//! Command-line surface parsed with clap.
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::Overrides;

/// Top-level CLI entry point for homefiles.
#[derive(Parser, Debug)]
#[command(
    name = "homefiles",
    about = "Synchronize dotfile bundles into your home directory with symlinks",
    version = option_env!("HOMEFILES_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Options shared by every subcommand.
    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone)]
pub struct GlobalOpts {
    /// Preview changes without applying (implies --verbose)
    #[arg(short = 'd', long, global = true)]
    pub dry_run: bool,

    /// Override the root tree symlinks are created in
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Override the bundle repository location
    #[arg(long, global = true)]
    pub repo: Option<PathBuf>,
}

impl GlobalOpts {
    /// Configuration values given on the command line.
    #[must_use]
    pub fn overrides(&self) -> Overrides {
        Overrides {
            root: self.root.clone(),
            repo: self.repo.clone(),
        }
    }
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List bundles matching this machine and the others
    Bundles,
    /// Clone a homefiles repository from GitHub user or URL
    Clone(CloneOpts),
    /// Create an empty homefiles repository
    Init,
    /// Link bundles into the root tree
    Link(LinkOpts),
    /// Commit, pull and push the repository, relinking around the pull
    Sync(SyncOpts),
    /// Move a file or directory into a bundle and link it back
    Track(TrackOpts),
    /// Remove every link created by homefiles
    Unlink,
    /// Restore a tracked file or directory from the repository
    Untrack(UntrackOpts),
    /// Print version information
    Version,
}

impl Command {
    /// Subcommand name, used to name the log file.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Bundles => "bundles",
            Self::Clone(_) => "clone",
            Self::Init => "init",
            Self::Link(_) => "link",
            Self::Sync(_) => "sync",
            Self::Track(_) => "track",
            Self::Unlink => "unlink",
            Self::Untrack(_) => "untrack",
            Self::Version => "version",
        }
    }
}

/// Options for the `clone` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct CloneOpts {
    /// GitHub user name or repository URL
    pub origin: String,
}

/// Options for the `link` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct LinkOpts {
    /// Extra bundles to link
    #[arg(short, long, value_delimiter = ',')]
    pub bundle: Vec<String>,
}

/// Options for the `sync` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct SyncOpts {
    /// Commit message for local changes
    #[arg(default_value = "Sync")]
    pub message: String,
}

/// Options for the `track` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct TrackOpts {
    /// File or directory to track
    pub path: PathBuf,

    /// Bundle to track into (defaults to Default)
    #[arg(short, long)]
    pub bundle: Option<String>,
}

/// Options for the `untrack` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct UntrackOpts {
    /// Symlink to restore
    pub path: PathBuf,
}
