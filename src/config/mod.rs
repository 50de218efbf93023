//! Layered configuration: command-line flags, then environment variables,
//! then the optional config file, then built-in defaults.
pub mod file;

use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::paths;
use file::FileConfig;

/// Default root tree.
pub const DEFAULT_ROOT: &str = "~";
/// Default bundle repository.
pub const DEFAULT_REPO: &str = "~/.homefiles";
/// Default remote repository name.
pub const DEFAULT_REMOTE_REPO: &str = ".homefiles";

/// Environment variable overriding the root tree.
pub const ENV_ROOT: &str = "HOMEFILES_ROOT";
/// Environment variable overriding the repository.
pub const ENV_REPO: &str = "HOMEFILES_REPO";
/// Environment variable overriding the remote repository name.
pub const ENV_REMOTE_REPO: &str = "HOMEFILES_REMOTE_REPO";
/// Environment variable pointing at an alternative config file.
pub const ENV_CONFIG: &str = "HOMEFILES_CONFIG";

/// Values given on the command line.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    /// `--root`.
    pub root: Option<PathBuf>,
    /// `--repo`.
    pub repo: Option<PathBuf>,
}

/// Fully resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Root tree, normalized.
    pub root: PathBuf,
    /// Bundle repository, normalized.
    pub repo: PathBuf,
    /// Remote repository name used to build GitHub URLs.
    pub remote_repo: String,
    /// Configured ignore patterns, applied on top of the built-in ones.
    pub ignore: Vec<String>,
}

impl Config {
    /// Resolve configuration from the process environment and the config
    /// file.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but is malformed.
    pub fn load(overrides: &Overrides) -> Result<Self> {
        let path = std::env::var_os(ENV_CONFIG)
            .map(PathBuf::from)
            .or_else(file::default_path);
        let file_config = match path {
            Some(path) => file::load_config(&paths::expand_home(&path))?,
            None => FileConfig::default(),
        };
        Ok(Self::resolve(overrides, file_config, |key| {
            std::env::var(key).ok()
        }))
    }

    /// Combine the layers; `env` looks up environment variables.
    #[must_use]
    pub fn resolve(
        overrides: &Overrides,
        file_config: FileConfig,
        env: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let env = |key: &str| env(key).filter(|v| !v.is_empty());

        let root = overrides
            .root
            .clone()
            .or_else(|| env(ENV_ROOT).map(PathBuf::from))
            .or(file_config.root)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ROOT));
        let repo = overrides
            .repo
            .clone()
            .or_else(|| env(ENV_REPO).map(PathBuf::from))
            .or(file_config.repo)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_REPO));
        let remote_repo = env(ENV_REMOTE_REPO)
            .or(file_config.remote_repo)
            .unwrap_or_else(|| DEFAULT_REMOTE_REPO.to_string());
        Self {
            root: normalize(&root),
            repo: normalize(&repo),
            remote_repo,
            ignore: file_config.ignore,
        }
    }
}

fn normalize(path: &Path) -> PathBuf {
    paths::normalize(path)
}
