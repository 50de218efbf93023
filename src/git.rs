//! Version-control collaborator.
//!
//! The engine only talks to version control through [`VersionControl`];
//! [`GitRepo`] implements it by running the `git` executable.
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::GitError;
use crate::exec::{ExecResult, Executor, SystemExecutor};
use crate::logging::Log;

/// Branch exchanged with `origin` during sync.
pub const SYNC_BRANCH: &str = "master";

/// Which git configuration file a key is read from or written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigScope {
    /// The repository's own `.git/config`.
    Local,
    /// The user's global configuration.
    Global,
}

impl ConfigScope {
    const fn flag(self) -> &'static str {
        match self {
            Self::Local => "--local",
            Self::Global => "--global",
        }
    }
}

/// Operations the engine needs from version control.
#[cfg_attr(test, mockall::automock)]
pub trait VersionControl {
    /// Stage `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if git fails.
    fn add(&self, path: &Path) -> Result<(), GitError>;

    /// Remove `path` (recursively) from the index.
    ///
    /// # Errors
    ///
    /// Returns an error if git fails.
    fn remove(&self, path: &Path) -> Result<(), GitError>;

    /// Commit staged changes, or every tracked change when `all` is set.
    ///
    /// # Errors
    ///
    /// Returns an error if git fails.
    fn commit(&self, message: &str, all: bool) -> Result<(), GitError>;

    /// Whether the working tree differs from `HEAD`.
    ///
    /// # Errors
    ///
    /// Returns an error if git fails.
    fn has_uncommitted_changes(&self) -> Result<bool, GitError>;

    /// Pull [`SYNC_BRANCH`] from `origin`.
    ///
    /// # Errors
    ///
    /// Returns an error if git fails.
    fn pull_origin(&self) -> Result<(), GitError>;

    /// Push [`SYNC_BRANCH`] to `origin`.
    ///
    /// # Errors
    ///
    /// Returns an error if git fails.
    fn push_origin(&self) -> Result<(), GitError>;

    /// Names of configured remotes, one per line.
    ///
    /// # Errors
    ///
    /// Returns an error if git fails.
    fn remote_list(&self) -> Result<String, GitError>;

    /// Register a remote.
    ///
    /// # Errors
    ///
    /// Returns an error if git fails.
    fn add_remote(&self, name: &str, url: &str) -> Result<(), GitError>;

    /// Clone `url` inside the directory `into` and return the name of the
    /// directory that was created there.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::NotAuthorizedToClone`],
    /// [`GitError::RepoAlreadyExists`] or another git failure.
    fn clone_repository(&self, url: &str, into: &Path) -> Result<String, GitError>;

    /// Initialise an empty repository at the repository path.
    ///
    /// # Errors
    ///
    /// Returns an error if git fails.
    fn init_repository(&self) -> Result<(), GitError>;

    /// Read `key`, or `None` if it is unset.
    ///
    /// # Errors
    ///
    /// Returns an error if git fails for another reason.
    fn read_config(&self, key: &str, scope: ConfigScope) -> Result<Option<String>, GitError>;

    /// Set `key` to `value`.
    ///
    /// # Errors
    ///
    /// Returns an error if git fails.
    fn write_config(&self, key: &str, value: &str, scope: ConfigScope) -> Result<(), GitError>;
}

/// [`VersionControl`] backed by the `git` executable.
///
/// In dry-run mode every command is logged instead of run, and queries return
/// empty results.
#[derive(Debug)]
pub struct GitRepo {
    path: PathBuf,
    executor: Arc<dyn Executor>,
    dry_run: bool,
    log: Arc<dyn Log>,
}

impl GitRepo {
    /// Repository at `path` using the system `git`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, dry_run: bool, log: Arc<dyn Log>) -> Self {
        Self::with_executor(path, Arc::new(SystemExecutor), dry_run, log)
    }

    /// Repository at `path` using a custom [`Executor`].
    #[must_use]
    pub fn with_executor(
        path: impl Into<PathBuf>,
        executor: Arc<dyn Executor>,
        dry_run: bool,
        log: Arc<dyn Log>,
    ) -> Self {
        Self {
            path: path.into(),
            executor,
            dry_run,
            log,
        }
    }

    /// Spawn git in `dir`, returning output whatever the exit status.
    fn spawn(&self, dir: &Path, args: &[&str]) -> Result<ExecResult, GitError> {
        self.log.debug(&format!("git {}", args.join(" ")));
        self.executor
            .run_in_unchecked(dir, "git", args)
            .map_err(|e| {
                if self.executor.which("git") {
                    GitError::Spawn(format!("{e:#}"))
                } else {
                    GitError::ExecutableNotFound
                }
            })
    }

    /// Run git in the repository, or log it in dry-run mode (`None`).
    fn run(&self, args: &[&str]) -> Result<Option<ExecResult>, GitError> {
        if self.dry_run {
            self.log.dry_run(&format!("would run: git {}", args.join(" ")));
            return Ok(None);
        }
        let result = self.spawn(&self.path, args)?;
        if result.success {
            Ok(Some(result))
        } else {
            Err(process_failed(args, result))
        }
    }
}

fn process_failed(args: &[&str], result: ExecResult) -> GitError {
    GitError::ProcessFailed {
        args: args.join(" "),
        code: result.code.unwrap_or(-1),
        stdout: result.stdout.trim().to_string(),
        stderr: result.stderr.trim().to_string(),
    }
}

/// Directory name `git clone <url>` creates: the last URL segment without a
/// trailing `.git`.
#[must_use]
pub fn clone_dir_name(url: &str) -> String {
    let trimmed = url.trim_end_matches('/');
    let last = trimmed
        .rsplit(['/', ':'])
        .next()
        .unwrap_or(trimmed);
    last.strip_suffix(".git").unwrap_or(last).to_string()
}

impl VersionControl for GitRepo {
    fn add(&self, path: &Path) -> Result<(), GitError> {
        self.log
            .info(&format!("adding '{}' to git", path.display()));
        self.run(&["add", &path.to_string_lossy()])?;
        Ok(())
    }

    fn remove(&self, path: &Path) -> Result<(), GitError> {
        self.log
            .info(&format!("removing '{}' from git", path.display()));
        self.run(&["rm", "-r", "-q", &path.to_string_lossy()])?;
        Ok(())
    }

    fn commit(&self, message: &str, all: bool) -> Result<(), GitError> {
        self.log.info("committing to git");
        let mut args = vec!["commit"];
        if all {
            args.push("-a");
        }
        args.extend(["-m", message]);
        self.run(&args)?;
        Ok(())
    }

    fn has_uncommitted_changes(&self) -> Result<bool, GitError> {
        Ok(self
            .run(&["diff-index", "HEAD"])?
            .is_some_and(|r| !r.stdout.trim().is_empty()))
    }

    fn pull_origin(&self) -> Result<(), GitError> {
        self.log.info("pulling origin");
        self.run(&["pull", "origin", SYNC_BRANCH])?;
        Ok(())
    }

    fn push_origin(&self) -> Result<(), GitError> {
        self.log.info("pushing origin");
        self.run(&["push", "origin", SYNC_BRANCH])?;
        Ok(())
    }

    fn remote_list(&self) -> Result<String, GitError> {
        Ok(self
            .run(&["remote"])?
            .map(|r| r.stdout)
            .unwrap_or_default())
    }

    fn add_remote(&self, name: &str, url: &str) -> Result<(), GitError> {
        self.log.info(&format!("adding remote {name} -> {url}"));
        self.run(&["remote", "add", name, url])?;
        Ok(())
    }

    fn clone_repository(&self, url: &str, into: &Path) -> Result<String, GitError> {
        self.log.info(&format!("cloning '{url}'"));
        let name = clone_dir_name(url);
        let args = ["clone", url];
        if self.dry_run {
            self.log.dry_run(&format!("would run: git {}", args.join(" ")));
            return Ok(name);
        }

        let result = self.spawn(into, &args)?;
        if result.success {
            return Ok(name);
        }
        if result.stderr.contains("Permission denied (publickey)") {
            Err(GitError::NotAuthorizedToClone)
        } else if result
            .stderr
            .contains("already exists and is not an empty directory")
        {
            Err(GitError::RepoAlreadyExists)
        } else {
            Err(process_failed(&args, result))
        }
    }

    fn init_repository(&self) -> Result<(), GitError> {
        self.log
            .info(&format!("initializing repo at '{}'", self.path.display()));
        self.run(&["init", "-q", "."])?;
        Ok(())
    }

    fn read_config(&self, key: &str, scope: ConfigScope) -> Result<Option<String>, GitError> {
        let args = ["config", scope.flag(), "--get", key];
        if self.dry_run {
            self.log.dry_run(&format!("would run: git {}", args.join(" ")));
            return Ok(None);
        }

        let result = self.spawn(&self.path, &args)?;
        match result.code {
            Some(0) => {
                let value = result.stdout.trim();
                Ok((!value.is_empty()).then(|| value.to_string()))
            }
            // Key not set.
            Some(1) => Ok(None),
            _ => Err(process_failed(&args, result)),
        }
    }

    fn write_config(&self, key: &str, value: &str, scope: ConfigScope) -> Result<(), GitError> {
        self.log.debug(&format!("configuring {key} in git"));
        self.run(&["config", scope.flag(), key, value])?;
        Ok(())
    }
}
