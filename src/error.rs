//! Domain-specific error types for the homefiles engine.
//!
//! This module provides a structured error hierarchy using [`thiserror`].
//! Engine modules return [`HomefilesError`] while command handlers at the CLI
//! boundary convert it to [`anyhow::Error`] via the standard `?` operator.
//!
//! # Error hierarchy
//!
//! ```text
//! HomefilesError
//! ├── SelectedBundlesNotFound: requested bundle absent, nothing applied
//! ├── NotASymlink            : managed path is real user content
//! ├── PathOutsideRoot        : track requested outside the root tree
//! ├── RollbackFailed         : undo replay failed after another error
//! └── Git(GitError)          : version-control collaborator failures
//! ```

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Convenience alias used throughout the engine.
pub type Result<T, E = HomefilesError> = std::result::Result<T, E>;

/// Top-level error type for the homefiles engine.
#[derive(Error, Debug)]
pub enum HomefilesError {
    /// One or more explicitly requested bundles do not exist.
    #[error("could not find these bundles: {}", .0.join(", "))]
    SelectedBundlesNotFound(Vec<String>),

    /// A path that should be a managed symlink is a real file or directory.
    #[error("path '{}' is not a symlink", .0.display())]
    NotASymlink(PathBuf),

    /// `track` was asked for a path outside the managed root tree.
    #[error("cannot track '{}': not inside root '{}'", path.display(), root.display())]
    PathOutsideRoot {
        /// Path that was requested.
        path: PathBuf,
        /// Configured root tree.
        root: PathBuf,
    },

    /// `track` was asked for content that already lives in the repository,
    /// usually reached through a tracked-directory symlink.
    #[error("cannot track '{}': already inside the homefiles repo", .0.display())]
    AlreadyTracked(PathBuf),

    /// A path the operation depends on does not exist.
    #[error("path '{}' not found", .0.display())]
    PathNotFound(PathBuf),

    /// `untrack` was asked for a symlink that does not point into the repository.
    #[error("path '{}' is not managed by the homefiles repo", .0.display())]
    NotManaged(PathBuf),

    /// A move would overwrite an existing path.
    #[error("path '{}' already exists", .0.display())]
    AlreadyExists(PathBuf),

    /// An ignore pattern from the configuration is not a valid glob.
    #[error("invalid ignore pattern: {0}")]
    InvalidIgnorePattern(#[from] globset::Error),

    /// A filesystem call failed.
    #[error("{context}: {source}")]
    Io {
        /// What the engine was doing.
        context: String,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Directory traversal of a bundle failed.
    #[error("walking bundle: {0}")]
    Walk(#[from] walkdir::Error),

    /// The configuration file could not be read or parsed.
    #[error("configuration error: {0}")]
    Config(String),

    /// A git identity key has no value in either the local or global config.
    #[error("unable to find '{0}' in global git config")]
    MissingGitConfig(String),

    /// The version-control collaborator failed.
    #[error(transparent)]
    Git(#[from] GitError),

    /// Replaying the undo log failed; the tree may be partially modified.
    #[error("rollback failed ({rollback}) while recovering from: {original}")]
    RollbackFailed {
        /// Error raised by the inverse operation.
        rollback: Box<HomefilesError>,
        /// Error that triggered the rollback.
        original: Box<HomefilesError>,
    },
}

impl HomefilesError {
    /// Wrap an [`io::Error`] with a description of the failed action.
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

/// Errors surfaced by the version-control collaborator.
#[derive(Error, Debug)]
pub enum GitError {
    /// `git` is not installed or not on `PATH`.
    #[error("git needs to be installed first")]
    ExecutableNotFound,

    /// The remote refused the clone (typically a missing SSH key).
    #[error("permission denied: add an SSH key to GitHub")]
    NotAuthorizedToClone,

    /// The clone destination already exists and is not empty.
    #[error("homefiles repo already exists")]
    RepoAlreadyExists,

    /// `git` exited with an unexpected status.
    #[error("git {args} failed (exit {code}): {stderr}")]
    ProcessFailed {
        /// Space-joined argument list.
        args: String,
        /// Exit code, `-1` when terminated by a signal.
        code: i32,
        /// Captured standard output.
        stdout: String,
        /// Captured standard error.
        stderr: String,
    },

    /// `git` could not be started for a reason other than being missing.
    #[error("failed to execute git: {0}")]
    Spawn(String),
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn selected_bundles_not_found_lists_names() {
        let e = HomefilesError::SelectedBundlesNotFound(vec!["Work".into(), "Laptop".into()]);
        assert_eq!(e.to_string(), "could not find these bundles: Work, Laptop");
    }

    #[test]
    fn not_a_symlink_display() {
        let e = HomefilesError::NotASymlink(PathBuf::from("/home/u/.vimrc"));
        assert_eq!(e.to_string(), "path '/home/u/.vimrc' is not a symlink");
    }

    #[test]
    fn path_outside_root_names_both_paths() {
        let e = HomefilesError::PathOutsideRoot {
            path: PathBuf::from("/etc/hosts"),
            root: PathBuf::from("/home/u"),
        };
        assert!(e.to_string().contains("/etc/hosts"));
        assert!(e.to_string().contains("/home/u"));
    }

    #[test]
    fn already_tracked_display() {
        let e = HomefilesError::AlreadyTracked(PathBuf::from("/home/u/.homefiles/Default/.vim/x"));
        assert_eq!(
            e.to_string(),
            "cannot track '/home/u/.homefiles/Default/.vim/x': already inside the homefiles repo"
        );
    }

    #[test]
    fn io_has_source() {
        use std::error::Error as StdError;
        let e = HomefilesError::io(
            "creating directory /x",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(e.source().is_some());
        assert!(e.to_string().starts_with("creating directory /x"));
    }

    #[test]
    fn git_errors_are_transparent() {
        let e: HomefilesError = GitError::RepoAlreadyExists.into();
        assert_eq!(e.to_string(), "homefiles repo already exists");
        let e: HomefilesError = GitError::ExecutableNotFound.into();
        assert_eq!(e.to_string(), "git needs to be installed first");
    }

    #[test]
    fn rollback_failed_mentions_original() {
        let e = HomefilesError::RollbackFailed {
            rollback: Box::new(HomefilesError::PathNotFound(PathBuf::from("/a"))),
            original: Box::new(HomefilesError::NotASymlink(PathBuf::from("/b"))),
        };
        let msg = e.to_string();
        assert!(msg.contains("'/a' not found"));
        assert!(msg.contains("'/b' is not a symlink"));
    }

    #[test]
    fn process_failed_display() {
        let e = GitError::ProcessFailed {
            args: "pull origin master".to_string(),
            code: 1,
            stdout: String::new(),
            stderr: "fatal: no remote".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "git pull origin master failed (exit 1): fatal: no remote"
        );
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn all_error_types_are_send_sync() {
        assert_send_sync::<HomefilesError>();
        assert_send_sync::<GitError>();
    }

    #[test]
    fn homefiles_error_converts_to_anyhow() {
        let e = HomefilesError::PathNotFound(PathBuf::from("/x"));
        let _anyhow_err: anyhow::Error = e.into();
    }
}
