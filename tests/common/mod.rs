// Shared helpers for integration tests.
//
// Provides a temporary root tree with a bundle repository inside it, a
// version-control double that records what the engine asked for, and a
// silent logger, so each integration test can drive `Homefiles` against a
// real filesystem without touching git.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use homefiles::config::Config;
use homefiles::engine::Homefiles;
use homefiles::error::Result;
use homefiles::error::GitError;
use homefiles::git::{ConfigScope, VersionControl};
use homefiles::logging::Log;
use homefiles::platform::Platform;
use homefiles::tracking::MARKER;

/// A [`Log`] that discards everything.
#[derive(Debug, Default)]
pub struct SilentLog;

impl Log for SilentLog {
    fn stage(&self, _msg: &str) {}
    fn info(&self, _msg: &str) {}
    fn debug(&self, _msg: &str) {}
    fn warn(&self, _msg: &str) {}
    fn error(&self, _msg: &str) {}
    fn dry_run(&self, _msg: &str) {}
}

/// A [`VersionControl`] that succeeds at everything and records each call
/// as a short string such as `add /tmp/x` or `commit Tracking '...'`.
#[derive(Debug, Clone, Default)]
pub struct RecordingVcs {
    calls: Arc<Mutex<Vec<String>>>,
}

impl RecordingVcs {
    /// Calls recorded so far.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("vcs calls").clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().expect("vcs calls").push(call);
    }
}

impl VersionControl for RecordingVcs {
    fn add(&self, path: &Path) -> std::result::Result<(), GitError> {
        self.record(format!("add {}", path.display()));
        Ok(())
    }

    fn remove(&self, path: &Path) -> std::result::Result<(), GitError> {
        self.record(format!("remove {}", path.display()));
        Ok(())
    }

    fn commit(&self, message: &str, _all: bool) -> std::result::Result<(), GitError> {
        self.record(format!("commit {message}"));
        Ok(())
    }

    fn has_uncommitted_changes(&self) -> std::result::Result<bool, GitError> {
        Ok(false)
    }

    fn pull_origin(&self) -> std::result::Result<(), GitError> {
        self.record("pull".to_string());
        Ok(())
    }

    fn push_origin(&self) -> std::result::Result<(), GitError> {
        self.record("push".to_string());
        Ok(())
    }

    fn remote_list(&self) -> std::result::Result<String, GitError> {
        Ok("origin\n".to_string())
    }

    fn add_remote(&self, name: &str, url: &str) -> std::result::Result<(), GitError> {
        self.record(format!("remote add {name} {url}"));
        Ok(())
    }

    fn clone_repository(&self, url: &str, _into: &Path) -> std::result::Result<String, GitError> {
        self.record(format!("clone {url}"));
        Ok(homefiles::git::clone_dir_name(url))
    }

    fn init_repository(&self) -> std::result::Result<(), GitError> {
        self.record("init".to_string());
        Ok(())
    }

    fn read_config(
        &self,
        _key: &str,
        _scope: ConfigScope,
    ) -> std::result::Result<Option<String>, GitError> {
        Ok(Some("someone".to_string()))
    }

    fn write_config(
        &self,
        _key: &str,
        _value: &str,
        _scope: ConfigScope,
    ) -> std::result::Result<(), GitError> {
        Ok(())
    }
}

/// An isolated root tree backed by a [`tempfile::TempDir`], with the
/// repository at `<root>/.homefiles`.
///
/// The directory is automatically deleted when dropped.
#[derive(Debug)]
pub struct IntegrationTestContext {
    _dir: tempfile::TempDir,
    /// Root tree links are created in.
    pub root: PathBuf,
    /// Bundle repository.
    pub repo: PathBuf,
    /// Version-control double shared with every engine built here.
    pub vcs: RecordingVcs,
}

impl IntegrationTestContext {
    /// Create a new context with an empty repository.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let base = dunce::canonicalize(dir.path()).expect("canonicalize temp dir");
        let root = base.join("home");
        let repo = root.join(".homefiles");
        std::fs::create_dir_all(repo.join(".git")).expect("create repo");
        Self {
            _dir: dir,
            root,
            repo,
            vcs: RecordingVcs::default(),
        }
    }

    /// Write a file into the repository at `rel`, creating parents.
    #[must_use]
    pub fn with_file(self, rel: &str, content: &str) -> Self {
        write(&self.repo.join(rel), content);
        self
    }

    /// Mark the repository directory `rel` as tracked.
    #[must_use]
    pub fn with_tracked_dir(self, rel: &str) -> Self {
        write(&self.repo.join(rel).join(MARKER), "");
        self
    }

    /// Write a file into the root tree at `rel`, creating parents.
    pub fn root_file(&self, rel: &str, content: &str) -> PathBuf {
        write(&self.root.join(rel), content)
    }

    /// Path `rel` inside the root tree.
    pub fn in_root(&self, rel: &str) -> PathBuf {
        self.root.join(rel)
    }

    /// Path `rel` inside the repository.
    pub fn in_repo(&self, rel: &str) -> PathBuf {
        self.repo.join(rel)
    }

    /// Build an engine running on Linux.
    pub fn engine(&self) -> Homefiles {
        self.engine_with(false)
    }

    /// Build an engine running on Linux, optionally in dry-run mode.
    pub fn engine_with(&self, dry_run: bool) -> Homefiles {
        let config = Config {
            root: self.root.clone(),
            repo: self.repo.clone(),
            remote_repo: ".homefiles".to_string(),
            ignore: Vec::new(),
        };
        Homefiles::new(
            &config,
            Platform::new("Linux", None),
            Box::new(self.vcs.clone()),
            Arc::new(SilentLog),
            dry_run,
        )
        .expect("build engine")
    }

    /// Link the default selection.
    pub fn link(&self) -> Result<()> {
        self.engine().link(&[])
    }
}

/// Whether `path` is a symlink pointing at `target`.
pub fn links_to(path: &Path, target: &Path) -> bool {
    std::fs::read_link(path).is_ok_and(|t| t == target)
}

/// Whether `path` is itself a symlink.
pub fn is_symlink(path: &Path) -> bool {
    path.symlink_metadata()
        .is_ok_and(|m| m.file_type().is_symlink())
}

fn write(path: &Path, content: &str) -> PathBuf {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent");
    }
    std::fs::write(path, content).expect("write file");
    path.to_path_buf()
}
