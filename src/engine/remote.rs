//! Repository lifecycle and synchronization with the remote.
use crate::error::{HomefilesError, Result};
use crate::git::ConfigScope;

use super::Homefiles;

/// Name of the remote sync pulls from and pushes to.
pub const ORIGIN: &str = "origin";

/// Identity keys copied into the local config before unlinking.
const IDENTITY_KEYS: [&str; 2] = ["user.name", "user.email"];

impl Homefiles {
    /// URL of the remote repository for `origin`.
    ///
    /// Anything containing `://` is taken as a URL; otherwise `origin` is a
    /// GitHub user name owning a repository called after the configured
    /// remote repository name.
    #[must_use]
    pub fn make_remote_url(&self, origin: &str) -> String {
        if origin.contains("://") {
            origin.to_string()
        } else {
            format!("git@github.com:{origin}/{}.git", self.remote_repo)
        }
    }

    /// Commit local changes, pull from and push to `origin`, relinking
    /// everything around the pull.
    ///
    /// `ask_origin` is called for a GitHub user name or URL when the
    /// repository has no `origin` remote yet.
    ///
    /// # Errors
    ///
    /// Returns [`HomefilesError::MissingGitConfig`] if no git identity is
    /// configured, or the first link, unlink or version-control failure.  A
    /// failed pull is reported after relinking.
    pub fn sync<F>(&self, message: &str, ask_origin: F) -> Result<()>
    where
        F: FnOnce() -> Result<String>,
    {
        self.log.stage("Syncing with remote");

        if self.vcs.has_uncommitted_changes()? {
            self.vcs.commit(message, true)?;
        }

        if !self.dry_run {
            let remotes = self.vcs.remote_list()?;
            if !remotes.lines().any(|r| r.trim() == ORIGIN) {
                let origin = ask_origin()?;
                self.vcs
                    .add_remote(ORIGIN, &self.make_remote_url(origin.trim()))?;
            }

            // The global gitconfig may itself be a managed symlink that the
            // unlink below removes; the merge commit still needs an identity.
            for key in IDENTITY_KEYS {
                self.populate_local_gitconfig(key)?;
            }
        }

        self.unlink(false)?;
        let pulled = self.vcs.pull_origin();
        self.relink()?;
        pulled?;

        self.vcs.push_origin()?;
        Ok(())
    }

    fn populate_local_gitconfig(&self, key: &str) -> Result<()> {
        if self.vcs.read_config(key, ConfigScope::Local)?.is_some() {
            return Ok(());
        }
        let value = self
            .vcs
            .read_config(key, ConfigScope::Global)?
            .ok_or_else(|| HomefilesError::MissingGitConfig(key.to_string()))?;
        self.log.debug(&format!("copying {key} into local git config"));
        self.vcs.write_config(key, &value, ConfigScope::Local)?;
        Ok(())
    }

    /// Clone the repository for `origin` next to the configured repository
    /// path and move it into place.
    ///
    /// # Errors
    ///
    /// Returns the mapped clone failure, or an error if the clone cannot be
    /// moved to the repository path.
    pub fn clone(&self, origin: &str) -> Result<()> {
        let url = self.make_remote_url(origin);
        let parent = self
            .repo
            .parent()
            .ok_or_else(|| HomefilesError::PathNotFound(self.repo.clone()))?;
        self.log.stage(&format!("Cloning {url}"));

        let name = self.vcs.clone_repository(&url, parent)?;
        let cloned = parent.join(&name);
        if cloned == self.repo {
            return Ok(());
        }

        if self.dry_run {
            self.log.dry_run(&format!(
                "would move {} -> {}",
                cloned.display(),
                self.repo.display()
            ));
            return Ok(());
        }
        self.mutator().rename(&cloned, &self.repo, None)
    }

    /// Create an empty repository at the configured path.
    ///
    /// An existing repository is left alone with a warning.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or git fails.
    pub fn init(&self) -> Result<()> {
        if self.repo.exists() {
            self.log.warn(&format!(
                "homefiles repo already exists at '{}'",
                self.repo.display()
            ));
            return Ok(());
        }

        self.log
            .stage(&format!("Initializing {}", self.repo.display()));
        self.mutator().makedirs(&self.repo, None)?;
        self.vcs.init_repository()?;
        Ok(())
    }
}

#[cfg(all(test, unix))]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::cell::Cell;
    use std::sync::{Arc, Mutex};

    use mockall::Sequence;

    use super::super::test_support::Fixture;
    use super::*;
    use crate::error::GitError;
    use crate::git::MockVersionControl;
    use crate::platform::Platform;

    fn no_origin() -> Result<String> {
        Err(HomefilesError::Config("unexpected prompt".to_string()))
    }

    /// Mock with an origin and a local identity already configured.
    fn ready_vcs() -> MockVersionControl {
        let mut vcs = MockVersionControl::new();
        vcs.expect_has_uncommitted_changes().returning(|| Ok(false));
        vcs.expect_remote_list()
            .returning(|| Ok("origin\n".to_string()));
        vcs.expect_read_config()
            .withf(|_, scope| *scope == ConfigScope::Local)
            .returning(|_, _| Ok(Some("set".to_string())));
        vcs
    }

    #[test]
    fn remote_url_for_user_name() {
        let fx = Fixture::new();
        let hf = fx.engine(MockVersionControl::new(), false);
        assert_eq!(
            hf.make_remote_url("alice"),
            "git@github.com:alice/.homefiles.git"
        );
    }

    #[test]
    fn remote_url_passes_urls_through() {
        let fx = Fixture::new();
        let hf = fx.engine(MockVersionControl::new(), false);
        assert_eq!(
            hf.make_remote_url("https://example.com/dots.git"),
            "https://example.com/dots.git"
        );
    }

    #[test]
    fn sync_commits_pulls_relinks_and_pushes_in_order() {
        let fx = Fixture::new();
        fx.repo_file("Default/.bashrc", "");
        let mut seq = Sequence::new();
        let mut vcs = MockVersionControl::new();
        vcs.expect_has_uncommitted_changes()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(true));
        vcs.expect_commit()
            .withf(|message, all| message == "Sync" && *all)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));
        vcs.expect_remote_list()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok("origin\n".to_string()));
        vcs.expect_read_config()
            .returning(|_, _| Ok(Some("set".to_string())));
        vcs.expect_pull_origin()
            .times(1)
            .returning(|| Ok(()));
        vcs.expect_push_origin()
            .times(1)
            .returning(|| Ok(()));
        let hf = fx.engine(vcs, false);

        hf.sync("Sync", no_origin).unwrap();

        assert!(fx.root.join(".bashrc").symlink_metadata().is_ok());
    }

    #[test]
    fn sync_asks_for_origin_when_missing() {
        let fx = Fixture::new();
        let mut vcs = MockVersionControl::new();
        vcs.expect_has_uncommitted_changes().returning(|| Ok(false));
        vcs.expect_remote_list().returning(|| Ok(String::new()));
        vcs.expect_add_remote()
            .withf(|name, url| name == "origin" && url == "git@github.com:alice/.homefiles.git")
            .times(1)
            .returning(|_, _| Ok(()));
        vcs.expect_read_config()
            .returning(|_, _| Ok(Some("set".to_string())));
        vcs.expect_pull_origin().returning(|| Ok(()));
        vcs.expect_push_origin().returning(|| Ok(()));
        let hf = fx.engine(vcs, false);

        let asked = Cell::new(false);
        hf.sync("Sync", || {
            asked.set(true);
            Ok(" alice\n".to_string())
        })
        .unwrap();
        assert!(asked.get());
    }

    #[test]
    fn sync_copies_global_identity_into_local_config() {
        let fx = Fixture::new();
        let written = Arc::new(Mutex::new(Vec::new()));
        let sink = written.clone();

        let mut vcs = MockVersionControl::new();
        vcs.expect_has_uncommitted_changes().returning(|| Ok(false));
        vcs.expect_remote_list()
            .returning(|| Ok("origin\n".to_string()));
        vcs.expect_read_config().returning(|key, scope| match scope {
            ConfigScope::Local => Ok(None),
            ConfigScope::Global => Ok(Some(format!("global {key}"))),
        });
        vcs.expect_write_config()
            .withf(|_, _, scope| *scope == ConfigScope::Local)
            .returning(move |key, value, _| {
                sink.lock().unwrap().push((key.to_string(), value.to_string()));
                Ok(())
            });
        vcs.expect_pull_origin().returning(|| Ok(()));
        vcs.expect_push_origin().returning(|| Ok(()));
        let hf = fx.engine(vcs, false);

        hf.sync("Sync", no_origin).unwrap();

        assert_eq!(
            *written.lock().unwrap(),
            vec![
                ("user.name".to_string(), "global user.name".to_string()),
                ("user.email".to_string(), "global user.email".to_string()),
            ]
        );
    }

    #[test]
    fn sync_without_identity_fails_before_unlinking() {
        let fx = Fixture::new();
        fx.repo_file("Default/.bashrc", "");
        let hf = fx.engine(MockVersionControl::new(), false);
        hf.link(&[]).unwrap();
        drop(hf);

        let mut vcs = MockVersionControl::new();
        vcs.expect_has_uncommitted_changes().returning(|| Ok(false));
        vcs.expect_remote_list()
            .returning(|| Ok("origin\n".to_string()));
        vcs.expect_read_config().returning(|_, _| Ok(None));
        let hf = fx.engine(vcs, false);

        let err = hf.sync("Sync", no_origin).unwrap_err();

        assert!(matches!(err, HomefilesError::MissingGitConfig(ref key) if key == "user.name"));
        assert!(fx.root.join(".bashrc").symlink_metadata().is_ok());
    }

    #[test]
    fn sync_relinks_even_when_pull_fails() {
        let fx = Fixture::new();
        fx.repo_file("Work/.gitconfig", "");
        let hf = fx.engine(MockVersionControl::new(), false);
        hf.link(&["Work".to_string()]).unwrap();
        drop(hf);

        let mut vcs = ready_vcs();
        vcs.expect_pull_origin().times(1).returning(|| {
            Err(GitError::ProcessFailed {
                args: "pull origin master".to_string(),
                code: 1,
                stdout: String::new(),
                stderr: "conflict".to_string(),
            })
        });
        vcs.expect_push_origin().never();
        let hf = fx.engine(vcs, false);

        let err = hf.sync("Sync", no_origin).unwrap_err();

        assert!(matches!(err, HomefilesError::Git(GitError::ProcessFailed { .. })));
        assert!(fx.root.join(".gitconfig").symlink_metadata().is_ok());
        assert_eq!(hf.state.read().unwrap(), vec!["Work"]);
    }

    #[test]
    fn dry_run_sync_skips_remote_setup() {
        let fx = Fixture::new();
        let mut vcs = MockVersionControl::new();
        vcs.expect_has_uncommitted_changes().returning(|| Ok(false));
        vcs.expect_remote_list().never();
        vcs.expect_read_config().never();
        vcs.expect_pull_origin().returning(|| Ok(()));
        vcs.expect_push_origin().returning(|| Ok(()));
        let hf = fx.engine(vcs, true);

        hf.sync("Sync", no_origin).unwrap();
    }

    #[test]
    fn clone_moves_checkout_into_place() {
        let fx = Fixture::new();
        let mut config = fx.config();
        config.repo = fx.root.join("dotfiles");
        let parent = fx.root.clone();

        let mut vcs = MockVersionControl::new();
        vcs.expect_clone_repository()
            .withf(|url, _| url == "git@github.com:alice/.homefiles.git")
            .times(1)
            .returning(move |_, into| {
                std::fs::create_dir(into.join(".homefiles-clone")).unwrap();
                Ok(".homefiles-clone".to_string())
            });
        let hf = Homefiles::new(
            &config,
            Platform::new("Linux", None),
            Box::new(vcs),
            fx.log.clone(),
            false,
        )
        .unwrap();

        hf.clone("alice").unwrap();

        assert!(parent.join("dotfiles").is_dir());
        assert!(!parent.join(".homefiles-clone").exists());
    }

    #[test]
    fn clone_surfaces_mapped_errors() {
        let fx = Fixture::new();
        let mut vcs = MockVersionControl::new();
        vcs.expect_clone_repository()
            .returning(|_, _| Err(GitError::NotAuthorizedToClone));
        let hf = fx.engine(vcs, false);

        let err = hf.clone("alice").unwrap_err();
        assert_eq!(err.to_string(), "permission denied: add an SSH key to GitHub");
    }

    #[test]
    fn init_creates_repo_and_runs_git() {
        let fx = Fixture::new();
        let mut config = fx.config();
        config.repo = fx.root.join("fresh/repo");

        let mut vcs = MockVersionControl::new();
        vcs.expect_init_repository().times(1).returning(|| Ok(()));
        let hf = Homefiles::new(
            &config,
            Platform::new("Linux", None),
            Box::new(vcs),
            fx.log.clone(),
            false,
        )
        .unwrap();

        hf.init().unwrap();
        assert!(fx.root.join("fresh/repo").is_dir());
    }

    #[test]
    fn init_existing_repo_only_warns() {
        let fx = Fixture::new();
        let mut vcs = MockVersionControl::new();
        vcs.expect_init_repository().never();
        let hf = fx.engine(vcs, false);

        hf.init().unwrap();
        assert_eq!(fx.log.messages("warn").len(), 1);
    }
}
