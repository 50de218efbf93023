//! Persisted list of custom bundles most recently linked on this machine.
//!
//! Stored inside the repository's `.git` directory so it is never committed,
//! one bundle name per line.
use std::path::{Path, PathBuf};

use crate::error::{HomefilesError, Result};

/// File name of the state file within the repository metadata directory.
pub const STATE_FILE: &str = "homefiles-custom-bundles";

/// Reader and writer for the custom bundle state file.
#[derive(Debug, Clone)]
pub struct CustomBundleState {
    path: PathBuf,
}

impl CustomBundleState {
    /// State for the repository at `repo`.
    #[must_use]
    pub fn for_repo(repo: &Path) -> Self {
        Self {
            path: repo.join(".git").join(STATE_FILE),
        }
    }

    /// Location of the state file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Recorded bundle names in first-recorded order, without duplicates.
    ///
    /// A missing file is an empty state.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file exists but cannot be read.
    pub fn read(&self) -> Result<Vec<String>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(HomefilesError::io(
                    format!("reading {}", self.path.display()),
                    e,
                ));
            }
        };

        let mut names: Vec<String> = Vec::new();
        for line in content.lines().map(str::trim).filter(|l| !l.is_empty()) {
            if !names.iter().any(|n| n == line) {
                names.push(line.to_string());
            }
        }
        Ok(names)
    }

    /// Add `names` not already recorded.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be written.
    pub fn append<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> Result<()> {
        let mut recorded = self.read()?;
        let before = recorded.len();
        for name in names {
            if !recorded.iter().any(|n| n == name) {
                recorded.push(name.to_string());
            }
        }
        if recorded.len() == before {
            return Ok(());
        }
        self.write(&recorded)
    }

    /// Forget every recorded bundle.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file exists but cannot be removed.
    pub fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(HomefilesError::io(
                format!("removing {}", self.path.display()),
                e,
            )),
        }
    }

    fn write(&self, names: &[String]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                HomefilesError::io(format!("creating {}", parent.display()), e)
            })?;
        }
        let mut content = names.join("\n");
        content.push('\n');
        std::fs::write(&self.path, content)
            .map_err(|e| HomefilesError::io(format!("writing {}", self.path.display()), e))
    }
}
