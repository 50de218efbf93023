//! Names skipped while walking bundles.
use std::ffi::OsStr;

use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::error::Result;

/// Platform junk files that are never linked.
pub const DEFAULT_IGNORE: &[&str] = &[".DS_Store"];

/// Compiled set of shell-style patterns matched against entry names.
#[derive(Debug, Clone)]
pub struct IgnoreSet {
    set: GlobSet,
}

impl IgnoreSet {
    /// Compile `patterns`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::HomefilesError::InvalidIgnorePattern`] if a
    /// pattern is not a valid glob.
    pub fn new(patterns: &[String]) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            builder.add(Glob::new(pattern)?);
        }
        Ok(Self {
            set: builder.build()?,
        })
    }

    /// Whether an entry called `name` should be skipped.
    #[must_use]
    pub fn is_ignored(&self, name: &OsStr) -> bool {
        self.set.is_match(name)
    }

    /// The built-in patterns followed by `extra`.
    ///
    /// # Errors
    ///
    /// Returns an error if one of `extra` is not a valid glob.
    pub fn with_defaults(extra: &[String]) -> Result<Self> {
        let patterns: Vec<String> = DEFAULT_IGNORE
            .iter()
            .map(|p| (*p).to_string())
            .chain(extra.iter().cloned())
            .collect();
        Self::new(&patterns)
    }
}
