//! Bundle classification and selection.
//!
//! A bundle is a top-level directory of the repository.  Its kind follows
//! from its name: exactly `Default`, prefixed `OS-`, or anything else.
pub mod ignore;
pub mod state;
pub mod walker;

use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

use crate::error::{HomefilesError, Result};
use crate::platform::OS_PREFIX;

/// Name of the bundle that applies to every machine.
pub const DEFAULT_BUNDLE: &str = "Default";

/// Version-control metadata directory excluded from the bundle list.
const VCS_DIR: &str = ".git";

/// How a bundle applies to machines, derived from its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BundleKind {
    /// The `Default` bundle, applied everywhere.
    Default,
    /// An `OS-...` bundle, applied on matching platforms.
    Platform,
    /// Anything else; applied only when explicitly selected.
    Custom,
}

impl BundleKind {
    /// Classify a bundle by its name.
    #[must_use]
    pub fn of(name: &str) -> Self {
        if name == DEFAULT_BUNDLE {
            Self::Default
        } else if name.starts_with(OS_PREFIX) {
            Self::Platform
        } else {
            Self::Custom
        }
    }
}

/// A named bundle together with its classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bundle {
    /// Directory name under the repository root.
    pub name: String,
    /// Classification derived from `name`.
    pub kind: BundleKind,
}

impl Bundle {
    /// Create a bundle, classifying it by name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let kind = BundleKind::of(&name);
        Self { name, kind }
    }
}

impl fmt::Display for Bundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Bundles split by whether they apply to the current machine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Breakdown {
    /// Default, platform-matching and recorded custom bundles.
    pub matching: BTreeSet<String>,
    /// Present bundles that do not apply here.
    pub non_matching: BTreeSet<String>,
}

impl Breakdown {
    /// Every bundle in either set, sorted.
    #[must_use]
    pub fn all(&self) -> BTreeSet<String> {
        self.matching.union(&self.non_matching).cloned().collect()
    }
}

/// Every top-level directory in `repo`, excluding version-control metadata.
///
/// A missing repository has no bundles.
///
/// # Errors
///
/// Returns an I/O error if the repository cannot be listed.
pub fn present_bundles(repo: &Path) -> Result<BTreeSet<String>> {
    if !repo.exists() {
        return Ok(BTreeSet::new());
    }

    let entries = std::fs::read_dir(repo)
        .map_err(|e| HomefilesError::io(format!("listing {}", repo.display()), e))?;

    let mut bundles = BTreeSet::new();
    for entry in entries {
        let entry =
            entry.map_err(|e| HomefilesError::io(format!("listing {}", repo.display()), e))?;
        if !entry.path().is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name != VCS_DIR {
            bundles.insert(name);
        }
    }
    Ok(bundles)
}

/// Ordered, de-duplicated bundles to apply: explicit selection first, then
/// platform identifiers from most to least specific, then `Default`.
///
/// # Errors
///
/// Returns [`HomefilesError::SelectedBundlesNotFound`] naming every explicit
/// bundle that is neither present, a platform identifier, nor `Default`.
pub fn select(
    explicit: &[String],
    present: &BTreeSet<String>,
    platform: &[String],
) -> Result<Vec<Bundle>> {
    let available =
        |name: &str| name == DEFAULT_BUNDLE || present.contains(name) || platform.iter().any(|p| p == name);

    let mut missing: Vec<String> = Vec::new();
    for name in explicit {
        if !available(name) && !missing.contains(name) {
            missing.push(name.clone());
        }
    }
    if !missing.is_empty() {
        return Err(HomefilesError::SelectedBundlesNotFound(missing));
    }

    let mut seen: BTreeSet<&str> = BTreeSet::new();
    Ok(explicit
        .iter()
        .chain(platform)
        .map(String::as_str)
        .chain(std::iter::once(DEFAULT_BUNDLE))
        .filter(|name| seen.insert(name))
        .map(Bundle::new)
        .collect())
}

/// Partition bundles into those applicable to this machine and the rest.
#[must_use]
pub fn breakdown(present: &BTreeSet<String>, platform: &[String], custom: &[String]) -> Breakdown {
    let matching: BTreeSet<String> = std::iter::once(DEFAULT_BUNDLE.to_string())
        .chain(platform.iter().cloned())
        .chain(custom.iter().cloned())
        .collect();
    let non_matching = present.difference(&matching).cloned().collect();
    Breakdown {
        matching,
        non_matching,
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn set(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| (*s).to_string()).collect()
    }

    fn strings(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| (*s).to_string()).collect()
    }

    fn names(bundles: &[Bundle]) -> Vec<&str> {
        bundles.iter().map(|b| b.name.as_str()).collect()
    }

    #[test]
    fn kind_follows_naming_convention() {
        assert_eq!(BundleKind::of("Default"), BundleKind::Default);
        assert_eq!(BundleKind::of("OS-Linux"), BundleKind::Platform);
        assert_eq!(BundleKind::of("Work"), BundleKind::Custom);
        assert_eq!(BundleKind::of("default"), BundleKind::Custom);
        assert_eq!(BundleKind::of("OS"), BundleKind::Custom);
    }

    #[test]
    fn select_without_explicit_is_platform_then_default() {
        let present = set(&["Default", "OS-Linux"]);
        let selected = select(&[], &present, &strings(&["OS-Linux"])).unwrap();
        assert_eq!(names(&selected), vec!["OS-Linux", "Default"]);
    }

    #[test]
    fn select_puts_explicit_first() {
        let present = set(&["Default", "Work"]);
        let platform = strings(&["OS-Ubuntu", "OS-Linux"]);
        let selected = select(&strings(&["Work"]), &present, &platform).unwrap();
        assert_eq!(
            names(&selected),
            vec!["Work", "OS-Ubuntu", "OS-Linux", "Default"]
        );
        assert_eq!(selected[0].kind, BundleKind::Custom);
    }

    #[test]
    fn select_ignores_duplicate_requests() {
        let present = set(&["Work"]);
        let platform = strings(&["OS-Linux"]);
        let once = select(&strings(&["Work"]), &present, &platform).unwrap();
        let twice = select(&strings(&["Work", "Work"]), &present, &platform).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn select_deduplicates_explicit_platform_and_default() {
        let platform = strings(&["OS-Linux"]);
        let selected = select(
            &strings(&["Default", "OS-Linux"]),
            &BTreeSet::new(),
            &platform,
        )
        .unwrap();
        assert_eq!(names(&selected), vec!["Default", "OS-Linux"]);
    }

    #[test]
    fn select_reports_every_missing_bundle() {
        let present = set(&["Work"]);
        let err = select(&strings(&["Work", "Nope", "Gone"]), &present, &[]).unwrap_err();
        assert!(matches!(
            err,
            HomefilesError::SelectedBundlesNotFound(ref missing) if missing == &["Nope", "Gone"]
        ));
    }

    #[test]
    fn select_accepts_platform_identifiers_not_present() {
        let selected = select(&strings(&["OS-Linux"]), &BTreeSet::new(), &strings(&["OS-Linux"]));
        assert!(selected.is_ok());
    }

    #[test]
    fn breakdown_splits_matching_from_others() {
        let present = set(&["Default", "OS-Linux", "OS-Darwin", "Work", "Laptop"]);
        let b = breakdown(&present, &strings(&["OS-Linux"]), &strings(&["Work"]));
        assert_eq!(b.matching, set(&["Default", "OS-Linux", "Work"]));
        assert_eq!(b.non_matching, set(&["Laptop", "OS-Darwin"]));
        assert_eq!(
            b.all(),
            set(&["Default", "Laptop", "OS-Darwin", "OS-Linux", "Work"])
        );
    }

    #[test]
    fn present_bundles_lists_directories_except_git() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("Default")).unwrap();
        std::fs::create_dir(dir.path().join("OS-Linux")).unwrap();
        std::fs::create_dir(dir.path().join(".git")).unwrap();
        std::fs::write(dir.path().join("README"), "").unwrap();

        assert_eq!(
            present_bundles(dir.path()).unwrap(),
            set(&["Default", "OS-Linux"])
        );
    }

    #[test]
    fn present_bundles_of_missing_repo_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(present_bundles(&dir.path().join("missing")).unwrap().is_empty());
    }
}
