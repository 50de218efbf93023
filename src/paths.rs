//! Path normalization and bundle-relative path computation.
use std::path::{Component, Path, PathBuf};

/// Expand a leading `~` to the user's home directory.
///
/// Paths that do not start with `~` are returned unchanged, as are `~user`
/// forms, which are not supported.
#[must_use]
pub fn expand_home(path: &Path) -> PathBuf {
    let mut components = path.components();
    match components.next() {
        Some(Component::Normal(first)) if first == "~" => dirs::home_dir().map_or_else(
            || path.to_path_buf(),
            |home| home.join(components.as_path()),
        ),
        _ => path.to_path_buf(),
    }
}

/// Expand `~`, make `path` absolute and resolve symlinks in its ancestors.
///
/// The final component is deliberately left unresolved so that a managed
/// symlink normalizes to its own location rather than to the repository
/// content it points at. Ancestors that do not exist yet are kept lexically.
#[must_use]
pub fn normalize(path: &Path) -> PathBuf {
    let expanded = expand_home(path);
    let absolute = if expanded.is_absolute() {
        expanded
    } else {
        std::env::current_dir().map_or(expanded.clone(), |cwd| cwd.join(&expanded))
    };
    let cleaned = lexical_clean(&absolute);

    match (cleaned.parent(), cleaned.file_name()) {
        (Some(parent), Some(name)) => dunce::canonicalize(parent)
            .map_or_else(|_| cleaned.clone(), |parent| parent.join(name)),
        _ => cleaned,
    }
}

/// Normalize a directory that is compared against, such as the root tree or
/// the repository, resolving the directory itself when it is a symlink.
#[must_use]
pub fn resolve_dir(path: &Path) -> PathBuf {
    let normalized = normalize(path);
    dunce::canonicalize(&normalized).unwrap_or(normalized)
}

/// Return the part of `path` below `base`, without a leading separator.
///
/// `base` is expected to be an ancestor of `path`; components are compared
/// one by one and everything after the shared prefix is returned.
#[must_use]
pub fn relative(base: &Path, path: &Path) -> PathBuf {
    let mut rest = path.components();
    for base_component in base.components() {
        let mut candidate = rest.clone();
        if candidate.next() != Some(base_component) {
            break;
        }
        rest = candidate;
    }
    rest.as_path().to_path_buf()
}

/// Remove `.` and resolve `..` components without touching the filesystem.
fn lexical_clean(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}
