//! Optional TOML configuration file.
use anyhow::{Context, Result};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// Values that may be set in `config.toml`; every key is optional.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Root tree symlinks are created in.
    pub root: Option<PathBuf>,
    /// Bundle repository.
    pub repo: Option<PathBuf>,
    /// Remote repository name used to build GitHub URLs.
    pub remote_repo: Option<String>,
    /// Extra ignore patterns appended to the built-in ones.
    pub ignore: Vec<String>,
}

/// Default location: `$XDG_CONFIG_HOME/homefiles/config.toml`.
#[must_use]
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("homefiles").join("config.toml"))
}

/// Deserialize a TOML file; a missing file yields the type's empty value.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_config<T: DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.exists() {
        return toml::from_str("").context("Failed to create empty config");
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let config: FileConfig = load_config(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, FileConfig::default());
    }

    #[test]
    fn parses_every_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "root = \"/home/alice\"\nrepo = \"~/dots\"\nremote_repo = \"dots\"\nignore = [\"*.swp\"]\n",
        )
        .unwrap();

        let config: FileConfig = load_config(&path).unwrap();
        assert_eq!(config.root, Some(PathBuf::from("/home/alice")));
        assert_eq!(config.repo, Some(PathBuf::from("~/dots")));
        assert_eq!(config.remote_repo.as_deref(), Some("dots"));
        assert_eq!(config.ignore, vec!["*.swp"]);
    }

    #[test]
    fn malformed_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "root = [").unwrap();
        let err = load_config::<FileConfig>(&path).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse TOML config"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "roots = \"/\"\n").unwrap();
        assert!(load_config::<FileConfig>(&path).is_err());
    }
}
