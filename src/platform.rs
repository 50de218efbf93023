//! Platform detection and the `OS-*` bundle names that match it.
use std::path::Path;

/// Prefix shared by every platform-specific bundle name.
pub const OS_PREFIX: &str = "OS-";

/// Linux distribution name and version, as read from `/etc/os-release`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Distro {
    /// Distribution name, first letter capitalized (e.g. `Ubuntu`).
    pub name: String,
    /// Version identifier (e.g. `22.04`), if reported.
    pub version: Option<String>,
}

/// Platform information for the current system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    /// System family, first letter capitalized (e.g. `Linux`, `Darwin`).
    pub system: String,
    /// Distribution details on Linux-like systems.
    pub distro: Option<Distro>,
}

impl Platform {
    /// Detect the current platform.
    #[must_use]
    pub fn detect() -> Self {
        let system = system_name(std::env::consts::OS);
        let distro = if system == "Linux" {
            std::fs::read_to_string(Path::new("/etc/os-release"))
                .ok()
                .and_then(|content| parse_os_release(&content))
        } else {
            None
        };
        Self { system, distro }
    }

    /// Create a platform with explicit values.
    #[must_use]
    pub fn new(system: &str, distro: Option<Distro>) -> Self {
        Self {
            system: capitalize_first_letter(system),
            distro,
        }
    }

    /// Bundle names matching this machine, most specific first:
    /// `OS-<Distro>-<Version>`, `OS-<Distro>`, `OS-<System>`.
    #[must_use]
    pub fn bundle_identifiers(&self) -> Vec<String> {
        let mut ids = Vec::new();
        if let Some(distro) = &self.distro {
            if let Some(version) = &distro.version {
                ids.push(format!("{OS_PREFIX}{}-{version}", distro.name));
            }
            ids.push(format!("{OS_PREFIX}{}", distro.name));
        }
        ids.push(format!("{OS_PREFIX}{}", self.system));
        ids
    }
}

/// Map Rust's OS identifier to the conventional system family name.
fn system_name(os: &str) -> String {
    match os {
        "macos" => "Darwin".to_string(),
        "freebsd" => "FreeBSD".to_string(),
        "openbsd" => "OpenBSD".to_string(),
        "netbsd" => "NetBSD".to_string(),
        other => capitalize_first_letter(other),
    }
}

/// Extract the distribution from `os-release` content.
///
/// Uses `ID` (falling back to `NAME`) and `VERSION_ID`.
fn parse_os_release(content: &str) -> Option<Distro> {
    let field = |key: &str| {
        content.lines().find_map(|line| {
            let value = line.strip_prefix(key)?.strip_prefix('=')?;
            let value = value.trim().trim_matches('"').trim_matches('\'');
            (!value.is_empty()).then(|| value.to_string())
        })
    };

    let name = field("ID").or_else(|| field("NAME"))?;
    Some(Distro {
        name: capitalize_first_letter(&name),
        version: field("VERSION_ID"),
    })
}

/// Uppercase the first character and leave the rest untouched.
#[must_use]
pub fn capitalize_first_letter(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
