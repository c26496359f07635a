//! Server-side externalization.
//!
//! The server bundle leaves host-provided packages as runtime `require`s
//! instead of inlining them. Packages matching the `allow` pattern (internal
//! packages that ship untranspiled source) are always inlined.

use std::collections::BTreeSet;
use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::manifest::PackageManifest;

/// Serializable description of the externalization rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalsRule {
    /// Packages resolved by the host at load time
    pub packages: BTreeSet<String>,

    /// Requests matching this pattern are bundled even if listed above
    pub allow: String,

    /// Treat `node:`-prefixed builtins as external
    pub builtins: bool,
}

/// Compiled form of [`ExternalsRule`].
#[derive(Debug, Clone)]
pub struct ExternalsPolicy {
    packages: BTreeSet<String>,
    allow: Regex,
    builtins: bool,
}

impl ExternalsRule {
    /// Externals are every package the manifest names plus `installed`
    /// (usually from [`installed_packages`]).
    pub fn collect(
        manifest: &PackageManifest,
        installed: impl IntoIterator<Item = String>,
        allow: &str,
    ) -> Self {
        let mut packages: BTreeSet<String> = manifest.package_names().map(str::to_owned).collect();
        packages.extend(installed);
        Self {
            packages,
            allow: allow.to_string(),
            builtins: true,
        }
    }

    pub fn compile(&self) -> Result<ExternalsPolicy> {
        let allow = Regex::new(&self.allow).map_err(|source| ConfigError::InvalidPattern {
            field: "server.internal_packages",
            pattern: self.allow.clone(),
            source,
        })?;
        Ok(ExternalsPolicy {
            packages: self.packages.clone(),
            allow,
            builtins: self.builtins,
        })
    }
}

impl ExternalsPolicy {
    /// Whether `request` should be left for the runtime to resolve.
    pub fn is_external(&self, request: &str) -> bool {
        if self.allow.is_match(request) {
            return false;
        }
        if request.starts_with("node:") {
            return self.builtins;
        }
        match package_name(request) {
            Some(name) => self.packages.contains(name),
            None => false,
        }
    }
}

/// Package part of a bare import specifier, scope included.
///
/// Returns `None` for relative and absolute requests.
pub fn package_name(request: &str) -> Option<&str> {
    if request.is_empty() || request.starts_with('.') || request.starts_with('/') {
        return None;
    }
    let mut slashes = request.match_indices('/').map(|(i, _)| i);
    let end = if request.starts_with('@') {
        slashes.nth(1)
    } else {
        slashes.next()
    };
    Some(match end {
        Some(end) => &request[..end],
        None => request,
    })
}

/// Package owning a resolved module path, taken from its innermost
/// `node_modules` directory. Returns `None` for project sources.
pub fn module_package(id: &str) -> Option<String> {
    const DIR: &str = "node_modules";
    let is_sep = |c: char| c == '/' || c == '\\';

    let start = id
        .match_indices(DIR)
        .map(|(i, _)| i)
        .filter(|&i| {
            let before = id[..i].chars().next_back();
            let after = id[i + DIR.len()..].chars().next();
            before.is_none_or(is_sep) && after.is_some_and(is_sep)
        })
        .last()?;

    let mut parts = id[start + DIR.len() + 1..].split(is_sep);
    let first = parts.next().filter(|p| !p.is_empty())?;
    if first.starts_with('@') {
        let second = parts.next().filter(|p| !p.is_empty())?;
        Some(format!("{first}/{second}"))
    } else {
        Some(first.to_string())
    }
}

/// Package names installed under a `node_modules` directory, scopes
/// expanded. A missing directory yields nothing.
pub fn installed_packages(dir: &Path) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut names = Vec::new();
    for entry in entries.flatten() {
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }
        if name.starts_with('@') {
            if let Ok(scoped) = std::fs::read_dir(entry.path()) {
                for inner in scoped.flatten() {
                    names.push(format!("{}/{}", name, inner.file_name().to_string_lossy()));
                }
            }
        } else {
            names.push(name);
        }
    }
    names
}
