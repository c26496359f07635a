//! Package manifest (`package.json`) access.
//!
//! The manifest is read exactly once per build. Failing to read or parse it
//! aborts profile construction before any build work starts.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageManifest {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub version: Option<String>,

    #[serde(default)]
    pub dependencies: IndexMap<String, String>,

    #[serde(default)]
    pub dev_dependencies: IndexMap<String, String>,

    #[serde(default)]
    pub peer_dependencies: IndexMap<String, String>,
}

impl PackageManifest {
    /// Read and parse the manifest at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| {
            if source.kind() == ErrorKind::NotFound {
                ConfigError::ManifestNotFound(path.to_path_buf())
            } else {
                ConfigError::ManifestRead {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        let manifest = Self::from_json(&content).map_err(|source| ConfigError::ManifestParse {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::debug!(
            path = %path.display(),
            dependencies = manifest.dependencies.len(),
            "loaded package manifest"
        );
        Ok(manifest)
    }

    pub fn from_json(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(content)
    }

    /// Declared version range of `package`, looking at runtime dependencies
    /// before dev and peer dependencies.
    pub fn version_of(&self, package: &str) -> Option<&str> {
        self.dependencies
            .get(package)
            .or_else(|| self.dev_dependencies.get(package))
            .or_else(|| self.peer_dependencies.get(package))
            .map(String::as_str)
    }

    /// Every package name the manifest mentions, deduplicated.
    pub fn package_names(&self) -> impl Iterator<Item = &str> {
        let mut seen = indexmap::IndexSet::new();
        self.dependencies
            .keys()
            .chain(self.dev_dependencies.keys())
            .chain(self.peer_dependencies.keys())
            .filter(move |name| seen.insert(name.as_str()))
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn load_reports_missing_manifest() {
        let dir = TempDir::new().unwrap();
        let err = PackageManifest::load(&dir.path().join("package.json")).unwrap_err();
        assert!(matches!(err, ConfigError::ManifestNotFound(_)));
    }

    #[test]
    fn load_reports_invalid_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("package.json");
        fs::write(&path, "{ not json").unwrap();
        let err = PackageManifest::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ManifestParse { .. }));
    }

    #[test]
    fn version_of_prefers_runtime_dependencies() {
        let manifest = PackageManifest::from_json(
            r#"{
                "dependencies": { "react": "^16.0.0" },
                "devDependencies": { "react": "^17.0.0", "typescript": "~4.1.0" }
            }"#,
        )
        .unwrap();

        assert_eq!(manifest.version_of("react"), Some("^16.0.0"));
        assert_eq!(manifest.version_of("typescript"), Some("~4.1.0"));
        assert_eq!(manifest.version_of("vue"), None);
    }

    #[test]
    fn package_names_are_deduplicated() {
        let manifest = PackageManifest::from_json(
            r#"{
                "dependencies": { "express": "4", "react": "16" },
                "peerDependencies": { "react": "16" }
            }"#,
        )
        .unwrap();

        let names: Vec<_> = manifest.package_names().collect();
        assert_eq!(names, vec!["express", "react"]);
    }
}
