//! High-level configuration structure for duet.
//!
//! This module provides the main `DuetConfig` struct and mode-override
//! merging. For loading from files and the environment, see `discovery`.

mod helpers;
mod sections;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ConfigError, Result as ConfigResult};

pub use sections::{
    CdnConfig, ClientConfig, EnvConfig, FaviconConfig, PathsConfig, ResolveConfig, ServerConfig,
    TypeCheckConfig, VendorConfig,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DuetConfig {
    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub client: ClientConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub resolve: ResolveConfig,

    #[serde(default)]
    pub env: EnvConfig,

    #[serde(default)]
    pub vendor: VendorConfig,

    #[serde(default)]
    pub typecheck: TypeCheckConfig,

    #[serde(default)]
    pub favicon: FaviconConfig,

    #[serde(default)]
    pub cdn: CdnConfig,

    /// Per-mode overrides (`development`, `production`), deep-merged over
    /// the rest of the config
    #[serde(default)]
    pub profiles: HashMap<String, Value>,
}

impl DuetConfig {
    /// Create from serde_json::Value (for programmatic config)
    ///
    /// # Example
    ///
    /// ```
    /// use duet_config::DuetConfig;
    /// use serde_json::json;
    ///
    /// let value = json!({
    ///     "client": { "public_path": "/assets/" }
    /// });
    ///
    /// let config = DuetConfig::from_value(value).unwrap();
    /// assert_eq!(config.client.public_path, "/assets/");
    /// assert_eq!(config.server.filename, "server.js");
    /// ```
    pub fn from_value(value: Value) -> ConfigResult<Self> {
        serde_json::from_value(value).map_err(|e| ConfigError::InvalidValue(e.to_string()))
    }

    /// Convert to serde_json::Value
    pub fn to_value(&self) -> ConfigResult<Value> {
        serde_json::to_value(self).map_err(|e| ConfigError::InvalidValue(e.to_string()))
    }

    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.paths.root = root.into();
        self
    }

    /// `path` resolved against the project root.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        self.paths.root.join(path)
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.resolve_path(&self.paths.manifest)
    }

    /// Schema checks only; see [`crate::FsValidator`] for file checks.
    pub fn validate(&self) -> ConfigResult<()> {
        crate::validation::validate_schema(self)
    }

    /// Apply the overrides registered for `mode`, if any.
    pub fn materialize_profile(mut self, mode: &str) -> ConfigResult<Self> {
        let Some(overrides) = self.profiles.get(mode).cloned() else {
            return Ok(self);
        };
        if overrides.is_null() {
            return Ok(self);
        }

        let profiles = std::mem::take(&mut self.profiles);
        let mut base = serde_json::to_value(&self)
            .map_err(|err| ConfigError::InvalidProfileOverride(err.to_string()))?;
        merge_values(&mut base, &overrides);

        let mut merged: DuetConfig = serde_json::from_value(base)
            .map_err(|err| ConfigError::InvalidProfileOverride(format!("{mode}: {err}")))?;
        merged.profiles = profiles;
        Ok(merged)
    }
}

fn merge_values(target: &mut Value, update: &Value) {
    match (target, update) {
        (Value::Object(target_map), Value::Object(update_map)) => {
            for (key, value) in update_map {
                merge_values(target_map.entry(key.clone()).or_insert(Value::Null), value);
            }
        }
        // Arrays and scalars replace wholesale.
        (target_slot, _) => {
            *target_slot = update.clone();
        }
    }
}
