//! File and environment based config loading
//!
//! Layers, lowest priority first: built-in defaults, `duet.toml` (or the
//! `duet` field of `package.json`), then `DUET_`-prefixed environment
//! variables. Nested keys use `__`, e.g. `DUET_CLIENT__PUBLIC_PATH`.

use std::fs;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format as _, Serialized, Toml};
use serde_json::Value;

use crate::config::DuetConfig;
use crate::error::{ConfigError, Result};

pub const CONFIG_FILE: &str = "duet.toml";
pub const ENV_PREFIX: &str = "DUET_";

/// Where configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Toml(PathBuf),
    PackageJson(PathBuf),
    Defaults,
}

/// Layered configuration discovery rooted at a project directory
///
/// # Example
///
/// ```no_run
/// use duet_config::ConfigDiscovery;
///
/// let config = ConfigDiscovery::new(".").load().unwrap();
/// ```
pub struct ConfigDiscovery {
    root: PathBuf,
    env_prefix: String,
}

impl ConfigDiscovery {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            env_prefix: ENV_PREFIX.to_string(),
        }
    }

    /// Use a different environment prefix (mostly for tests).
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Find a config file in the root directory
    ///
    /// Searches in this order:
    /// 1. `duet.toml`
    /// 2. `package.json` with a `duet` field
    pub fn find(&self) -> ConfigSource {
        let toml_path = self.root.join(CONFIG_FILE);
        if toml_path.is_file() {
            return ConfigSource::Toml(toml_path);
        }

        let pkg_path = self.root.join("package.json");
        if let Ok(content) = fs::read_to_string(&pkg_path) {
            if let Ok(parsed) = serde_json::from_str::<Value>(&content) {
                if parsed.get("duet").is_some_and(|v| !v.is_null()) {
                    return ConfigSource::PackageJson(pkg_path);
                }
            }
        }

        ConfigSource::Defaults
    }

    /// Build the layered figment without extracting it.
    pub fn figment(&self) -> Result<Figment> {
        let mut figment = Figment::new().merge(Serialized::defaults(DuetConfig::default()));

        match self.find() {
            ConfigSource::Toml(path) => {
                tracing::debug!(path = %path.display(), "using config file");
                figment = figment.merge(Toml::file(path));
            }
            ConfigSource::PackageJson(path) => {
                tracing::debug!(path = %path.display(), "using package.json duet field");
                figment = figment.merge(Serialized::defaults(package_json_section(&path)?));
            }
            ConfigSource::Defaults => {
                tracing::debug!(root = %self.root.display(), "no config file, using defaults");
            }
        }

        Ok(figment.merge(Env::prefixed(&self.env_prefix).split("__")))
    }

    /// Load the configuration. `paths.root` defaults to the discovery root
    /// unless a layer sets it explicitly.
    pub fn load(&self) -> Result<DuetConfig> {
        let figment = self.figment()?;
        let root_overridden = figment.find_value("paths.root").is_ok_and(|v| {
            v.as_str()
                .is_some_and(|s| Path::new(s) != DuetConfig::default().paths.root)
        });

        let mut config: DuetConfig = figment.extract()?;
        if !root_overridden {
            config.paths.root = self.root.clone();
        } else if config.paths.root.is_relative() {
            config.paths.root = self.root.join(&config.paths.root);
        }
        Ok(config)
    }

    /// Load and apply the overrides for `mode`.
    pub fn load_with_profile(&self, mode: &str) -> Result<DuetConfig> {
        self.load()?.materialize_profile(mode)
    }
}

fn package_json_section(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path)?;
    let parsed: Value = serde_json::from_str(&content)
        .map_err(|e| ConfigError::InvalidValue(format!("{}: {e}", path.display())))?;
    match parsed.get("duet") {
        Some(Value::Object(section)) => Ok(Value::Object(section.clone())),
        _ => Err(ConfigError::InvalidValue(
            "the `duet` field of package.json must be an object".to_string(),
        )),
    }
}
