//! Pluggable config validation strategies
//!
//! Separates filesystem validation (for CLI use) from schema validation
//! (for library use).

use std::path::{Path, PathBuf};

use regex::Regex;

use crate::config::DuetConfig;
use crate::error::{ConfigError, Result};
use crate::output::FilenameTemplate;

/// Trait for pluggable config validation strategies
pub trait ConfigValidator {
    fn validate(&self, config: &DuetConfig) -> Result<()>;
}

/// Schema-only validation (no filesystem checks)
///
/// # Example
///
/// ```
/// use duet_config::{ConfigValidator, DuetConfig, SchemaValidator};
///
/// SchemaValidator.validate(&DuetConfig::default()).unwrap();
/// ```
pub struct SchemaValidator;

impl ConfigValidator for SchemaValidator {
    fn validate(&self, config: &DuetConfig) -> Result<()> {
        check_entries("client", config.client.entries.values())?;
        check_entries("server", config.server.entries.values())?;

        parse_template("client.filename", &config.client.filename)?;
        parse_template("client.chunk_filename", &config.client.chunk_filename)?;
        parse_template("client.asset_filename", &config.client.asset_filename)?;
        let server = parse_template("server.filename", &config.server.filename)?;
        if server.has_hash() {
            return Err(ConfigError::InvalidTemplate {
                field: "server.filename",
                template: config.server.filename.clone(),
                reason: "the server bundle name must not contain a hash".to_string(),
            });
        }

        compile_pattern("vendor.test", &config.vendor.test)?;
        compile_pattern("server.internal_packages", &config.server.internal_packages)?;

        if config.client.entries.contains_key(&config.vendor.name) {
            return Err(ConfigError::DuplicateChunkName(config.vendor.name.clone()));
        }

        if config.resolve.extensions.is_empty() {
            return Err(ConfigError::SchemaValidation(
                "resolve.extensions cannot be empty".to_string(),
            ));
        }
        if let Some(bad) = config.resolve.extensions.iter().find(|ext| !ext.starts_with('.')) {
            return Err(ConfigError::SchemaValidation(format!(
                "resolve extension {bad:?} must start with '.'"
            )));
        }

        if let Some(bad) = config.env.allow.iter().find(|key| !is_env_name(key)) {
            return Err(ConfigError::SchemaValidation(format!(
                "env.allow entry {bad:?} is not a valid variable name"
            )));
        }

        if config.client.stats_filename.trim().is_empty() {
            return Err(ConfigError::SchemaValidation(
                "client.stats_filename cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

/// Filesystem validator (for CLI use)
///
/// Runs schema validation, then checks that the manifest, entry modules and
/// plugin inputs exist under the project root.
pub struct FsValidator {
    root: PathBuf,
}

impl FsValidator {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn require(&self, path: &Path) -> Result<()> {
        let full = self.root.join(path);
        if full.exists() {
            Ok(())
        } else {
            Err(ConfigError::SchemaValidation(format!(
                "{} does not exist",
                full.display()
            )))
        }
    }
}

impl ConfigValidator for FsValidator {
    fn validate(&self, config: &DuetConfig) -> Result<()> {
        SchemaValidator.validate(config)?;

        let manifest = self.root.join(&config.paths.manifest);
        if !manifest.is_file() {
            return Err(ConfigError::ManifestNotFound(manifest));
        }

        for module in config
            .client
            .entries
            .values()
            .chain(config.server.entries.values())
            .flatten()
        {
            self.require(Path::new(module))?;
        }

        if config.typecheck.enabled {
            self.require(&config.typecheck.tsconfig)?;
        }
        if config.favicon.enabled {
            self.require(&config.favicon.logo)?;
        }

        Ok(())
    }
}

pub fn validate_schema(config: &DuetConfig) -> Result<()> {
    SchemaValidator.validate(config)
}

pub fn validate_fs(config: &DuetConfig, root: impl AsRef<Path>) -> Result<()> {
    FsValidator::new(root).validate(config)
}

pub(crate) fn parse_template(field: &'static str, raw: &str) -> Result<FilenameTemplate> {
    FilenameTemplate::parse(raw).map_err(|err| ConfigError::InvalidTemplate {
        field,
        template: raw.to_string(),
        reason: err.to_string(),
    })
}

pub(crate) fn compile_pattern(field: &'static str, pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
        field,
        pattern: pattern.to_string(),
        source,
    })
}

fn check_entries<'a>(
    profile: &'static str,
    mut entries: impl Iterator<Item = &'a Vec<String>>,
) -> Result<()> {
    if entries.all(|modules| modules.is_empty()) {
        return Err(ConfigError::NoEntries(profile));
    }
    Ok(())
}

fn is_env_name(key: &str) -> bool {
    let mut chars = key.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
