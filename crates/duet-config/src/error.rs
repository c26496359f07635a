//! Error types for configuration loading and profile assembly.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    // Package manifest errors (always fatal)
    #[error("package manifest not found: {}", .0.display())]
    ManifestNotFound(PathBuf),

    #[error("failed to read package manifest {}: {source}", .path.display())]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid package manifest {}: {source}", .path.display())]
    ManifestParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    // Config parsing/loading errors
    #[error("failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("invalid config value: {0}")]
    InvalidValue(String),

    #[error("invalid profile override: {0}")]
    InvalidProfileOverride(String),

    // Schema validation errors
    #[error("no entries specified for the {0} profile")]
    NoEntries(&'static str),

    #[error("invalid pattern for {field} ({pattern:?}): {source}")]
    InvalidPattern {
        field: &'static str,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("invalid filename template for {field} ({template:?}): {reason}")]
    InvalidTemplate {
        field: &'static str,
        template: String,
        reason: String,
    },

    #[error("two chunks are named {0:?}; entry and dynamic-import names must be distinct from each other and from cache groups")]
    DuplicateChunkName(String),

    #[error("schema validation failed: {0}")]
    SchemaValidation(String),

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Load(Box::new(err))
    }
}
