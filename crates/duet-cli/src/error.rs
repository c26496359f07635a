//! Error types for the `duet` binary.
//!
//! Library errors are wrapped unchanged; [`cli_error_to_miette`] turns the
//! final error into a report with a hint where one helps.

use std::path::PathBuf;

use duet_config::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    /// Loading, validating or assembling configuration failed
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The module listing given to `plan` could not be read
    #[error("Failed to read module listing {}: {source}", .path.display())]
    ModulesRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The module listing given to `plan` is not valid JSON
    #[error("Invalid module listing {}: {source}", .path.display())]
    ModulesParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = CliError> = std::result::Result<T, E>;

/// Convert a [`CliError`] into a miette report.
pub fn cli_error_to_miette(err: CliError) -> miette::Report {
    match err {
        CliError::Config(ConfigError::ManifestNotFound(path)) => miette::miette!(
            "Package manifest not found: {}\n\nHint: run duet from the project root or pass --root",
            path.display()
        ),
        CliError::Config(e @ ConfigError::InvalidPattern { .. }) => miette::miette!(
            "Configuration error: {}\n\nHint: patterns use Rust regex syntax",
            e
        ),
        CliError::Config(e) => miette::miette!("Configuration error: {}", e),
        CliError::ModulesParse { path, source } => miette::miette!(
            "Invalid module listing {}: {}\n\nHint: expected a JSON array of {{ \"id\", \"source\", \"origin\" }} objects",
            path.display(),
            source
        ),
        _ => miette::miette!("{}", err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_manifest_report_carries_hint() {
        let err = CliError::from(ConfigError::ManifestNotFound(PathBuf::from("/app/package.json")));
        let report = cli_error_to_miette(err).to_string();
        assert!(report.contains("/app/package.json"));
        assert!(report.contains("--root"));
    }

    #[test]
    fn config_errors_are_wrapped_transparently() {
        let err = CliError::from(ConfigError::InvalidValue("bad".to_string()));
        assert_eq!(
            err.to_string(),
            ConfigError::InvalidValue("bad".to_string()).to_string()
        );
    }
}
