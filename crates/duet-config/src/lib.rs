pub mod config;
pub mod discovery;
pub mod env;
pub mod error;
pub mod externals;
pub mod manifest;
pub mod output;
pub mod plan;
pub mod plugin;
pub mod profile;
pub mod rules;
pub mod stats;
pub mod types;
pub mod validation;
pub mod version;

// Re-export main types
pub use config::*;
pub use env::{BuildEnv, EnvValues, EnvironmentProjection, UNSET_PLACEHOLDER, project};
pub use error::*;
pub use externals::{ExternalsPolicy, ExternalsRule, package_name};
pub use manifest::PackageManifest;
pub use output::{CacheGroup, FilenameTemplate, OutputPolicy, SplitPolicy, clean_output_dir};
pub use plan::{BuildPlan, ChunkKind, ChunkPlanner, ModuleOrigin, PlannedChunk, SourceModule};
pub use plugin::PluginDescriptor;
pub use profile::{BuildProfile, ProfileAssembler, ProfilePair, ResolutionPolicy, load_profiles};
pub use stats::StatsManifest;
pub use types::*;
pub use version::{CdnScript, cdn_scripts, sanitize_version};

// Re-export discovery and validation
pub use discovery::{ConfigDiscovery, ConfigSource};
pub use validation::{ConfigValidator, FsValidator, SchemaValidator, validate_fs, validate_schema};
