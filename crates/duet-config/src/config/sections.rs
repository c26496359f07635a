use std::path::PathBuf;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::config::helpers::*;
use crate::types::ChunkSelection;

/// Project layout, relative to `root`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "default_root")]
    pub root: PathBuf,

    #[serde(default = "default_manifest")]
    pub manifest: PathBuf,

    #[serde(default = "default_node_modules")]
    pub node_modules: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            manifest: default_manifest(),
            node_modules: default_node_modules(),
        }
    }
}

/// Browser build
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Entry name to the modules it starts from
    #[serde(default = "default_client_entries")]
    pub entries: IndexMap<String, Vec<String>>,

    #[serde(default = "default_client_output_dir")]
    pub output_dir: PathBuf,

    #[serde(default = "default_public_path")]
    pub public_path: String,

    /// Entry file template (hash of the whole build)
    #[serde(default = "default_client_filename")]
    pub filename: String,

    /// Split chunk template (hash of the chunk)
    #[serde(default = "default_chunk_filename")]
    pub chunk_filename: String,

    /// Image/font template, shared with the server so URLs agree
    #[serde(default = "default_asset_filename")]
    pub asset_filename: String,

    #[serde(default = "default_stats_filename")]
    pub stats_filename: String,

    #[serde(default = "default_client_main_fields")]
    pub main_fields: Vec<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            entries: default_client_entries(),
            output_dir: default_client_output_dir(),
            public_path: default_public_path(),
            filename: default_client_filename(),
            chunk_filename: default_chunk_filename(),
            asset_filename: default_asset_filename(),
            stats_filename: default_stats_filename(),
            main_fields: default_client_main_fields(),
        }
    }
}

/// Server runtime build
///
/// The server always emits a single file, so there is no chunk limit to
/// configure; unknown keys such as `max_chunks` are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    #[serde(default = "default_server_entries")]
    pub entries: IndexMap<String, Vec<String>>,

    #[serde(default = "default_server_output_dir")]
    pub output_dir: PathBuf,

    /// Fixed bundle name; the server is never browser-cached
    #[serde(default = "default_server_filename")]
    pub filename: String,

    /// Regex for packages inlined into the bundle instead of externalized
    #[serde(default = "default_internal_packages")]
    pub internal_packages: String,

    #[serde(default = "default_server_main_fields")]
    pub main_fields: Vec<String>,

    /// Also externalize whatever is installed under `paths.node_modules`
    #[serde(default = "default_true")]
    pub scan_node_modules: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            entries: default_server_entries(),
            output_dir: default_server_output_dir(),
            filename: default_server_filename(),
            internal_packages: default_internal_packages(),
            main_fields: default_server_main_fields(),
            scan_node_modules: true,
        }
    }
}

/// Module resolution shared by both builds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolveConfig {
    /// Directories searched for bare imports, in order
    #[serde(default = "default_resolve_modules")]
    pub modules: Vec<PathBuf>,

    /// Suffixes tried for extension-less imports, in order
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

impl Default for ResolveConfig {
    fn default() -> Self {
        Self {
            modules: default_resolve_modules(),
            extensions: default_extensions(),
        }
    }
}

/// Environment variables visible to client code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvConfig {
    /// Only these variables are projected into the browser bundle
    #[serde(default = "default_env_allow")]
    pub allow: Vec<String>,

    #[serde(default = "default_base_url_var")]
    pub base_url_var: String,

    #[serde(default = "default_service_name_var")]
    pub service_name_var: String,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            allow: default_env_allow(),
            base_url_var: default_base_url_var(),
            service_name_var: default_service_name_var(),
        }
    }
}

/// The client's third-party chunk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorConfig {
    #[serde(default = "default_vendor_name")]
    pub name: String,

    #[serde(default = "default_vendor_test")]
    pub test: String,

    #[serde(default)]
    pub chunks: ChunkSelection,

    #[serde(default = "default_true")]
    pub enforce: bool,

    #[serde(default = "default_vendor_priority")]
    pub priority: i32,
}

impl Default for VendorConfig {
    fn default() -> Self {
        Self {
            name: default_vendor_name(),
            test: default_vendor_test(),
            chunks: ChunkSelection::Initial,
            enforce: true,
            priority: default_vendor_priority(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeCheckConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_tsconfig")]
    pub tsconfig: PathBuf,
}

impl Default for TypeCheckConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            tsconfig: default_tsconfig(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaviconConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_favicon_logo")]
    pub logo: PathBuf,

    #[serde(default = "default_favicon_prefix")]
    pub prefix: String,
}

impl Default for FaviconConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            logo: default_favicon_logo(),
            prefix: default_favicon_prefix(),
        }
    }
}

/// Packages the client page loads from a CDN
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CdnConfig {
    #[serde(default)]
    pub packages: Vec<String>,

    /// `{package}` and `{version}` are substituted
    #[serde(default = "default_cdn_url_template")]
    pub url_template: String,
}

impl Default for CdnConfig {
    fn default() -> Self {
        Self {
            packages: Vec::new(),
            url_template: default_cdn_url_template(),
        }
    }
}
