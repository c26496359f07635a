use std::path::PathBuf;

use indexmap::IndexMap;

// Helper defaults
pub(crate) fn default_true() -> bool {
    true
}

pub(crate) fn default_root() -> PathBuf {
    PathBuf::from(".")
}

pub(crate) fn default_manifest() -> PathBuf {
    PathBuf::from("package.json")
}

pub(crate) fn default_node_modules() -> PathBuf {
    PathBuf::from("node_modules")
}

pub(crate) fn default_client_entries() -> IndexMap<String, Vec<String>> {
    IndexMap::from([("main".to_string(), vec!["./src/client/index.tsx".to_string()])])
}

pub(crate) fn default_server_entries() -> IndexMap<String, Vec<String>> {
    IndexMap::from([("server".to_string(), vec!["./src/server/index.ts".to_string()])])
}

pub(crate) fn default_client_output_dir() -> PathBuf {
    PathBuf::from("dist/client")
}

pub(crate) fn default_server_output_dir() -> PathBuf {
    PathBuf::from("dist/server")
}

pub(crate) fn default_public_path() -> String {
    "/static/".to_string()
}

pub(crate) fn default_client_filename() -> String {
    "[name].[hash:8].js".to_string()
}

pub(crate) fn default_chunk_filename() -> String {
    "[name].[chunkhash].js".to_string()
}

pub(crate) fn default_asset_filename() -> String {
    "[name].[hash:8].[ext]".to_string()
}

pub(crate) fn default_server_filename() -> String {
    "server.js".to_string()
}

pub(crate) fn default_stats_filename() -> String {
    "stats.json".to_string()
}

pub(crate) fn default_internal_packages() -> String {
    "lyft".to_string()
}

pub(crate) fn default_client_main_fields() -> Vec<String> {
    vec!["browser".into(), "module".into(), "main".into()]
}

pub(crate) fn default_server_main_fields() -> Vec<String> {
    vec!["module".into(), "main".into()]
}

pub(crate) fn default_resolve_modules() -> Vec<PathBuf> {
    vec![PathBuf::from("src"), PathBuf::from("node_modules")]
}

pub(crate) fn default_extensions() -> Vec<String> {
    [".ts", ".tsx", ".js", ".jsx", ".json"]
        .iter()
        .map(|ext| (*ext).to_string())
        .collect()
}

pub(crate) fn default_env_allow() -> Vec<String> {
    vec!["BASE_URL".into(), "NODE_ENV".into(), "SERVICE_NAME".into()]
}

pub(crate) fn default_base_url_var() -> String {
    "BASE_URL".to_string()
}

pub(crate) fn default_service_name_var() -> String {
    "SERVICE_NAME".to_string()
}

pub(crate) fn default_vendor_name() -> String {
    "vendor".to_string()
}

pub(crate) fn default_vendor_test() -> String {
    r"[\\/]node_modules[\\/]".to_string()
}

pub(crate) fn default_vendor_priority() -> i32 {
    10
}

pub(crate) fn default_tsconfig() -> PathBuf {
    PathBuf::from("tsconfig.json")
}

pub(crate) fn default_favicon_logo() -> PathBuf {
    PathBuf::from("src/client/favicon.png")
}

pub(crate) fn default_favicon_prefix() -> String {
    "icons-[hash]/".to_string()
}

pub(crate) fn default_cdn_url_template() -> String {
    "https://unpkg.com/{package}@{version}/umd/{package}.production.min.js".to_string()
}
