use serde::{Deserialize, Serialize};

/// Platform a profile compiles for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    /// Browser bundle
    Web,
    /// Server runtime bundle
    Node,
}

impl Target {
    pub fn is_server(self) -> bool {
        matches!(self, Self::Node)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Web => "web",
            Self::Node => "node",
        }
    }
}

/// Build mode, derived from `NODE_ENV`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Development,
    Production,
}

impl Mode {
    /// Anything other than `production` builds in development mode.
    pub fn from_node_env(value: Option<&str>) -> Self {
        match value {
            Some("production") => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }
}

/// Which chunks a cache group may pull modules out of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChunkSelection {
    /// Only modules loaded with the initial page
    #[default]
    Initial,
    /// Only modules behind a dynamic import
    Async,
    /// Both
    All,
}

/// Module format of the emitted bundle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LibraryTarget {
    /// Plain script for `<script>` tags
    #[default]
    Var,
    /// `module.exports = ...`, loaded synchronously by the server runtime
    Commonjs2,
}
