//! Build-time environment projection.
//!
//! Browser bundles get a fixed set of identifiers replaced with literal
//! values at compile time. Only allow-listed variables are ever projected,
//! so server-only secrets cannot leak into client code. Server bundles read
//! their environment at run time and are left untouched.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::types::Target;

/// Value substituted for required variables that are not set.
pub const UNSET_PLACEHOLDER: &str = "__unset__";

/// Identifier replaced with `true`/`false` depending on the bundle target.
pub const SERVER_FLAG: &str = "__SERVER__";

/// Snapshot of the environment a build runs in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildEnv {
    vars: IndexMap<String, String>,
}

impl BuildEnv {
    /// Capture the current process environment. Variables that are not
    /// valid unicode are skipped.
    pub fn from_process() -> Self {
        Self::from_pairs(std::env::vars_os().filter_map(|(key, value)| {
            Some((key.into_string().ok()?, value.into_string().ok()?))
        }))
    }

    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Value of a variable the build depends on, or [`UNSET_PLACEHOLDER`].
    ///
    /// Missing inputs never fail the build so that a misconfigured
    /// environment still produces a diagnosable bundle.
    pub fn required(&self, key: &str) -> &str {
        self.get(key).unwrap_or(UNSET_PLACEHOLDER)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

/// Variables exposed to a bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "values", rename_all = "snake_case")]
pub enum EnvValues {
    /// Leave `process.env` alone; the runtime supplies it.
    PassThrough,
    /// Variable name to JSON-encoded string literal.
    Literals(IndexMap<String, String>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentProjection {
    pub values: EnvValues,
    pub is_server: bool,
}

impl EnvironmentProjection {
    /// Identifier to replacement-literal table handed to the define plugin.
    ///
    /// ```
    /// use duet_config::{BuildEnv, Target, project};
    ///
    /// let env = BuildEnv::from_pairs([("NODE_ENV", "production")]);
    /// let projection = project(&env, &["NODE_ENV".to_string()], Target::Web);
    /// let defines = projection.define_map();
    /// assert_eq!(defines["process.env.NODE_ENV"], "\"production\"");
    /// assert_eq!(defines["__SERVER__"], "false");
    /// ```
    pub fn define_map(&self) -> IndexMap<String, String> {
        let mut defines = IndexMap::new();
        if let EnvValues::Literals(values) = &self.values {
            for (key, literal) in values {
                defines.insert(format!("process.env.{key}"), literal.clone());
            }
        }
        defines.insert(SERVER_FLAG.to_string(), self.is_server.to_string());
        defines
    }

    pub fn is_pass_through(&self) -> bool {
        matches!(self.values, EnvValues::PassThrough)
    }
}

/// Project `env` for a bundle compiled for `target`.
///
/// Node bundles always get [`EnvValues::PassThrough`]. Web bundles get every
/// allow-listed variable, encoded as a JSON string literal even when the
/// value looks numeric or boolean; unset ones carry [`UNSET_PLACEHOLDER`].
pub fn project(env: &BuildEnv, allow: &[String], target: Target) -> EnvironmentProjection {
    if target.is_server() {
        return EnvironmentProjection {
            values: EnvValues::PassThrough,
            is_server: true,
        };
    }

    let values = allow
        .iter()
        .map(|key| (key.clone(), string_literal(env.required(key))))
        .collect();

    EnvironmentProjection {
        values: EnvValues::Literals(values),
        is_server: false,
    }
}

fn string_literal(value: &str) -> String {
    serde_json::Value::String(value.to_owned()).to_string()
}
