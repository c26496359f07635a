//! Plugin descriptors handed to the bundler.
//!
//! Each profile assembly calls these factories, so two builds never share a
//! plugin instance.

use std::path::PathBuf;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::env::EnvironmentProjection;

/// Stats fields the server's asset-tag injection reads.
pub const STATS_FIELDS: [&str; 5] = [
    "chunks",
    "publicPath",
    "assets",
    "assetsByChunkName",
    "assetsByChunkId",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "plugin", rename_all = "snake_case")]
pub enum PluginDescriptor {
    /// Empty the output directory before emitting
    Clean { paths: Vec<PathBuf> },

    /// Out-of-process TypeScript type checking
    TypeCheck {
        tsconfig: PathBuf,
        /// Report errors without blocking emit
        non_blocking: bool,
    },

    /// Generate favicons and touch icons from one logo
    Favicon {
        logo: PathBuf,
        prefix: String,
        title: String,
    },

    /// Write the stats manifest
    StatsWriter {
        filename: String,
        fields: Vec<String>,
    },

    /// Replace identifiers with literals at build time
    Define { definitions: IndexMap<String, String> },

    /// Cap the number of emitted chunks
    LimitChunkCount { max_chunks: usize },
}

impl PluginDescriptor {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Clean { .. } => "clean",
            Self::TypeCheck { .. } => "type_check",
            Self::Favicon { .. } => "favicon",
            Self::StatsWriter { .. } => "stats_writer",
            Self::Define { .. } => "define",
            Self::LimitChunkCount { .. } => "limit_chunk_count",
        }
    }
}

pub fn clean(output_dir: PathBuf) -> PluginDescriptor {
    PluginDescriptor::Clean {
        paths: vec![output_dir],
    }
}

pub fn type_check(tsconfig: PathBuf, non_blocking: bool) -> PluginDescriptor {
    PluginDescriptor::TypeCheck {
        tsconfig,
        non_blocking,
    }
}

pub fn favicon(logo: PathBuf, prefix: &str, title: &str) -> PluginDescriptor {
    PluginDescriptor::Favicon {
        logo,
        prefix: prefix.to_string(),
        title: title.to_string(),
    }
}

pub fn stats_writer(filename: &str) -> PluginDescriptor {
    PluginDescriptor::StatsWriter {
        filename: filename.to_string(),
        fields: STATS_FIELDS.iter().map(|f| (*f).to_string()).collect(),
    }
}

pub fn define(projection: &EnvironmentProjection) -> PluginDescriptor {
    PluginDescriptor::Define {
        definitions: projection.define_map(),
    }
}

pub fn limit_chunk_count(max_chunks: usize) -> PluginDescriptor {
    PluginDescriptor::LimitChunkCount { max_chunks }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{BuildEnv, project};
    use crate::types::Target;

    #[test]
    fn factories_return_independent_values() {
        let mut first = stats_writer("stats.json");
        let second = stats_writer("stats.json");
        if let PluginDescriptor::StatsWriter { fields, .. } = &mut first {
            fields.clear();
        }
        assert_ne!(first, second);
    }

    #[test]
    fn define_carries_server_flag() {
        let env = BuildEnv::from_pairs([("NODE_ENV", "production")]);
        let plugin = define(&project(&env, &[], Target::Node));
        let PluginDescriptor::Define { definitions } = plugin else {
            panic!("expected define plugin");
        };
        assert_eq!(definitions["__SERVER__"], "true");
    }

    #[test]
    fn serializes_with_plugin_tag() {
        let value = serde_json::to_value(limit_chunk_count(1)).unwrap();
        assert_eq!(value["plugin"], "limit_chunk_count");
        assert_eq!(value["max_chunks"], 1);
    }
}
