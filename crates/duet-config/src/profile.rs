//! Client and server build profiles.
//!
//! [`ProfileAssembler`] turns a config, an environment snapshot and the
//! package manifest into the two profiles the bundler consumes. Assembly is
//! pure: reading files and logging happen in the caller ([`load_profiles`]
//! and [`ProfilePair::log_summary`]).

use std::path::PathBuf;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::config::DuetConfig;
use crate::env::{BuildEnv, EnvironmentProjection, project};
use crate::error::Result;
use crate::externals::{ExternalsPolicy, ExternalsRule, installed_packages};
use crate::manifest::PackageManifest;
use crate::output::{CacheGroup, OutputPolicy, SplitPolicy};
use crate::plan::ChunkPlanner;
use crate::plugin::{self, PluginDescriptor};
use crate::rules::{ModuleRule, module_rules};
use crate::types::{LibraryTarget, Mode, Target};
use crate::validation::{compile_pattern, parse_template, validate_schema};
use crate::version::{CdnScript, cdn_scripts};

pub const CLIENT_PROFILE: &str = "client";
pub const SERVER_PROFILE: &str = "server";

/// The server bundle is always one file.
pub const SERVER_MAX_CHUNKS: usize = 1;

const DEV_DEVTOOL: &str = "cheap-module-source-map";

/// How bare imports are found
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionPolicy {
    /// Searched in order for unprefixed imports
    pub modules: Vec<PathBuf>,

    /// Tried in order when an import omits its extension
    pub extensions: Vec<String>,

    /// Manifest fields consulted, in order, to pick a package's entry file
    pub main_fields: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildProfile {
    pub name: String,
    pub target: Target,
    pub mode: Mode,
    pub entries: IndexMap<String, Vec<String>>,
    pub resolve: ResolutionPolicy,
    pub rules: Vec<ModuleRule>,
    pub output: OutputPolicy,
    pub split: SplitPolicy,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub externals: Option<ExternalsRule>,

    pub env: EnvironmentProjection,
    pub plugins: Vec<PluginDescriptor>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub devtool: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cdn_scripts: Vec<CdnScript>,
}

impl BuildProfile {
    /// Planner for this profile; externals, if any, are left out of the plan.
    pub fn planner(&self) -> Result<ChunkPlanner<'_>> {
        Ok(ChunkPlanner::new(&self.output, &self.split)?.with_externals(self.externals_policy()?))
    }

    /// Compiled externals; `None` for profiles that bundle everything.
    pub fn externals_policy(&self) -> Result<Option<ExternalsPolicy>> {
        self.externals.as_ref().map(ExternalsRule::compile).transpose()
    }

    pub fn plugin(&self, name: &str) -> Option<&PluginDescriptor> {
        self.plugins.iter().find(|p| p.name() == name)
    }
}

/// Both profiles of one build invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfilePair {
    pub client: BuildProfile,
    pub server: BuildProfile,

    /// Inputs echoed for reporting; unset variables hold the placeholder
    pub base_url: String,
    pub service_name: String,
}

impl ProfilePair {
    pub fn get(&self, target: Target) -> &BuildProfile {
        match target {
            Target::Web => &self.client,
            Target::Node => &self.server,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &BuildProfile> {
        [&self.client, &self.server].into_iter()
    }

    /// Report the assembled configuration through `tracing`.
    pub fn log_summary(&self) {
        tracing::info!(
            service = %self.service_name,
            base_url = %self.base_url,
            mode = self.client.mode.as_str(),
            "assembled build profiles"
        );
        for profile in self.iter() {
            tracing::info!(
                profile = %profile.name,
                target = profile.target.as_str(),
                output = %profile.output.path.display(),
                filename = %profile.output.filename,
                entries = profile.entries.len(),
                plugins = profile.plugins.len(),
                "profile"
            );
            tracing::debug!(profile = %profile.name, defines = ?profile.env.define_map());
        }
    }
}

/// Pure assembly of a [`ProfilePair`].
pub struct ProfileAssembler<'a> {
    config: &'a DuetConfig,
    env: &'a BuildEnv,
    manifest: &'a PackageManifest,
    installed: Vec<String>,
}

impl<'a> ProfileAssembler<'a> {
    pub fn new(config: &'a DuetConfig, env: &'a BuildEnv, manifest: &'a PackageManifest) -> Self {
        Self {
            config,
            env,
            manifest,
            installed: Vec::new(),
        }
    }

    /// Packages found on disk, externalized alongside the manifest's.
    pub fn with_installed_packages(mut self, installed: Vec<String>) -> Self {
        self.installed = installed;
        self
    }

    pub fn mode(&self) -> Mode {
        Mode::from_node_env(self.env.get("NODE_ENV"))
    }

    pub fn assemble(&self) -> Result<ProfilePair> {
        validate_schema(self.config)?;

        Ok(ProfilePair {
            client: self.client()?,
            server: self.server()?,
            base_url: self.env.required(&self.config.env.base_url_var).to_string(),
            service_name: self.env.required(&self.config.env.service_name_var).to_string(),
        })
    }

    pub fn client(&self) -> Result<BuildProfile> {
        let config = self.config;
        let mode = self.mode();
        let output = OutputPolicy {
            path: config.resolve_path(&config.client.output_dir),
            public_path: config.client.public_path.clone(),
            filename: parse_template("client.filename", &config.client.filename)?,
            chunk_filename: parse_template("client.chunk_filename", &config.client.chunk_filename)?,
            clean: true,
            library_target: LibraryTarget::Var,
        };

        compile_pattern("vendor.test", &config.vendor.test)?;
        let split = SplitPolicy {
            cache_groups: vec![CacheGroup {
                name: config.vendor.name.clone(),
                test: config.vendor.test.clone(),
                chunks: config.vendor.chunks,
                enforce: config.vendor.enforce,
                priority: config.vendor.priority,
            }],
            max_chunks: None,
        };

        let env = project(self.env, &config.env.allow, Target::Web);

        let mut plugins = vec![plugin::clean(output.path.clone())];
        if config.typecheck.enabled {
            plugins.push(self.type_check(mode));
        }
        if config.favicon.enabled {
            plugins.push(plugin::favicon(
                config.resolve_path(&config.favicon.logo),
                &config.favicon.prefix,
                self.env.required(&config.env.service_name_var),
            ));
        }
        plugins.push(plugin::stats_writer(&config.client.stats_filename));
        plugins.push(plugin::define(&env));

        Ok(BuildProfile {
            name: CLIENT_PROFILE.to_string(),
            target: Target::Web,
            mode,
            entries: config.client.entries.clone(),
            resolve: self.resolution(&config.client.main_fields),
            rules: self.rules(Target::Web)?,
            output,
            split,
            externals: None,
            env,
            plugins,
            devtool: devtool(mode),
            cdn_scripts: cdn_scripts(self.manifest, &config.cdn.packages, &config.cdn.url_template),
        })
    }

    pub fn server(&self) -> Result<BuildProfile> {
        let config = self.config;
        let mode = self.mode();
        let output = OutputPolicy {
            path: config.resolve_path(&config.server.output_dir),
            // Assets referenced from server-rendered markup must match the client's URLs.
            public_path: config.client.public_path.clone(),
            filename: parse_template("server.filename", &config.server.filename)?,
            chunk_filename: parse_template("server.filename", &config.server.filename)?,
            clean: false,
            library_target: LibraryTarget::Commonjs2,
        };

        let externals = ExternalsRule::collect(
            self.manifest,
            self.installed.iter().cloned(),
            &config.server.internal_packages,
        );
        externals.compile()?;

        let env = project(self.env, &config.env.allow, Target::Node);

        let mut plugins = Vec::new();
        if config.typecheck.enabled {
            plugins.push(self.type_check(mode));
        }
        plugins.push(plugin::limit_chunk_count(SERVER_MAX_CHUNKS));
        plugins.push(plugin::define(&env));

        Ok(BuildProfile {
            name: SERVER_PROFILE.to_string(),
            target: Target::Node,
            mode,
            entries: config.server.entries.clone(),
            resolve: self.resolution(&config.server.main_fields),
            rules: self.rules(Target::Node)?,
            output,
            split: SplitPolicy {
                cache_groups: Vec::new(),
                max_chunks: Some(SERVER_MAX_CHUNKS),
            },
            externals: Some(externals),
            env,
            plugins,
            devtool: devtool(mode),
            cdn_scripts: Vec::new(),
        })
    }

    fn resolution(&self, main_fields: &[String]) -> ResolutionPolicy {
        let config = self.config;
        let modules = config
            .resolve
            .modules
            .iter()
            .map(|dir| {
                // The dependency directory stays bare so it is looked up hierarchically.
                if *dir == config.paths.node_modules {
                    dir.clone()
                } else {
                    config.resolve_path(dir)
                }
            })
            .collect();

        ResolutionPolicy {
            modules,
            extensions: config.resolve.extensions.clone(),
            main_fields: main_fields.to_vec(),
        }
    }

    fn rules(&self, target: Target) -> Result<Vec<ModuleRule>> {
        let asset = parse_template("client.asset_filename", &self.config.client.asset_filename)?;
        let tsconfig = self.config.typecheck.tsconfig.to_string_lossy();
        Ok(module_rules(target, &tsconfig, &asset))
    }

    fn type_check(&self, mode: Mode) -> PluginDescriptor {
        plugin::type_check(
            self.config.resolve_path(&self.config.typecheck.tsconfig),
            mode == Mode::Development,
        )
    }
}

fn devtool(mode: Mode) -> Option<String> {
    match mode {
        Mode::Development => Some(DEV_DEVTOOL.to_string()),
        Mode::Production => None,
    }
}

/// Read the manifest, scan installed packages and assemble both profiles.
///
/// This is the I/O-performing entry point; a missing or malformed manifest
/// aborts before anything is assembled.
pub fn load_profiles(config: &DuetConfig, env: &BuildEnv) -> Result<ProfilePair> {
    let manifest = PackageManifest::load(&config.manifest_path())?;
    let installed = if config.server.scan_node_modules {
        installed_packages(&config.resolve_path(&config.paths.node_modules))
    } else {
        Vec::new()
    };

    ProfileAssembler::new(config, env, &manifest)
        .with_installed_packages(installed)
        .assemble()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assemble(env: &[(&str, &str)]) -> ProfilePair {
        let config = DuetConfig::default().with_root("/app");
        let env = BuildEnv::from_pairs(env.iter().copied());
        let manifest = PackageManifest::from_json(
            r#"{ "dependencies": { "express": "^4.17.1", "@lyft/kit": "1.0.0" } }"#,
        )
        .unwrap();
        ProfileAssembler::new(&config, &env, &manifest)
            .assemble()
            .unwrap()
    }

    #[test]
    fn client_profile_shape() {
        let pair = assemble(&[("NODE_ENV", "production")]);
        let client = &pair.client;

        assert_eq!(client.target, Target::Web);
        assert_eq!(client.mode, Mode::Production);
        assert_eq!(client.output.path, PathBuf::from("/app/dist/client"));
        assert_eq!(client.output.filename.as_str(), "[name].[hash:8].js");
        assert_eq!(client.output.chunk_filename.as_str(), "[name].[chunkhash].js");
        assert!(client.output.clean);
        assert_eq!(client.resolve.main_fields, vec!["browser", "module", "main"]);
        assert_eq!(
            client.resolve.modules,
            vec![PathBuf::from("/app/src"), PathBuf::from("node_modules")]
        );
        assert!(client.devtool.is_none());
        assert!(client.externals.is_none());

        let vendor = &client.split.cache_groups[0];
        assert_eq!(vendor.name, "vendor");
        assert_eq!(vendor.priority, 10);
        assert!(vendor.enforce);
    }

    #[test]
    fn client_plugins_in_order() {
        let pair = assemble(&[]);
        let names: Vec<_> = pair.client.plugins.iter().map(|p| p.name()).collect();
        assert_eq!(
            names,
            vec!["clean", "type_check", "favicon", "stats_writer", "define"]
        );
    }

    #[test]
    fn server_profile_shape() {
        let pair = assemble(&[("NODE_ENV", "development")]);
        let server = &pair.server;

        assert_eq!(server.target, Target::Node);
        assert_eq!(server.output.filename.as_str(), "server.js");
        assert!(!server.output.filename.has_hash());
        assert_eq!(server.output.library_target, LibraryTarget::Commonjs2);
        assert_eq!(server.split.max_chunks, Some(1));
        assert!(server.split.cache_groups.is_empty());
        assert_eq!(server.devtool.as_deref(), Some(DEV_DEVTOOL));
        assert!(matches!(
            server.plugin("limit_chunk_count"),
            Some(PluginDescriptor::LimitChunkCount { max_chunks: 1 })
        ));

        let externals = server.externals_policy().unwrap().unwrap();
        assert!(externals.is_external("express"));
        assert!(!externals.is_external("@lyft/kit"));
    }

    #[test]
    fn unset_inputs_use_placeholder() {
        let pair = assemble(&[]);
        assert_eq!(pair.base_url, crate::env::UNSET_PLACEHOLDER);
        assert_eq!(pair.service_name, crate::env::UNSET_PLACEHOLDER);
        assert!(matches!(
            pair.client.plugin("favicon"),
            Some(PluginDescriptor::Favicon { title, .. }) if title == crate::env::UNSET_PLACEHOLDER
        ));

        let defines = pair.client.env.define_map();
        assert_eq!(defines["process.env.BASE_URL"], "\"__unset__\"");
        assert_eq!(defines["process.env.SERVICE_NAME"], "\"__unset__\"");
    }

    #[test]
    fn assembly_is_repeatable() {
        let env = [("NODE_ENV", "production"), ("BASE_URL", "https://x.com")];
        assert_eq!(assemble(&env), assemble(&env));
    }
}
