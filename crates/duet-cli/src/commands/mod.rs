//! Command implementations.

mod check;
mod plan;
mod profile;

use std::path::{Path, PathBuf};

use duet_config::{BuildEnv, ConfigDiscovery, DuetConfig, Mode};

use crate::error::Result;

pub use check::execute as check_execute;
pub use plan::execute as plan_execute;
pub use profile::execute as profile_execute;

/// Configuration and environment shared by every command.
pub struct Session {
    pub root: PathBuf,
    pub env: BuildEnv,
    pub config: DuetConfig,
}

impl Session {
    /// Snapshot the process environment and load the config under `root`
    /// with the overrides for the current `NODE_ENV` applied.
    pub fn load(root: &Path) -> Result<Self> {
        let root = std::path::absolute(root)?;
        let env = BuildEnv::from_process();
        let mode = Mode::from_node_env(env.get("NODE_ENV"));

        let discovery = ConfigDiscovery::new(&root);
        tracing::debug!(root = %root.display(), source = ?discovery.find(), mode = mode.as_str(), "loading configuration");
        let config = discovery.load_with_profile(mode.as_str())?;

        Ok(Self { root, env, config })
    }
}
