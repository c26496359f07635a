use std::path::Path;

use duet_config::{
    BuildPlan, BuildProfile, PluginDescriptor, SourceModule, StatsManifest, clean_output_dir,
    load_profiles,
};
use serde_json::{Map, Value};

use crate::cli::PlanArgs;
use crate::commands::Session;
use crate::error::{CliError, Result};
use crate::ui;

/// Plan chunk output for the listed modules and print the plan(s).
///
/// With `--write`, output directories whose profile asks for cleaning are
/// emptied, and profiles carrying a stats writer get their manifest.
pub fn execute(args: PlanArgs, session: &Session) -> Result<()> {
    let modules = read_modules(&args.modules)?;
    let pair = load_profiles(&session.config, &session.env)?;

    let mut plans = Map::new();
    for target in args.target.targets() {
        let profile = pair.get(*target);
        let plan = profile.planner()?.plan(&modules)?;
        tracing::info!(
            profile = %profile.name,
            hash = %plan.hash,
            chunks = plan.chunks.len(),
            externals = plan.externals.len(),
            "planned chunks"
        );

        if args.write {
            write_outputs(profile, &plan)?;
        }
        plans.insert(profile.name.clone(), serde_json::to_value(&plan)?);
    }

    let output = if plans.len() == 1 {
        plans.into_iter().next().map(|(_, plan)| plan).unwrap_or(Value::Null)
    } else {
        Value::Object(plans)
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn read_modules(path: &Path) -> Result<Vec<SourceModule>> {
    let content = std::fs::read_to_string(path).map_err(|source| CliError::ModulesRead {
        path: path.to_path_buf(),
        source,
    })?;
    let modules: Vec<SourceModule> =
        serde_json::from_str(&content).map_err(|source| CliError::ModulesParse {
            path: path.to_path_buf(),
            source,
        })?;
    if modules.is_empty() {
        ui::warning("module listing is empty; only the hash is meaningful");
    }
    Ok(modules)
}

fn write_outputs(profile: &BuildProfile, plan: &BuildPlan) -> Result<()> {
    if profile.output.clean {
        clean_output_dir(&profile.output.path)?;
    }
    if let Some(PluginDescriptor::StatsWriter { filename, .. }) = profile.plugin("stats_writer") {
        let stats = StatsManifest::from_plan(plan, &profile.output.public_path);
        let path = stats.write(&profile.output.path, filename)?;
        ui::success(&format!("Wrote {}", path.display()));
    }
    Ok(())
}
