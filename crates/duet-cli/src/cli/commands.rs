use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::cli::enums::TargetArg;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the assembled build profiles as JSON
    ///
    /// Loads duet.toml (or package.json's "duet" field), applies DUET_*
    /// environment overrides and the overrides for the current NODE_ENV,
    /// then prints the selected profiles on stdout.
    Profile(ProfileArgs),

    /// Plan chunk output for a module listing
    ///
    /// Reads a JSON array of modules ({ "id", "source", "origin" }) and
    /// prints which file each chunk is emitted as.
    Plan(PlanArgs),

    /// Validate configuration and project files
    ///
    /// Checks templates, patterns and limits, then that the manifest,
    /// entry modules and plugin inputs exist.
    Check(CheckArgs),
}

#[derive(Args, Debug)]
pub struct ProfileArgs {
    /// Profiles to print
    #[arg(short, long, value_enum, default_value = "all")]
    pub target: TargetArg,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Args, Debug)]
pub struct PlanArgs {
    /// JSON file listing the modules to plan
    #[arg(short, long, value_name = "FILE")]
    pub modules: PathBuf,

    /// Profiles to plan for
    #[arg(short, long, value_enum, default_value = "client")]
    pub target: TargetArg,

    /// Clean output directories and write the client stats manifest
    #[arg(long)]
    pub write: bool,
}

#[derive(Args, Debug)]
pub struct CheckArgs {}
