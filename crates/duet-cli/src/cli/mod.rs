//! Command-line interface definition.
//!
//! # Command Structure
//!
//! - `duet profile` - Print the assembled client/server profiles as JSON
//! - `duet plan` - Plan chunk output for a module listing
//! - `duet check` - Validate configuration against the project tree

mod commands;
mod enums;

use std::path::PathBuf;

use clap::Parser;

pub use commands::{CheckArgs, Command, PlanArgs, ProfileArgs};
pub use enums::TargetArg;

/// duet - client and server build profiles for one web application
#[derive(Parser, Debug)]
#[command(
    name = "duet",
    version,
    about = "Client and server build profiles for a bundled web application",
    long_about = "duet assembles the browser and server build profiles of a web application\n\
                  from duet.toml, package.json and the process environment, and plans\n\
                  how modules are split into hashed output files."
)]
pub struct Cli {
    /// Project root containing duet.toml and package.json
    #[arg(long, global = true, default_value = ".", value_name = "DIR")]
    pub root: PathBuf,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn profile_defaults_to_all_targets() {
        let cli = Cli::try_parse_from(["duet", "profile"]).unwrap();
        match cli.command {
            Command::Profile(args) => {
                assert_eq!(args.target, TargetArg::All);
                assert!(!args.pretty);
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert_eq!(cli.root, PathBuf::from("."));
    }

    #[test]
    fn plan_requires_module_listing() {
        assert!(Cli::try_parse_from(["duet", "plan"]).is_err());

        let cli = Cli::try_parse_from([
            "duet", "plan", "--modules", "mods.json", "--target", "server", "--write",
        ])
        .unwrap();
        match cli.command {
            Command::Plan(args) => {
                assert_eq!(args.modules, PathBuf::from("mods.json"));
                assert_eq!(args.target, TargetArg::Server);
                assert!(args.write);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["duet", "check", "--root", "/app", "--verbose"]).unwrap();
        assert_eq!(cli.root, PathBuf::from("/app"));
        assert!(cli.verbose);
    }

    #[test]
    fn verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["duet", "-v", "-q", "check"]).is_err());
    }
}
