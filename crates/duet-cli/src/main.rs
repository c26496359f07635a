//! duet CLI entry point: argument parsing, logging setup and dispatch.

use clap::Parser;
use duet_cli::commands::{self, Session};
use duet_cli::{cli, error, logger};
use miette::Result;

fn main() -> Result<()> {
    let args = cli::Cli::parse();

    logger::init_logger(args.verbose, args.quiet, args.no_color);

    let result = Session::load(&args.root).and_then(|session| match args.command {
        cli::Command::Profile(profile_args) => commands::profile_execute(profile_args, &session),
        cli::Command::Plan(plan_args) => commands::plan_execute(plan_args, &session),
        cli::Command::Check(check_args) => commands::check_execute(check_args, &session),
    });

    result.map_err(error::cli_error_to_miette)
}
