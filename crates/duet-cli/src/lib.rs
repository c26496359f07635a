//! duet CLI - client and server build profiles from the command line.
//!
//! - [`cli`] - clap argument definitions
//! - [`commands`] - command implementations
//! - [`error`] - error types and miette conversion
//! - [`logger`] - tracing subscriber setup

pub mod cli;
pub mod commands;
pub mod error;
pub mod logger;
pub mod ui;

pub use error::{CliError, Result};
