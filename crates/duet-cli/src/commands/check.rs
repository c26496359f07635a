use duet_config::{ConfigValidator, FsValidator};

use crate::cli::CheckArgs;
use crate::commands::Session;
use crate::error::Result;
use crate::ui;

/// Validate the loaded configuration against the project tree.
pub fn execute(_args: CheckArgs, session: &Session) -> Result<()> {
    ui::info("Checking configuration...");
    FsValidator::new(&session.root).validate(&session.config)?;

    if !session.config.cdn.packages.is_empty() {
        ui::info(&format!(
            "{} package(s) served from the CDN",
            session.config.cdn.packages.len()
        ));
    }
    ui::success("Configuration is valid!");
    Ok(())
}
