use duet_config::load_profiles;
use serde_json::{Map, Value};

use crate::cli::ProfileArgs;
use crate::commands::Session;
use crate::error::Result;

/// Assemble both profiles, log a summary and print the selected ones.
///
/// A single target prints that profile; `all` prints an object keyed by
/// profile name.
pub fn execute(args: ProfileArgs, session: &Session) -> Result<()> {
    let pair = load_profiles(&session.config, &session.env)?;
    pair.log_summary();

    let targets = args.target.targets();
    let output = if let [target] = targets {
        serde_json::to_value(pair.get(*target))?
    } else {
        let mut profiles = Map::new();
        for target in targets {
            let profile = pair.get(*target);
            profiles.insert(profile.name.clone(), serde_json::to_value(profile)?);
        }
        Value::Object(profiles)
    };

    let json = if args.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{json}");
    Ok(())
}
