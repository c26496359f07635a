use clap::ValueEnum;
use duet_config::Target;

/// Which profiles a command operates on
#[derive(Copy, Clone, PartialEq, Eq, Debug, ValueEnum)]
pub enum TargetArg {
    /// Browser bundle
    Client,
    /// Node.js server bundle
    Server,
    /// Both profiles
    All,
}

impl TargetArg {
    pub fn targets(self) -> &'static [Target] {
        match self {
            Self::Client => &[Target::Web],
            Self::Server => &[Target::Node],
            Self::All => &[Target::Web, Target::Node],
        }
    }
}
