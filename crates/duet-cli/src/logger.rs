//! Logging setup for the `duet` binary.
//!
//! Events go to stderr so that JSON printed on stdout stays machine
//! readable.
//!
//! # Verbosity
//!
//! 1. `--verbose`: DEBUG for the duet crates
//! 2. `--quiet`: ERROR only
//! 3. `RUST_LOG`: custom filter
//! 4. Default: INFO for the duet crates

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global tracing subscriber.
///
/// Call once at startup, before any event is emitted.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    init_logger_with_filter(filter_for(verbose, quiet), no_color);
}

/// Install the global subscriber with an explicit filter.
pub fn init_logger_with_filter(filter: EnvFilter, no_color: bool) {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color && should_use_colors())
        .compact();

    // A second call (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

fn filter_for(verbose: bool, quiet: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new("duet=debug,duet_config=debug,duet_cli=debug")
    } else if quiet {
        EnvFilter::new("error")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("duet=info,duet_config=info,duet_cli=info"))
    }
}

/// Whether stderr output should be colored.
///
/// `NO_COLOR` disables colors, `FORCE_COLOR` forces them, otherwise the
/// terminal is asked.
pub fn should_use_colors() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if std::env::var_os("FORCE_COLOR").is_some() {
        return true;
    }
    console::Term::stderr().features().colors_supported()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn no_color_wins_over_force_color() {
        unsafe {
            std::env::set_var("NO_COLOR", "1");
            std::env::set_var("FORCE_COLOR", "1");
        }
        let colors = should_use_colors();
        unsafe {
            std::env::remove_var("NO_COLOR");
            std::env::remove_var("FORCE_COLOR");
        }
        assert!(!colors);
    }

    #[test]
    #[serial]
    fn force_color_enables_colors() {
        unsafe {
            std::env::remove_var("NO_COLOR");
            std::env::set_var("FORCE_COLOR", "1");
        }
        let colors = should_use_colors();
        unsafe {
            std::env::remove_var("FORCE_COLOR");
        }
        assert!(colors);
    }

    #[test]
    fn verbose_filter_enables_debug() {
        let filter = filter_for(true, false).to_string();
        assert!(filter.contains("duet_config=debug"));
    }
}
