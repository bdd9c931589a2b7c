//! tracing subscriber setup
//!
//! Every log line goes to stderr; stdout carries command output only.
//! `ROADNET_LOG_LEVEL` takes `EnvFilter` directives and wins over `-v`.

use std::io::IsTerminal;

use tracing_subscriber::EnvFilter;

use crate::cli::args::ColorChoice;

/// Environment variable whose `EnvFilter` directives override `-v`.
pub const LOG_LEVEL_ENV: &str = "ROADNET_LOG_LEVEL";

/// Shape of log lines on stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum LogFormat {
    #[default]
    Human,
    /// One JSON object per line.
    Json,
}

/// Level directive for a `-v` count: warn, info, debug, then trace for
/// anything higher.
#[must_use]
pub const fn verbosity_to_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn filter_for(verbosity: u8) -> EnvFilter {
    EnvFilter::try_from_env(LOG_LEVEL_ENV)
        .unwrap_or_else(|_| EnvFilter::new(verbosity_to_directive(verbosity)))
}

fn ansi_enabled(color: ColorChoice) -> bool {
    match color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => {
            std::env::var_os("NO_COLOR").is_none() && std::io::stderr().is_terminal()
        }
    }
}

/// Installs the global subscriber.
///
/// Targets (module paths) are shown from `-vv` on. A subscriber that is
/// already installed is left in place, so repeated calls are harmless.
pub fn init_logging(format: LogFormat, verbosity: u8, color: ColorChoice) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter_for(verbosity))
        .with_target(verbosity >= 2)
        .with_writer(std::io::stderr);

    let installed = match format {
        LogFormat::Human => builder.with_ansi(ansi_enabled(color)).try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_directives() {
        let cases = [(0, "warn"), (1, "info"), (2, "debug"), (3, "trace"), (u8::MAX, "trace")];
        for (verbosity, directive) in cases {
            assert_eq!(verbosity_to_directive(verbosity), directive, "-v x{verbosity}");
        }
    }

    #[test]
    fn test_explicit_color_choices() {
        assert!(ansi_enabled(ColorChoice::Always));
        assert!(!ansi_enabled(ColorChoice::Never));
    }

    #[test]
    fn test_repeated_init() {
        init_logging(LogFormat::Json, 3, ColorChoice::Never);
        init_logging(LogFormat::Human, 0, ColorChoice::Auto);
    }
}
