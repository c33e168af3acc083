//! Log output for the `checkin` binary.
//!
//! Logs always go to stderr: `invoke` and `generate --json` print JSON on
//! stdout and it must stay parseable. `RUST_LOG` wins over `-v`/`-q`.

use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// How much the binary logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Errors only.
    Quiet,
    /// Run summaries, served requests, and written objects.
    #[default]
    Normal,
    /// Also payload URLs, object keys, and per-row results.
    Verbose,
    /// Everything.
    Trace,
}

impl Verbosity {
    /// Map `-q` and the `-v` count to a verbosity. `-q` wins.
    #[must_use]
    pub fn from_flags(quiet: bool, verbose: u8) -> Self {
        match (quiet, verbose) {
            (true, _) => Self::Quiet,
            (false, 0) => Self::Normal,
            (false, 1) => Self::Verbose,
            (false, _) => Self::Trace,
        }
    }

    /// Most detailed level emitted.
    #[must_use]
    pub fn level(self) -> Level {
        match self {
            Self::Quiet => Level::ERROR,
            Self::Normal => Level::INFO,
            Self::Verbose => Level::DEBUG,
            Self::Trace => Level::TRACE,
        }
    }

    /// Filter directives for this crate and for request spans from
    /// `tower_http`, so `serve -v` shows each request.
    #[must_use]
    pub fn directives(self) -> String {
        let level = self.level();
        format!("checkin={level},tower_http={level}")
    }
}

/// Build the filter: `rust_log` when it parses, the verbosity otherwise.
#[must_use]
pub fn build_filter(verbosity: Verbosity, rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(verbosity.directives()))
}

/// Install the stderr subscriber. Later calls are no-ops.
///
/// # Examples
///
/// ```no_run
/// use checkin::{init_logging, logging::Verbosity};
///
/// init_logging(Verbosity::from_flags(false, 1));
/// ```
pub fn init_logging(verbosity: Verbosity) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = build_filter(verbosity, rust_log.as_deref());

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true),
        )
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_flag_wins_over_verbose() {
        assert_eq!(Verbosity::from_flags(true, 2), Verbosity::Quiet);
        assert_eq!(Verbosity::from_flags(false, 0), Verbosity::Normal);
        assert_eq!(Verbosity::from_flags(false, 1), Verbosity::Verbose);
        assert_eq!(Verbosity::from_flags(false, 5), Verbosity::Trace);
    }

    #[test]
    fn test_levels() {
        assert_eq!(Verbosity::Quiet.level(), Level::ERROR);
        assert_eq!(Verbosity::default().level(), Level::INFO);
        assert_eq!(Verbosity::Verbose.level(), Level::DEBUG);
    }

    #[test]
    fn test_directives_cover_request_spans() {
        assert_eq!(
            Verbosity::Normal.directives(),
            "checkin=INFO,tower_http=INFO"
        );
        assert_eq!(
            Verbosity::Quiet.directives(),
            "checkin=ERROR,tower_http=ERROR"
        );
    }

    #[test]
    fn test_rust_log_overrides_verbosity() {
        let filter = build_filter(Verbosity::Quiet, Some("checkin=trace"));
        assert_eq!(
            filter.to_string(),
            EnvFilter::new("checkin=trace").to_string()
        );
    }

    #[test]
    fn test_unparsable_rust_log_falls_back() {
        let filter = build_filter(Verbosity::Verbose, Some("checkin=notalevel"));
        assert_eq!(
            filter.to_string(),
            EnvFilter::new(Verbosity::Verbose.directives()).to_string()
        );
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init_logging(Verbosity::Quiet);
        init_logging(Verbosity::Trace);
    }
}
