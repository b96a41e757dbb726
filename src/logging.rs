//! logging
//!
//! Tracing subscriber setup for the CLI.
//!
//! The filter comes from `REPOSTAMP_LOG`, then `RUST_LOG`, then a default
//! of `warn` (`debug` with `--debug`). Events go to stderr so stdout only
//! ever carries the report.

use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "REPOSTAMP_LOG";

const DEFAULT_FILTER: &str = "warn";
const DEBUG_FILTER: &str = "repostamp=debug,warn";

/// Pick the filter directive for this run.
fn filter(debug: bool, env: impl Fn(&str) -> Option<String>) -> EnvFilter {
    env(LOG_ENV)
        .and_then(|value| EnvFilter::try_new(value).ok())
        .or_else(|| env("RUST_LOG").and_then(|value| EnvFilter::try_new(value).ok()))
        .unwrap_or_else(|| EnvFilter::new(if debug { DEBUG_FILTER } else { DEFAULT_FILTER }))
}

/// Install the global subscriber.
///
/// Calling this twice is harmless; the second call leaves the first
/// subscriber in place.
pub fn init(debug: bool) {
    let filter = filter(debug, |key| std::env::var(key).ok());

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(debug)
                .without_time(),
        )
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn default_is_warn() {
        assert_eq!(filter(false, no_env).to_string(), "warn");
    }

    #[test]
    fn debug_flag_raises_own_level() {
        let rendered = filter(true, no_env).to_string();
        assert!(rendered.contains("repostamp=debug"));
    }

    #[test]
    fn own_variable_beats_rust_log() {
        let env = |key: &str| match key {
            LOG_ENV => Some("trace".to_string()),
            "RUST_LOG" => Some("error".to_string()),
            _ => None,
        };
        assert_eq!(filter(false, env).to_string(), "trace");
    }

    #[test]
    fn rust_log_beats_debug_flag() {
        let env = |key: &str| (key == "RUST_LOG").then(|| "error".to_string());
        assert_eq!(filter(true, env).to_string(), "error");
    }

    #[test]
    fn init_twice_is_harmless() {
        init(false);
        init(true);
    }
}
