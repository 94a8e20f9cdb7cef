//! Diagnostic logging setup.
//!
//! Logs go to stderr so they never mix with command output on stdout.
//! The filter comes from `DIGISAFE_LOG`, then from the `log_level`
//! setting, and defaults to `warn`.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding the log filter directive.
pub const LOG_ENV: &str = "DIGISAFE_LOG";

const DEFAULT_FILTER: &str = "warn";

/// Build the filter from `DIGISAFE_LOG`, falling back to `configured`
/// and then to `warn`. Unparseable directives fall through as well.
pub fn filter(configured: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(configured.unwrap_or(DEFAULT_FILTER)))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber. Calling it twice is harmless.
pub fn init(configured: Option<&str>) {
    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .with(filter(configured))
        .try_init();
}
