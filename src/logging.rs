//! Logging setup for the `tsdocs` binary.
//!
//! Log output goes to stderr so it never mixes with rendered documentation
//! on stdout. The filter is read from `TSDOCS_LOG`, then `RUST_LOG`; when
//! neither is set only warnings are shown (`debug` with `--verbose`).

use std::env;
use std::sync::Once;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable checked before `RUST_LOG`.
pub const LOG_ENV: &str = "TSDOCS_LOG";

static INIT: Once = Once::new();

/// Directive used when no filter is configured in the environment.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "warn"
    }
}

/// Build the filter from the environment, falling back to `default_directive`.
pub fn env_filter(verbose: bool) -> EnvFilter {
    let directives = env::var(LOG_ENV)
        .ok()
        .or_else(|| env::var("RUST_LOG").ok())
        .filter(|s| !s.trim().is_empty());

    match directives {
        Some(directives) => EnvFilter::try_new(&directives)
            .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose))),
        None => EnvFilter::new(default_directive(verbose)),
    }
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init(verbose: bool) {
    INIT.call_once(|| {
        tracing_subscriber::registry()
            .with(env_filter(verbose))
            .with(
                fmt::layer()
                    .with_target(verbose)
                    .with_writer(std::io::stderr),
            )
            .init();
    });
}
