//! Diagnostic logging to stderr, filtered by `PARLANCE_LOG`.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable holding an `EnvFilter` directive, e.g. `parlance=debug`.
pub const LOG_ENV: &str = "PARLANCE_LOG";

fn default_directive(debug: bool) -> &'static str {
    if debug {
        "parlance=debug,warn"
    } else {
        "warn"
    }
}

/// Build the filter: `PARLANCE_LOG` when it parses, otherwise the default.
pub fn build_filter(debug: bool) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_directive(debug)))
}

/// Install the global subscriber. Returns `false` if one was already set.
pub fn init(debug: bool) -> bool {
    tracing_subscriber::registry()
        .with(build_filter(debug))
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init()
        .is_ok()
}
