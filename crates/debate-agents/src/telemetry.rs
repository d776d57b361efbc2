//! Tracing setup for the `buy-or-skip` binary.
//!
//! Logs go to stderr so stdout stays clean for `--json` output. The filter
//! comes from `RUST_LOG`, defaulting to `info`.

use tracing_subscriber::EnvFilter;

/// Build the env filter, falling back to `default` when `RUST_LOG` is unset or invalid.
pub fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Install the global subscriber. Safe to call more than once; later calls are no-ops.
pub fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(default))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
