//! Tracing setup for the cloudctl binary.
//!
//! Logs go to stderr so stdout only ever carries command output.

use tracing_subscriber::EnvFilter;

/// Crates whose debug output `--verbose` enables.
const VERBOSE_FILTER: &str = "cloudctl=debug,cloudctl_api=debug,cloudctl_config=debug";

/// Filter for this run: `--verbose` wins, then `RUST_LOG`, then `warn`.
pub fn filter(verbose: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    }
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init(verbose: bool) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(verbose))
        .with_target(false)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .try_init();
}
