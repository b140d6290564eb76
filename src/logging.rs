//! Log subscriber set-up for the `meetline` binary.

use crate::defaults::LOG_FILTER;
use tracing_subscriber::EnvFilter;

/// Default filter directive for the given CLI verbosity.
///
/// `-q` wins over `-v`. `RUST_LOG`, when set, overrides both.
pub fn filter_for(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => LOG_FILTER,
        1 => "info",
        _ => "debug",
    }
}

/// Install a stderr `fmt` subscriber.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init(verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_for(verbose, quiet)));

    if let Err(e) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
    {
        eprintln!("meetline: logging already initialised: {e}");
    }
}
