//! Diagnostic logging setup
//!
//! Logs go to stderr so they never mix with output written to stdout.
//! `DFO_LOG` takes an `EnvFilter` directive and overrides the flags.

use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable holding a log filter directive
pub const LOG_ENV: &str = "DFO_LOG";

/// Default filter for the given verbosity flags
pub fn default_filter(verbose: bool, quiet: bool) -> &'static str {
    if verbose {
        "dfo=debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    }
}

/// Install the global subscriber; later calls are no-ops
pub fn init(verbose: bool, quiet: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose, quiet)));

    let installed = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
    if installed.is_err() {
        // Tests and embedders may have set one up already; keep theirs
        debug!("log subscriber already installed");
    }
}
