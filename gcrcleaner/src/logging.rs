//! Diagnostic logging.
//!
//! Logs go to stderr so the listing on stdout stays clean. Verbosity comes
//! from the repeated `-v` flag unless `RUST_LOG` is set.

use tracing_subscriber::EnvFilter;

/// Maps the `-v` count to a filter directive.
pub fn default_directive(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "warn,gcrcleaner=info,libgcrcleaner=info",
        2 => "warn,gcrcleaner=debug,libgcrcleaner=debug",
        _ => "trace",
    }
}

/// Installs the global subscriber. Safe to call more than once.
pub fn init(verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
