//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

use crate::constants::env_vars;

/// Build the log filter: LATERLOCK_LOG, then RUST_LOG, then the default.
fn build_filter(default_level: &str) -> EnvFilter {
    for var in [env_vars::LOG, "RUST_LOG"] {
        if let Ok(value) = std::env::var(var) {
            if let Ok(filter) = EnvFilter::try_new(value.trim()) {
                if !value.trim().is_empty() {
                    return filter;
                }
            }
        }
    }
    EnvFilter::new(default_level)
}

/// Install the fmt subscriber on stderr.
///
/// One-shot commands default to `error` since failures are already reported
/// to the user; the server defaults to `info`. `--verbose` raises both to
/// `debug`.
pub fn init_logging(verbose: bool, serving: bool) {
    let default_level = match (verbose, serving) {
        (true, _) => "debug",
        (false, true) => "info",
        (false, false) => "error",
    };

    // A second init (e.g. under tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(build_filter(default_level))
        .with_writer(std::io::stderr)
        .with_target(serving)
        .try_init();
}
