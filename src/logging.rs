//! Diagnostic logging setup.
//!
//! Command output goes to stdout as JSON or text, so diagnostics are written
//! to stderr. The filter is read from `DT_LOG` (same syntax as `RUST_LOG`)
//! and defaults to `warn`.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directive.
pub const LOG_ENV: &str = "DT_LOG";

const DEFAULT_FILTER: &str = "warn";

/// Install the global tracing subscriber.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
