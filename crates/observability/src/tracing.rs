//! Tracing subscriber initialization.
//!
//! Logs are emitted as JSON lines with timestamps. Verbosity follows
//! `RUST_LOG` and defaults to `info`; the audit trail is written under the
//! `audit` target, so `RUST_LOG=info,audit=off` silences it.

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info";

/// Install the global JSON subscriber.
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(true)
        .with_current_span(true)
        .try_init();
}
