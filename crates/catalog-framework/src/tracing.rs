//! # Observability & Tracing
//!
//! [`setup_tracing`] installs the process-wide subscriber: structured `tracing` events filtered
//! by `RUST_LOG` (default `info`), compact format, module targets hidden since events carry an
//! `entity_type` field instead. Events are written to stderr; stdout belongs to the program.
//!
//! ```bash
//! RUST_LOG=info catalog-admin list            # lifecycle and outcomes
//! RUST_LOG=debug catalog-admin list           # payloads, tickets, stale responses
//! RUST_LOG=catalog_admin::session=trace ...   # one module only
//! ```

use tracing_subscriber::EnvFilter;

/// Initialize the global subscriber. Calling it twice is harmless.
pub fn setup_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}

/// Subscriber for tests: everything goes through the test writer so `cargo test` captures it.
pub fn setup_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}
