//! Development-time tracing for debugging the reasoner.
//!
//! # Separation of Concerns
//!
//! - **Tracing (this module)**: Dev diagnostics via `RUST_LOG`, output to stderr.
//!   Not persisted, not part of the session artifacts.
//!
//! - **Action log (`io/action_log`)**: Product artifact in
//!   `<snapshot_root>/<session>/actions.log`. Always written, unaffected by `RUST_LOG`.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber.
///
/// Reads `RUST_LOG`, defaulting to `warn`. Output goes to stderr so it never
/// interleaves with the action log echoed on stdout.
///
/// # Example
/// ```bash
/// RUST_LOG=reasoner=debug cargo run -- run "Why is the sky blue?"
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
