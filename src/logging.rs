//! Usage: Development-time tracing to stderr, controlled via `RUST_LOG`.
//!
//! User-facing output (prompts, progress, the final clone URL) goes through
//! stdout/stderr directly; tracing is diagnostics only. Tokens are masked with
//! `shared::security::mask_token` before they reach any log line.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Defaults to `warn` when `RUST_LOG` is unset.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
