//! Tracing setup for the binary. Log output goes to stderr so stdout stays
//! free for prompts and exported records.

use std::io;
use tracing_subscriber::{fmt, EnvFilter};

/// Installs the global fmt subscriber.
/// - Respects `RUST_LOG` if set
/// - Falls back to `info`
pub fn init() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .with_writer(io::stderr)
        .try_init();
}
