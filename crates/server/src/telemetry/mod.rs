//! JSON log output for `h2-hello`.
//!
//! Startup emits `h2-hello starting`, `constructing TLS context`,
//! `configuring server` and `server started` at info. A credential failure is
//! logged once with its `kind` (`io`, `format`, `authentication`, ...) before
//! the process exits. Per-connection events (handshake failures, negotiated
//! ALPN, `TCP_NODELAY` errors) are debug-level and carry `peer_addr`.
//!
//! The passphrase and decrypted key bytes are never logged. `RUST_LOG`, when
//! set, overrides `LOG_LEVEL`.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Initialise the global tracing subscriber.
///
/// # Errors
///
/// Returns an error if the subscriber has already been set.
pub fn init(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialise tracing subscriber: {e}"))
}
