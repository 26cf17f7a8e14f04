//! HTTPS server: TLS listener, router and the single handler.
//!
//! # Responsibilities
//! - Load the keystore and truststore and build the rustls context.
//! - Bind the TLS listener; a bind failure is fatal.
//! - Serve every request with the fixed greeting over HTTP/2 or HTTP/1.1.

pub mod handlers;
pub mod listener;
pub mod middleware;
pub mod router;

use std::sync::Arc;

use anyhow::{Context, Result};
use credentials::{build_tls_context, load_key_store, CredentialError};
use tracing::{error, info};

use crate::config::Config;
pub use listener::Server;

/// Run the startup sequence up to a bound listener.
///
/// Credential loading and context construction are blocking and run in order on
/// the calling task. The returned [`Server`] is ready for [`Server::serve`].
///
/// # Errors
///
/// Returns the first credential, TLS or bind error. Each is logged before it is
/// returned.
pub async fn start(cfg: &Config) -> Result<Server> {
    info!("constructing TLS context");
    let tls = tls_context(cfg)
        .map_err(|e| {
            error!(kind = e.kind(), error = %e, "could not construct TLS context");
            e
        })
        .context("failed to construct TLS context")?;

    info!("configuring server");
    let server = Server::bind(&cfg.bind_address, cfg.bind_port, tls)
        .await
        .map_err(|e| {
            error!(
                address = %cfg.bind_address,
                port = cfg.bind_port,
                error = %e,
                "could not start server"
            );
            e
        })?;

    info!(
        address = %cfg.bind_address,
        local_addr = %server.local_addr(),
        "server started"
    );
    Ok(server)
}

/// Load both stores and assemble the rustls server configuration.
fn tls_context(cfg: &Config) -> Result<Arc<rustls::ServerConfig>, CredentialError> {
    let key_store = load_key_store(&cfg.keystore_path, cfg.keystore_type, &cfg.passphrase)?;
    let trust_store = load_key_store(&cfg.truststore_path, cfg.keystore_type, &cfg.passphrase)?;
    build_tls_context(&key_store, &trust_store, &cfg.passphrase, &cfg.tls_options())
}
