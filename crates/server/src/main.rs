//! `h2-hello` — binary entry point.
//!
//! Startup sequence:
//! 1. Load and validate [`Config`] from environment variables.
//! 2. Initialise structured JSON logging.
//! 3. Load the keystore and truststore and build the TLS context.
//! 4. Bind the TLS listener and serve every request with the fixed greeting.
//!
//! Any failure in steps 1–4, including a bind failure, exits the process with a
//! non-zero status.

mod config;
mod server;
mod telemetry;

use anyhow::Result;
use tracing::info;

use config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // -----------------------------------------------------------------------
    // 1. Configuration
    // -----------------------------------------------------------------------
    let cfg = Config::from_env().map_err(|e| {
        // Telemetry is not yet up; write to stderr directly.
        eprintln!("ERROR: configuration invalid: {e:#}");
        e
    })?;

    // -----------------------------------------------------------------------
    // 2. Telemetry
    // -----------------------------------------------------------------------
    telemetry::init(&cfg.log_level)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %cfg.bind_address,
        bind_port = cfg.bind_port,
        keystore = %cfg.keystore_path.display(),
        truststore = %cfg.truststore_path.display(),
        "h2-hello starting"
    );

    // -----------------------------------------------------------------------
    // 3–4. TLS context and listener
    // -----------------------------------------------------------------------
    let server = server::start(&cfg).await?;
    server.serve(server::router::build()).await;

    Ok(())
}
