//! Configuration loading and validation for the `h2-hello` server.
//!
//! All values are read from environment variables at startup and have defaults,
//! so the server starts with no environment at all when `localhost.pem` is in the
//! working directory.

use std::path::PathBuf;

use anyhow::{Context, Result};
use config::builder::DefaultState;
use config::ConfigBuilder;
use credentials::{ClientAuth, KeyStoreFormat, Passphrase, TlsOptions};
use serde::Deserialize;

/// Validated server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Interface (address or host name) the listener binds to.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// TCP port of the TLS listener.
    #[serde(default = "default_bind_port")]
    pub bind_port: u16,

    /// Unlocks the private keys of the keystore and truststore.
    #[serde(default = "default_passphrase")]
    pub passphrase: Passphrase,

    /// Encoding of both store files.
    #[serde(default = "default_keystore_type")]
    pub keystore_type: KeyStoreFormat,

    /// Server private key and certificate chain.
    #[serde(default = "default_keystore_path")]
    pub keystore_path: PathBuf,

    /// Certificates trusted for client authentication.
    #[serde(default = "default_truststore_path")]
    pub truststore_path: PathBuf,

    /// Offer HTTP/2 through ALPN.
    #[serde(default = "default_enable_http2")]
    pub enable_http2: bool,

    /// Client certificate policy: `none`, `optional` or `required`.
    #[serde(default)]
    pub client_auth: ClientAuth,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_bind_address() -> String {
    "localhost".into()
}
fn default_bind_port() -> u16 {
    9443
}
fn default_passphrase() -> Passphrase {
    Passphrase::from("changeit")
}
fn default_keystore_type() -> KeyStoreFormat {
    KeyStoreFormat::Pem
}
fn default_keystore_path() -> PathBuf {
    "localhost.pem".into()
}
fn default_truststore_path() -> PathBuf {
    "localhost.pem".into()
}
fn default_enable_http2() -> bool {
    true
}
fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable cannot be parsed or fails validation.
    pub fn from_env() -> Result<Self> {
        Self::load(config::Config::builder().add_source(config::Environment::default()))
    }

    fn load(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
        let cfg = builder
            .build()
            .context("failed to build configuration")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// Negotiation settings for the TLS context.
    pub fn tls_options(&self) -> TlsOptions {
        TlsOptions {
            enable_http2: self.enable_http2,
            client_auth: self.client_auth,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.bind_address.trim().is_empty() {
            anyhow::bail!("BIND_ADDRESS must not be empty");
        }
        if self.bind_port == 0 {
            anyhow::bail!("BIND_PORT must be between 1 and 65535");
        }
        if self.keystore_path.as_os_str().is_empty() {
            anyhow::bail!("KEYSTORE_PATH must not be empty");
        }
        if self.truststore_path.as_os_str().is_empty() {
            anyhow::bail!("TRUSTSTORE_PATH must not be empty");
        }
        Ok(())
    }
}

#[cfg(test)]
impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            bind_port: default_bind_port(),
            passphrase: default_passphrase(),
            keystore_type: default_keystore_type(),
            keystore_path: default_keystore_path(),
            truststore_path: default_truststore_path(),
            enable_http2: default_enable_http2(),
            client_auth: ClientAuth::default(),
            log_level: default_log_level(),
        }
    }
}
