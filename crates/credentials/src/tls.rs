//! Server TLS context construction with rustls.
//!
//! The key store supplies the server identity, the trust store supplies the
//! anchors client certificates are verified against. Protocol versions and cipher
//! suites are the `ring` provider's safe defaults.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use rustls::crypto::CryptoProvider;
use rustls::server::danger::ClientCertVerifier;
use rustls::server::WebPkiClientVerifier;
use rustls::{RootCertStore, ServerConfig};
use serde::{Deserialize, Deserializer};
use tracing::{debug, warn};

use crate::error::CredentialError;
use crate::keystore::{KeyStore, Passphrase};

/// ALPN identifier for HTTP/2 over TLS.
pub const ALPN_H2: &[u8] = b"h2";
/// ALPN identifier for HTTP/1.1.
pub const ALPN_HTTP11: &[u8] = b"http/1.1";

/// Whether clients are asked for a certificate during the handshake.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ClientAuth {
    /// Never request a client certificate.
    #[default]
    None,
    /// Request one and verify it against the trust store if presented.
    Optional,
    /// Reject clients that do not present a trusted certificate.
    Required,
}

impl fmt::Display for ClientAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ClientAuth::None => "none",
            ClientAuth::Optional => "optional",
            ClientAuth::Required => "required",
        })
    }
}

impl FromStr for ClientAuth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(ClientAuth::None),
            "optional" => Ok(ClientAuth::Optional),
            "required" => Ok(ClientAuth::Required),
            other => Err(format!(
                "unknown client auth mode {other:?} (expected none, optional or required)"
            )),
        }
    }
}

impl<'de> Deserialize<'de> for ClientAuth {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Negotiation settings applied on top of the key and trust material.
#[derive(Debug, Clone)]
pub struct TlsOptions {
    /// Advertise `h2` in ALPN ahead of `http/1.1`.
    pub enable_http2: bool,
    pub client_auth: ClientAuth,
}

impl Default for TlsOptions {
    fn default() -> Self {
        Self {
            enable_http2: true,
            client_auth: ClientAuth::default(),
        }
    }
}

impl TlsOptions {
    /// ALPN protocols in server preference order.
    pub fn alpn_protocols(&self) -> Vec<Vec<u8>> {
        if self.enable_http2 {
            vec![ALPN_H2.to_vec(), ALPN_HTTP11.to_vec()]
        } else {
            vec![ALPN_HTTP11.to_vec()]
        }
    }
}

/// Build the server TLS context from a key store and a trust store.
///
/// # Errors
///
/// - [`CredentialError::Format`] if `key_store` has no private key entry.
/// - [`CredentialError::Authentication`] if `passphrase` does not unlock the key.
/// - [`CredentialError::Algorithm`] if the provider offers no usable protocol version.
/// - [`CredentialError::Trust`] if the trust anchors cannot back a client verifier.
/// - [`CredentialError::KeyRejected`] if rustls refuses the chain / key pair.
pub fn build_tls_context(
    key_store: &KeyStore,
    trust_store: &KeyStore,
    passphrase: &Passphrase,
    options: &TlsOptions,
) -> Result<Arc<ServerConfig>, CredentialError> {
    let (chain, key) = key_store
        .private_key_entry()
        .ok_or_else(|| CredentialError::Format("keystore holds no private key entry".into()))?;
    let key = key.unlock(passphrase)?;

    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let builder = ServerConfig::builder_with_provider(Arc::clone(&provider))
        .with_safe_default_protocol_versions()
        .map_err(|e| CredentialError::Algorithm(format!("no usable TLS protocol version: {e}")))?;

    let builder = match client_verifier(trust_store, provider, options.client_auth)? {
        Some(verifier) => builder.with_client_cert_verifier(verifier),
        None => builder.with_no_client_auth(),
    };

    let mut config = builder
        .with_single_cert(chain.to_vec(), key)
        .map_err(|e| CredentialError::KeyRejected(e.to_string()))?;
    config.alpn_protocols = options.alpn_protocols();

    debug!(
        chain_len = chain.len(),
        client_auth = %options.client_auth,
        http2 = options.enable_http2,
        "TLS context built"
    );
    Ok(Arc::new(config))
}

/// Client certificate verifier backed by every certificate in `trust_store`.
///
/// `None` means client certificates are not requested.
fn client_verifier(
    trust_store: &KeyStore,
    provider: Arc<CryptoProvider>,
    mode: ClientAuth,
) -> Result<Option<Arc<dyn ClientCertVerifier>>, CredentialError> {
    if mode == ClientAuth::None {
        return Ok(None);
    }

    let mut roots = RootCertStore::empty();
    for cert in trust_store.certificates() {
        roots
            .add(cert.clone())
            .map_err(|e| CredentialError::Trust(format!("unusable trust anchor: {e}")))?;
    }

    if roots.is_empty() {
        if mode == ClientAuth::Required {
            return Err(CredentialError::Trust(
                "client authentication is required but the truststore holds no certificates".into(),
            ));
        }
        warn!("truststore holds no certificates; client certificates will not be requested");
        return Ok(None);
    }

    let builder = WebPkiClientVerifier::builder_with_provider(Arc::new(roots), provider);
    let builder = match mode {
        ClientAuth::Optional => builder.allow_unauthenticated(),
        _ => builder,
    };
    builder
        .build()
        .map(Some)
        .map_err(|e| CredentialError::Trust(e.to_string()))
}
