//! Error taxonomy for credential loading and TLS context construction.

use std::path::PathBuf;

use thiserror::Error;

/// Failure while loading a keystore or assembling a TLS context.
///
/// Every variant is fatal to startup; nothing here is retried.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// The store file could not be opened or read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The store bytes do not parse as the declared format.
    #[error("malformed keystore: {0}")]
    Format(String),

    /// The passphrase does not decrypt the private key.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// The crypto provider cannot supply the requested protocol or algorithm.
    #[error("TLS algorithm unavailable: {0}")]
    Algorithm(String),

    /// The trust material cannot be turned into a certificate verifier.
    #[error("trust material rejected: {0}")]
    Trust(String),

    /// rustls refused the certificate chain / private key pair.
    #[error("server certificate rejected: {0}")]
    KeyRejected(String),
}

impl CredentialError {
    /// Short machine-readable kind, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            CredentialError::Io { .. } => "io",
            CredentialError::Format(_) => "format",
            CredentialError::Authentication(_) => "authentication",
            CredentialError::Algorithm(_) => "algorithm",
            CredentialError::Trust(_) => "trust",
            CredentialError::KeyRejected(_) => "key_rejected",
        }
    }
}
