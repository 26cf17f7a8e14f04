//! Keystore loading and TLS context construction for `h2-hello`.

pub mod error;
pub mod keystore;
pub mod tls;

pub use error::CredentialError;
pub use keystore::{load_key_store, KeyStore, KeyStoreEntry, KeyStoreFormat, Passphrase};
pub use tls::{build_tls_context, ClientAuth, TlsOptions};
