//! TLS-terminated HTTP/1.1 + HTTP/2 listener.
//!
//! Each accepted TCP connection gets its own Tokio task: rustls handshake via
//! `tokio-rustls`, then hyper's auto connection builder, which serves HTTP/2 when
//! the client speaks it and HTTP/1.1 otherwise.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use hyper::body::Incoming;
use hyper::Request;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto;
use thiserror::Error;
use tokio::net::{TcpListener, TcpStream};
use tokio_rustls::TlsAcceptor;
use tower::Service;
use tracing::{debug, error};

/// Pause after a failed `accept` before trying again.
const ACCEPT_ERROR_BACKOFF: Duration = Duration::from_millis(100);

#[derive(Debug, Error)]
pub enum ServerError {
    /// The listening socket could not be created.
    #[error("could not start server on {address}:{port}: {source}")]
    Bind {
        address: String,
        port: u16,
        #[source]
        source: std::io::Error,
    },
}

/// A bound listener holding the TLS context it terminates connections with.
pub struct Server {
    listener: TcpListener,
    acceptor: TlsAcceptor,
    local_addr: SocketAddr,
}

impl Server {
    /// Bind `address:port`. `address` may be a host name; port `0` picks a free port.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Bind`] if the socket cannot be bound (port in use,
    /// permission denied, unresolvable address).
    pub async fn bind(
        address: &str,
        port: u16,
        tls: Arc<rustls::ServerConfig>,
    ) -> Result<Self, ServerError> {
        let bind_error = |source| ServerError::Bind {
            address: address.to_owned(),
            port,
            source,
        };
        let listener = TcpListener::bind((address, port)).await.map_err(bind_error)?;
        let local_addr = listener.local_addr().map_err(bind_error)?;

        Ok(Self {
            listener,
            acceptor: TlsAcceptor::from(tls),
            local_addr,
        })
    }

    /// Address the listener is actually bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Accept loop. Runs until the process is killed; per-connection failures
    /// are logged and do not stop the loop.
    pub async fn serve(self, router: Router) {
        loop {
            match self.listener.accept().await {
                Ok((tcp, peer_addr)) => {
                    let acceptor = self.acceptor.clone();
                    let router = router.clone();
                    tokio::spawn(handle_connection(acceptor, tcp, peer_addr, router));
                }
                Err(e) => {
                    error!(error = %e, "accept error");
                    tokio::time::sleep(ACCEPT_ERROR_BACKOFF).await;
                }
            }
        }
    }
}

/// Terminate TLS on one connection and serve HTTP on it until it closes.
async fn handle_connection(acceptor: TlsAcceptor, tcp: TcpStream, peer_addr: SocketAddr, router: Router) {
    if let Err(e) = tcp.set_nodelay(true) {
        debug!(%peer_addr, error = %e, "could not set TCP_NODELAY");
    }

    let stream = match acceptor.accept(tcp).await {
        Ok(stream) => stream,
        Err(e) => {
            debug!(%peer_addr, error = %e, "TLS handshake failed");
            return;
        }
    };
    let alpn = stream
        .get_ref()
        .1
        .alpn_protocol()
        .map(|p| String::from_utf8_lossy(p).into_owned());
    debug!(%peer_addr, alpn = alpn.as_deref().unwrap_or("none"), "TLS handshake complete");

    let service = hyper::service::service_fn(move |request: Request<Incoming>| {
        router.clone().call(request)
    });

    let builder = auto::Builder::new(TokioExecutor::new());
    if let Err(e) = builder.serve_connection(TokioIo::new(stream), service).await {
        debug!(%peer_addr, error = %e, "connection closed with error");
    }
}
