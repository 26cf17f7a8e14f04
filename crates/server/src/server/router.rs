//! Axum router construction.

use axum::Router;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use super::{handlers, middleware};

/// Build the application [`Router`]: one fallback handler for every request,
/// wrapped in request tracing and a timeout.
pub fn build() -> Router {
    Router::new()
        .fallback(handlers::hello)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(middleware::REQUEST_TIMEOUT))
}
