//! Axum middleware settings applied to the router.

use std::time::Duration;

/// Per-request timeout applied to every request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
