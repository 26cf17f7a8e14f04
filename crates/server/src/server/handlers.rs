//! The single request handler.

use axum::{
    extract::Request,
    http::header,
    response::{IntoResponse, Response},
};

/// Body sent for every request.
pub const GREETING: &str = "Hello, client!";

/// Build the response for any request: `200 OK`, `Content-Type: text/plain`, body
/// [`GREETING`]. The request is not inspected.
pub fn respond<B>(_request: &Request<B>) -> Response {
    ([(header::CONTENT_TYPE, "text/plain")], GREETING).into_response()
}

/// Axum handler installed as the router fallback, so it sees every path and method.
pub async fn hello(request: Request) -> Response {
    respond(&request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::StatusCode};

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn responds_with_greeting() {
        let request = axum::http::Request::builder().uri("/").body(()).unwrap();
        let response = respond(&request);
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/plain");
        assert_eq!(body_text(response).await, "Hello, client!");
    }

    #[tokio::test]
    async fn ignores_method_path_and_body() {
        let request = axum::http::Request::builder()
            .method("DELETE")
            .uri("/some/where?x=1")
            .body(Body::from("payload"))
            .unwrap();
        let response = hello(request).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, GREETING);
    }
}
