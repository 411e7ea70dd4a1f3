//! Request deadline middleware
//!
//! Requests that outlive the deadline get the standard JSON error body with
//! status 408 instead of an empty response.

use std::time::Duration;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::runtime::error::{ApiError, request_id_from_extensions};

/// Deadline applied to every request
#[derive(Debug, Clone, Copy)]
pub struct RequestTimeout(pub Duration);

pub async fn request_timeout_middleware(
    State(RequestTimeout(timeout)): State<RequestTimeout>,
    request: Request,
    next: Next,
) -> Response {
    let request_id = request_id_from_extensions(request.extensions());
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    match tokio::time::timeout(timeout, next.run(request)).await {
        Ok(response) => response,
        Err(_) => {
            tracing::warn!(
                request_id = %request_id,
                %method,
                path,
                timeout_secs = timeout.as_secs(),
                "Request exceeded deadline"
            );
            ApiError::request_timeout(timeout.as_secs(), request_id).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::error::request_id_middleware;
    use axum::{
        Router,
        body::{Body, to_bytes},
        http::StatusCode,
        middleware,
        routing::get,
    };
    use tower::ServiceExt;

    fn app(timeout: Duration) -> Router {
        Router::new()
            .route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(90)).await;
                    "done"
                }),
            )
            .route("/fast", get(|| async { "done" }))
            .layer(middleware::from_fn_with_state(
                RequestTimeout(timeout),
                request_timeout_middleware,
            ))
            .layer(middleware::from_fn(request_id_middleware))
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_request_gets_json_408() {
        let response = app(Duration::from_secs(60))
            .oneshot(
                Request::builder()
                    .uri("/slow")
                    .header("x-request-id", "slow-req-1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "request_timeout");
        assert_eq!(body["request_id"], "slow-req-1");
    }

    #[tokio::test(start_paused = true)]
    async fn test_fast_request_passes_through() {
        let response = app(Duration::from_secs(60))
            .oneshot(Request::builder().uri("/fast").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"done");
    }
}
