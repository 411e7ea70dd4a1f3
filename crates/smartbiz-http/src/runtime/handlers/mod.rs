//! HTTP request handlers
//!
//! Handlers are organized by functionality and re-exported for the router.

pub mod auth;
pub mod feedback;
pub mod health;

pub use auth::{login, me, register};
pub use feedback::{create_feedback, feedback_analytics, get_feedback, list_feedback};
pub use health::health_check;

use axum::{extract::rejection::JsonRejection, http::StatusCode};

use crate::runtime::error::{ApiError, RequestId};

/// Map a JSON extractor rejection onto the runtime's error body
pub(crate) fn json_rejection(rejection: JsonRejection, request_id: RequestId) -> ApiError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::payload_too_large(request_id)
    } else {
        ApiError::invalid_json(rejection.body_text(), request_id)
    }
}
