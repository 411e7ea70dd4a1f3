//! Request bodies
//!
//! Missing fields deserialize to empty strings so that validation, not the
//! JSON extractor, reports them.

use serde::Deserialize;

/// Body of `POST /api/auth/login`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Body of `POST /api/feedback`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateFeedbackRequest {
    #[serde(default)]
    pub content: String,
}
