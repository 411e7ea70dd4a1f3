//! # HTTP Authentication
//!
//! Bearer-token middleware for protected routes. Tokens are resolved through
//! the runtime's [`Authenticator`](smartbiz_core::Authenticator); the
//! resulting principal is stored in the request extensions and read back by
//! handlers through [`CurrentUser`].

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use smartbiz_core::Principal;

use crate::runtime::error::{ApiError, request_id_from_extensions};
use crate::runtime::http::FeedbackRuntime;

/// Authenticated principal of the current request
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Principal);

impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(|| {
                ApiError::authentication_required(request_id_from_extensions(&parts.extensions))
            })
    }
}

/// Token from an `Authorization: Bearer <token>` header
fn bearer_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Middleware rejecting requests without a valid bearer token
pub async fn require_auth(
    State(runtime): State<FeedbackRuntime>,
    mut request: Request,
    next: Next,
) -> Response {
    let principal = match bearer_token(&request) {
        Some(token) => runtime.authenticator.verify(token).await,
        None => None,
    };

    match principal {
        Some(principal) => {
            tracing::debug!(user_id = %principal.id, "Request authenticated");
            request.extensions_mut().insert(CurrentUser(principal));
            next.run(request).await
        }
        None => {
            let request_id = request_id_from_extensions(request.extensions());
            ApiError::authentication_required(request_id).into_response()
        }
    }
}
