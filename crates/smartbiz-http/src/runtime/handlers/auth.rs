//! Authentication HTTP handlers

use axum::{
    extract::{State, rejection::JsonRejection},
    response::Json,
};
use smartbiz_core::validation::validate_login;
use tracing::{info, warn};

use crate::runtime::{
    auth::CurrentUser,
    error::{ApiError, ApiResult, RequestId},
    handlers::json_rejection,
    http::FeedbackRuntime,
    types::{LoginRequest, LoginResponse, MeResponse},
};

/// POST /api/auth/register - Always refused; only the demo account exists
pub async fn register(State(runtime): State<FeedbackRuntime>, request_id: RequestId) -> ApiError {
    ApiError::registration_disabled(runtime.authenticator.credential_hint(), request_id)
}

/// POST /api/auth/login - Exchange credentials for a bearer token
pub async fn login(
    State(runtime): State<FeedbackRuntime>,
    request_id: RequestId,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<LoginResponse>> {
    let Json(request) = body.map_err(|rejection| json_rejection(rejection, request_id.clone()))?;

    validate_login(&request.email, &request.password)
        .map_err(|errors| ApiError::validation(errors, request_id.clone()))?;

    match runtime
        .authenticator
        .login(&request.email, &request.password)
        .await
    {
        Ok(grant) => {
            info!(user_id = %grant.user.id, request_id = %request_id, "User logged in");
            Ok(Json(LoginResponse {
                success: true,
                token: grant.token,
                user: grant.user,
            }))
        }
        Err(err) => {
            warn!(error = %err, request_id = %request_id, "Login rejected");
            Err(ApiError::invalid_credentials(
                runtime.authenticator.credential_hint(),
                request_id,
            ))
        }
    }
}

/// GET /api/auth/me - Current principal
pub async fn me(CurrentUser(user): CurrentUser) -> Json<MeResponse> {
    Json(MeResponse {
        success: true,
        user,
    })
}
