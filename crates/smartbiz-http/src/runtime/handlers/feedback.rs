//! Feedback HTTP handlers
//!
//! Submissions are validated, analyzed, HTML-escaped and stored. The analyzer
//! sees the trimmed text as the user wrote it; only the stored copy is
//! escaped.

use axum::{
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::Json,
};
use smartbiz_core::{
    Feedback, FeedbackAnalytics, FeedbackId,
    validation::{escape_content, validate_feedback_content},
};
use tracing::{info, warn};

use crate::runtime::{
    auth::CurrentUser,
    error::{ApiError, ApiResult, RequestId},
    handlers::json_rejection,
    http::FeedbackRuntime,
    types::{AnalyticsResponse, CreateFeedbackRequest, FeedbackListResponse, FeedbackResponse},
};

/// POST /api/feedback - Analyze and store a submission
pub async fn create_feedback(
    State(runtime): State<FeedbackRuntime>,
    request_id: RequestId,
    CurrentUser(user): CurrentUser,
    body: Result<Json<CreateFeedbackRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<FeedbackResponse>)> {
    let Json(request) = body.map_err(|rejection| json_rejection(rejection, request_id.clone()))?;

    let content = validate_feedback_content(&request.content)
        .map_err(|err| ApiError::validation(vec![err], request_id.clone()))?;

    let analysis = runtime.analyzer.analyze(&content).await;
    if analysis.is_fallback() {
        warn!(user_id = %user.id, request_id = %request_id, "Storing feedback with fallback analysis");
    }

    let feedback = Feedback::new(escape_content(&content), analysis);
    let stored = runtime
        .repository
        .append(&user, feedback)
        .await
        .map_err(|err| ApiError::storage(err, request_id.clone()))?;

    info!(
        feedback_id = %stored.id,
        user_id = %user.id,
        sentiment = %stored.sentiment,
        request_id = %request_id,
        "Feedback created"
    );

    Ok((
        StatusCode::CREATED,
        Json(FeedbackResponse {
            success: true,
            data: stored,
        }),
    ))
}

/// GET /api/feedback - Caller's feedback, newest first
pub async fn list_feedback(
    State(runtime): State<FeedbackRuntime>,
    request_id: RequestId,
    CurrentUser(user): CurrentUser,
) -> ApiResult<Json<FeedbackListResponse>> {
    let mut feedback = runtime
        .repository
        .list_for(&user)
        .await
        .map_err(|err| ApiError::storage(err, request_id))?;
    feedback.reverse();

    Ok(Json(FeedbackListResponse {
        success: true,
        count: feedback.len(),
        data: feedback,
    }))
}

/// GET /api/feedback/analytics - Sentiment counts and recommendations
pub async fn feedback_analytics(
    State(runtime): State<FeedbackRuntime>,
    request_id: RequestId,
    CurrentUser(user): CurrentUser,
) -> ApiResult<Json<AnalyticsResponse>> {
    let feedback = runtime
        .repository
        .list_for(&user)
        .await
        .map_err(|err| ApiError::storage(err, request_id))?;

    Ok(Json(AnalyticsResponse {
        success: true,
        data: FeedbackAnalytics::from_feedback(&feedback),
    }))
}

/// GET /api/feedback/{id} - Single record owned by the caller
pub async fn get_feedback(
    State(runtime): State<FeedbackRuntime>,
    request_id: RequestId,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<Json<FeedbackResponse>> {
    let id = FeedbackId::from(id);
    let feedback = runtime
        .repository
        .get(&id)
        .await
        .map_err(|err| ApiError::storage(err, request_id.clone()))?
        .ok_or_else(|| ApiError::not_found("feedback", request_id.clone()))?;

    if !feedback.is_owned_by(&user.id) {
        warn!(feedback_id = %id, user_id = %user.id, "Feedback access denied");
        return Err(ApiError::forbidden("feedback", request_id));
    }

    Ok(Json(FeedbackResponse {
        success: true,
        data: feedback,
    }))
}
