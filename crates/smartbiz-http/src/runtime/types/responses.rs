//! Response bodies
//!
//! Successful responses carry `success: true`, matching the
//! `success: false` of [`ErrorResponse`](crate::runtime::error::ErrorResponse).

use serde::{Deserialize, Serialize};
use smartbiz_core::{Feedback, FeedbackAnalytics, Principal};

/// `GET /api/health`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub success: bool,
    pub message: String,
}

/// `POST /api/auth/login`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    pub token: String,
    pub user: Principal,
}

/// `GET /api/auth/me`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeResponse {
    pub success: bool,
    pub user: Principal,
}

/// Single feedback record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackResponse {
    pub success: bool,
    pub data: Feedback,
}

/// Feedback listing, newest first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackListResponse {
    pub success: bool,
    pub count: usize,
    pub data: Vec<Feedback>,
}

/// `GET /api/feedback/analytics`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsResponse {
    pub success: bool,
    pub data: FeedbackAnalytics,
}
