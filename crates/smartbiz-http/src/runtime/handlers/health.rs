//! Health check handler

use axum::response::Json;

use crate::runtime::types::HealthResponse;

/// GET /api/health - Liveness check
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        success: true,
        message: "Server is running".to_string(),
    })
}
