//! Request and response bodies of the HTTP API

pub mod requests;
pub mod responses;

pub use requests::{CreateFeedbackRequest, LoginRequest};
pub use responses::{
    AnalyticsResponse, FeedbackListResponse, FeedbackResponse, HealthResponse, LoginResponse,
    MeResponse,
};
