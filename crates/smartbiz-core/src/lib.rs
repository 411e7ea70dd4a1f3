//! # SmartBiz Core
//!
//! Domain types and service seams for the SmartBiz feedback service:
//! the feedback-analysis contract and its fallback policy, feedback records
//! and storage, per-user analytics, authentication and input validation.

pub mod analysis;
pub mod analytics;
pub mod auth;
pub mod feedback;
pub mod repository;
pub mod validation;

pub use analysis::{
    AnalysisError, AnalysisResult, AnalyzerConfig, CompletionProvider, CompletionRequest,
    FeedbackAnalysisRequest, FeedbackAnalysisResult, Sentiment, SentimentAnalyzer,
};
#[cfg(feature = "openai")]
pub use analysis::{OpenAiCompletionClient, OpenAiConfig};
pub use analytics::FeedbackAnalytics;
pub use auth::{
    AuthError, Authenticator, DemoCredentials, LoginGrant, Principal,
    StaticCredentialAuthenticator,
};
pub use feedback::{Feedback, FeedbackId};
pub use repository::{
    FeedbackRepository, InMemoryFeedbackRepository, RepositoryError, RepositoryResult,
};
pub use validation::{FieldError, ValidationError};
