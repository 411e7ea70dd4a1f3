//! Analysis error taxonomy
//!
//! None of these errors leave [`SentimentAnalyzer::analyze`](super::SentimentAnalyzer::analyze).
//! They exist so providers and the normalizer can report what went wrong, and
//! so the analyzer can log it before substituting the fallback.

use thiserror::Error;

/// Result type for analysis internals
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Errors raised while producing an analysis
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Network failure or non-success HTTP status from the completion service
    #[error("Upstream call failed: {message}")]
    UpstreamCallFailure {
        message: String,
        status: Option<u16>,
    },

    /// The completion service did not answer within the configured timeout
    #[error("Upstream call timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// Reply was not JSON, or not the expected shape
    #[error("Malformed response: {reason}")]
    MalformedResponse { reason: String },

    /// A parsed field had the wrong type or an out-of-enum value
    #[error("Invalid field '{field}': {reason}")]
    InvalidField { field: String, reason: String },

    /// No API key configured for the completion service
    #[error("Completion service API key is not configured")]
    MissingApiKey,
}

impl AnalysisError {
    /// Create an upstream failure without an HTTP status
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::UpstreamCallFailure {
            message: message.into(),
            status: None,
        }
    }

    /// Create an upstream failure for a non-success HTTP status
    pub fn upstream_status(status: u16, message: impl Into<String>) -> Self {
        Self::UpstreamCallFailure {
            message: message.into(),
            status: Some(status),
        }
    }

    /// Create a malformed-response error
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedResponse {
            reason: reason.into(),
        }
    }

    /// Create an invalid-field error
    pub fn invalid_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Short machine-readable label, used as a log field
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UpstreamCallFailure { .. } => "upstream_call_failure",
            Self::Timeout { .. } => "timeout",
            Self::MalformedResponse { .. } => "malformed_response",
            Self::InvalidField { .. } => "invalid_field",
            Self::MissingApiKey => "missing_api_key",
        }
    }
}

impl From<serde_json::Error> for AnalysisError {
    fn from(err: serde_json::Error) -> Self {
        Self::malformed(err.to_string())
    }
}
