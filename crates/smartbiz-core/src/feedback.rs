//! Stored feedback records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::analysis::{FeedbackAnalysisResult, Sentiment};

/// Identifier of a stored feedback record
///
/// Generated ids look like `feedback-<32 hex chars>`. Ids arriving from
/// request paths are not validated; an unknown id simply finds nothing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeedbackId(String);

impl FeedbackId {
    /// Generate a fresh random id
    pub fn generate() -> Self {
        Self(format!("feedback-{}", Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for FeedbackId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for FeedbackId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for FeedbackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A piece of feedback together with its analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub id: FeedbackId,
    /// Id of the owning principal
    pub user: String,
    /// Trimmed, HTML-escaped submission
    pub content: String,
    pub sentiment: Sentiment,
    pub sentiment_score: f64,
    pub summary: String,
    pub recommendations: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Feedback {
    /// Build a new record from stored content and its analysis.
    ///
    /// `user` is left empty; the repository stamps it on append.
    pub fn new(content: impl Into<String>, analysis: FeedbackAnalysisResult) -> Self {
        let now = Utc::now();
        Self {
            id: FeedbackId::generate(),
            user: String::new(),
            content: content.into(),
            sentiment: analysis.sentiment,
            sentiment_score: analysis.sentiment_score,
            summary: analysis.summary,
            recommendations: analysis.recommendations,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user == user_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_id_format() {
        let id = FeedbackId::generate();
        let hex = id.as_str().strip_prefix("feedback-").unwrap();
        assert_eq!(hex.len(), 32);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(id, FeedbackId::generate());
    }

    #[test]
    fn test_feedback_serializes_camel_case() {
        let feedback = Feedback::new("Nice shop", FeedbackAnalysisResult::fallback());
        let value = serde_json::to_value(&feedback).unwrap();

        assert!(value["id"].as_str().unwrap().starts_with("feedback-"));
        assert_eq!(value["sentiment"], "neutral");
        assert_eq!(value["sentimentScore"], 0.5);
        assert!(value.get("createdAt").is_some());
        assert!(value.get("updatedAt").is_some());
        assert!(value.get("created_at").is_none());
        assert_eq!(feedback.created_at, feedback.updated_at);
    }

    #[test]
    fn test_record_carries_analysis_fields() {
        let analysis = FeedbackAnalysisResult::fallback();
        let feedback = Feedback::new("text", analysis.clone());
        assert_eq!(feedback.sentiment, analysis.sentiment);
        assert_eq!(feedback.sentiment_score, analysis.sentiment_score);
        assert_eq!(feedback.summary, analysis.summary);
        assert_eq!(feedback.recommendations, analysis.recommendations);
        assert!(feedback.user.is_empty());
        assert!(!feedback.is_owned_by("demo-user-123"));
    }
}
