//! Analysis request and result types
//!
//! [`FeedbackAnalysisResult`] is the single output shape of the analysis
//! pipeline. Successful analyses and the fixed fallback share it, so callers
//! persist and render both the same way.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Summary used when the upstream reply carries none.
pub const SUMMARY_PLACEHOLDER: &str = "Summary not available";

/// Recommendation list used when the upstream reply carries none.
pub const RECOMMENDATION_PLACEHOLDER: &str = "No specific recommendations available";

/// Summary of the fixed fallback result.
pub const FALLBACK_SUMMARY: &str =
    "Unable to analyze feedback at this time. Please try again later.";

/// Recommendations of the fixed fallback result.
pub const FALLBACK_RECOMMENDATIONS: [&str; 3] = [
    "Review the feedback manually",
    "Consider customer follow-up",
    "Monitor similar feedback patterns",
];

/// Maximum number of recommendations kept from an upstream reply.
pub const MAX_RECOMMENDATIONS: usize = 3;

/// Categorical polarity of a piece of feedback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    /// All sentiment values, in display order.
    pub const ALL: [Sentiment; 3] = [Sentiment::Positive, Sentiment::Negative, Sentiment::Neutral];

    /// Wire representation of the sentiment
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
        }
    }

    /// Score synthesized when the upstream reply has no usable number.
    pub fn default_score(&self) -> f64 {
        match self {
            Self::Positive => 0.8,
            Self::Negative => 0.2,
            Self::Neutral => 0.5,
        }
    }

    /// Exact, case-sensitive match against the lower-case literals.
    ///
    /// `"Positive"` and `"POSITIVE"` are not recognized.
    pub fn from_exact(value: &str) -> Option<Self> {
        match value {
            "positive" => Some(Self::Positive),
            "negative" => Some(Self::Negative),
            "neutral" => Some(Self::Neutral),
            _ => None,
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown sentiment label
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sentiment '{0}', expected positive, negative or neutral")]
pub struct UnknownSentiment(pub String);

impl FromStr for Sentiment {
    type Err = UnknownSentiment;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_exact(s).ok_or_else(|| UnknownSentiment(s.to_string()))
    }
}

/// Input to the analysis pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackAnalysisRequest {
    /// Raw user-supplied feedback text
    pub content: String,
}

impl FeedbackAnalysisRequest {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

/// Normalized output of a feedback analysis
///
/// Invariants: `sentiment_score` is within `[0.0, 1.0]` and
/// `recommendations` holds at most [`MAX_RECOMMENDATIONS`] entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackAnalysisResult {
    pub sentiment: Sentiment,
    pub sentiment_score: f64,
    pub summary: String,
    pub recommendations: Vec<String>,
}

impl FeedbackAnalysisResult {
    /// The fixed result substituted whenever analysis cannot complete.
    pub fn fallback() -> Self {
        Self {
            sentiment: Sentiment::Neutral,
            sentiment_score: Sentiment::Neutral.default_score(),
            summary: FALLBACK_SUMMARY.to_string(),
            recommendations: FALLBACK_RECOMMENDATIONS
                .iter()
                .map(|r| (*r).to_string())
                .collect(),
        }
    }

    /// Whether this result is indistinguishable from the fixed fallback.
    ///
    /// A genuine analysis that happens to reproduce the fallback literals
    /// also returns `true`.
    pub fn is_fallback(&self) -> bool {
        *self == Self::fallback()
    }
}
