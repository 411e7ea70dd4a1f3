//! Per-user feedback analytics

use serde::{Deserialize, Serialize};

use crate::analysis::Sentiment;
use crate::feedback::Feedback;

/// Maximum number of recommendations surfaced by analytics
pub const MAX_ANALYTICS_RECOMMENDATIONS: usize = 10;

/// Sentiment counts and collected recommendations for one user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackAnalytics {
    pub total_count: usize,
    pub positive_count: usize,
    pub negative_count: usize,
    pub neutral_count: usize,
    /// First distinct non-empty recommendations, in record order
    pub recommendations: Vec<String>,
}

impl FeedbackAnalytics {
    pub fn from_feedback(feedback: &[Feedback]) -> Self {
        let mut analytics = Self {
            total_count: feedback.len(),
            ..Self::default()
        };

        for record in feedback {
            match record.sentiment {
                Sentiment::Positive => analytics.positive_count += 1,
                Sentiment::Negative => analytics.negative_count += 1,
                Sentiment::Neutral => analytics.neutral_count += 1,
            }

            for recommendation in &record.recommendations {
                if analytics.recommendations.len() >= MAX_ANALYTICS_RECOMMENDATIONS {
                    break;
                }
                if !recommendation.is_empty() && !analytics.recommendations.contains(recommendation) {
                    analytics.recommendations.push(recommendation.clone());
                }
            }
        }

        analytics
    }
}
