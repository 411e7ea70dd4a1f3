//! Prompt construction for feedback analysis

/// System instruction sent with every analysis request.
pub const SYSTEM_INSTRUCTION: &str = "You are a business analytics assistant. Analyze customer feedback and provide actionable insights.";

/// Build the user prompt for a piece of feedback.
///
/// The content is embedded verbatim between double quotes. Nothing is escaped.
pub fn build_prompt(content: &str) -> String {
    format!(
        r#"Analyze the following customer feedback and provide:
1. Sentiment (positive, negative, or neutral)
2. A brief summary (2-3 sentences)
3. 3 actionable business recommendations

Feedback: "{content}"

Respond in JSON format:
{{
  "sentiment": "positive|negative|neutral",
  "sentimentScore": 0.0-1.0,
  "summary": "brief summary here",
  "recommendations": ["recommendation 1", "recommendation 2", "recommendation 3"]
}}"#
    )
}
