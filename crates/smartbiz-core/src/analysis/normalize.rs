//! Reply extraction and normalization
//!
//! The model is asked for JSON but often wraps it in prose or code fences.
//! [`extract_json_object`] applies a greedy brace heuristic: from the first `{`
//! to the last `}`. Braces in surrounding prose can select the wrong
//! substring. The parse then fails and the analyzer falls back, which is
//! routine.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

use super::error::{AnalysisError, AnalysisResult};
use super::types::{
    FeedbackAnalysisResult, MAX_RECOMMENDATIONS, RECOMMENDATION_PLACEHOLDER, SUMMARY_PLACEHOLDER,
    Sentiment,
};

static JSON_OBJECT: Lazy<Regex> = Lazy::new(|| {
    // Greedy on purpose: spans nested objects inside the reply.
    Regex::new(r"(?s)\{.*\}").expect("static JSON object pattern is valid")
});

/// Return the brace-delimited substring of `text`, if any.
pub fn extract_json_object(text: &str) -> Option<&str> {
    JSON_OBJECT.find(text).map(|m| m.as_str())
}

/// Parse a raw model reply into a normalized result.
///
/// Uses the extracted brace substring when one exists, else the whole trimmed
/// reply.
pub fn parse_reply(reply: &str) -> AnalysisResult<FeedbackAnalysisResult> {
    let trimmed = reply.trim();
    let candidate = extract_json_object(trimmed).unwrap_or(trimmed);
    let value: Value = serde_json::from_str(candidate)?;
    normalize_analysis(value)
}

/// Normalize a parsed reply object.
///
/// Field-level problems are repaired here, not reported: unknown sentiment,
/// missing score, odd recommendation shapes. Only a non-object payload is an
/// error.
pub fn normalize_analysis(value: Value) -> AnalysisResult<FeedbackAnalysisResult> {
    let Value::Object(fields) = value else {
        return Err(AnalysisError::malformed(format!(
            "expected a JSON object, got {}",
            json_type_name(&value)
        )));
    };

    let sentiment = normalize_sentiment(&fields);
    let sentiment_score = normalize_score(&fields, sentiment);
    let summary = normalize_summary(&fields);
    let recommendations = normalize_recommendations(&fields);

    Ok(FeedbackAnalysisResult {
        sentiment,
        sentiment_score,
        summary,
        recommendations,
    })
}

fn normalize_sentiment(fields: &Map<String, Value>) -> Sentiment {
    let raw = fields.get("sentiment");
    match raw.and_then(Value::as_str).and_then(Sentiment::from_exact) {
        Some(sentiment) => sentiment,
        None => {
            let err = AnalysisError::invalid_field(
                "sentiment",
                format!("{} is not one of positive|negative|neutral", describe(raw)),
            );
            tracing::debug!(error = %err, "Coercing sentiment to neutral");
            Sentiment::Neutral
        }
    }
}

fn normalize_score(fields: &Map<String, Value>, sentiment: Sentiment) -> f64 {
    let raw = fields.get("sentimentScore");
    match raw.and_then(Value::as_f64).filter(|s| s.is_finite()) {
        Some(score) => score.clamp(0.0, 1.0),
        None => {
            let err = AnalysisError::invalid_field(
                "sentimentScore",
                format!("{} is not a number", describe(raw)),
            );
            tracing::debug!(error = %err, %sentiment, "Synthesizing score from sentiment");
            sentiment.default_score()
        }
    }
}

fn normalize_summary(fields: &Map<String, Value>) -> String {
    match fields.get("summary").and_then(Value::as_str) {
        Some(summary) if !summary.is_empty() => summary.to_string(),
        _ => SUMMARY_PLACEHOLDER.to_string(),
    }
}

fn normalize_recommendations(fields: &Map<String, Value>) -> Vec<String> {
    match fields.get("recommendations") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(render_recommendation)
            .take(MAX_RECOMMENDATIONS)
            .collect(),
        Some(value) if is_truthy(value) => render_recommendation(value).into_iter().collect(),
        _ => vec![RECOMMENDATION_PLACEHOLDER.to_string()],
    }
}

fn render_recommendation(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// JavaScript-style truthiness of a JSON value
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn describe(value: Option<&Value>) -> String {
    match value {
        None => "missing value".to_string(),
        Some(v) => format!("{} value {}", json_type_name(v), v),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
