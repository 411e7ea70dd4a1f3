//! Feedback analysis pipeline
//!
//! Feedback text is wrapped in a fixed prompt and sent to a chat-completion
//! model through a [`CompletionProvider`]. The reply is reduced to a
//! [`FeedbackAnalysisResult`]. Whatever goes wrong along the way, callers get
//! a well-formed result: unusable replies are repaired where possible and
//! replaced by [`FeedbackAnalysisResult::fallback`] otherwise.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use smartbiz_core::analysis::{
//!     AnalyzerConfig, OpenAiCompletionClient, OpenAiConfig, SentimentAnalyzer,
//! };
//!
//! let client = OpenAiCompletionClient::new(OpenAiConfig {
//!     api_key: std::env::var("OPENAI_API_KEY").ok(),
//!     ..OpenAiConfig::default()
//! })?;
//! let analyzer = SentimentAnalyzer::new(Arc::new(client), AnalyzerConfig::default());
//! let result = analyzer.analyze("Delivery was late but the staff were lovely.").await;
//! println!("{} ({:.2})", result.sentiment, result.sentiment_score);
//! ```

pub mod analyzer;
pub mod error;
pub mod normalize;
#[cfg(feature = "openai")]
pub mod openai;
pub mod prompt;
pub mod provider;
pub mod types;

pub use analyzer::{AnalyzerConfig, DEFAULT_ANALYSIS_TIMEOUT, DEFAULT_MODEL, SentimentAnalyzer};
pub use error::{AnalysisError, AnalysisResult};
pub use normalize::{extract_json_object, normalize_analysis, parse_reply};
#[cfg(feature = "openai")]
pub use openai::{DEFAULT_BASE_URL, OpenAiCompletionClient, OpenAiConfig};
pub use prompt::{SYSTEM_INSTRUCTION, build_prompt};
pub use provider::{ChatMessage, ChatRole, CompletionProvider, CompletionRequest};
pub use types::{
    FALLBACK_RECOMMENDATIONS, FALLBACK_SUMMARY, FeedbackAnalysisRequest, FeedbackAnalysisResult,
    MAX_RECOMMENDATIONS, RECOMMENDATION_PLACEHOLDER, SUMMARY_PLACEHOLDER, Sentiment,
    UnknownSentiment,
};
