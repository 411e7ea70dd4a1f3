//! Sentiment analyzer
//!
//! [`SentimentAnalyzer::analyze`] is total: every failure inside the pipeline
//! is logged and replaced by [`FeedbackAnalysisResult::fallback`].

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use super::error::{AnalysisError, AnalysisResult};
use super::normalize::parse_reply;
use super::prompt::{SYSTEM_INSTRUCTION, build_prompt};
use super::provider::{ChatMessage, CompletionProvider, CompletionRequest};
use super::types::{FeedbackAnalysisRequest, FeedbackAnalysisResult};

/// Default chat model
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Default upstream timeout
pub const DEFAULT_ANALYSIS_TIMEOUT: Duration = Duration::from_secs(30);

/// Parameters of each completion request
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzerConfig {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Upper bound on the whole upstream call
    pub timeout: Duration,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
            max_tokens: 500,
            timeout: DEFAULT_ANALYSIS_TIMEOUT,
        }
    }
}

impl AnalyzerConfig {
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Classifies feedback through a [`CompletionProvider`]
#[derive(Clone)]
pub struct SentimentAnalyzer {
    provider: Arc<dyn CompletionProvider>,
    config: AnalyzerConfig,
}

impl std::fmt::Debug for SentimentAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SentimentAnalyzer")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl SentimentAnalyzer {
    pub fn new(provider: Arc<dyn CompletionProvider>, config: AnalyzerConfig) -> Self {
        Self { provider, config }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Analyze a piece of feedback. Never fails.
    pub async fn analyze(&self, content: &str) -> FeedbackAnalysisResult {
        match self.try_analyze(content).await {
            Ok(result) => result,
            Err(err) => {
                warn!(
                    error = %err,
                    error_kind = err.kind(),
                    model = %self.config.model,
                    "Feedback analysis failed, using fallback result"
                );
                FeedbackAnalysisResult::fallback()
            }
        }
    }

    /// Analyze a request value
    pub async fn analyze_request(&self, request: &FeedbackAnalysisRequest) -> FeedbackAnalysisResult {
        self.analyze(&request.content).await
    }

    /// Build the completion request sent for `content`
    pub fn completion_request(&self, content: &str) -> CompletionRequest {
        CompletionRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage::system(SYSTEM_INSTRUCTION),
                ChatMessage::user(build_prompt(content)),
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        }
    }

    async fn try_analyze(&self, content: &str) -> AnalysisResult<FeedbackAnalysisResult> {
        let request = self.completion_request(content);
        let timeout = self.config.timeout;

        let reply = tokio::time::timeout(timeout, self.provider.complete(&request))
            .await
            .map_err(|_| AnalysisError::Timeout {
                timeout_ms: timeout.as_millis() as u64,
            })??;

        debug!(reply_len = reply.len(), "Received completion reply");
        parse_reply(&reply)
    }
}
