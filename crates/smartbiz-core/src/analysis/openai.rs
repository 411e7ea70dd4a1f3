//! OpenAI-compatible chat-completions provider
//!
//! Posts to `{base_url}/chat/completions` with bearer authentication and
//! returns `choices[0].message.content`. Any server speaking the same wire
//! format works, which is how the tests point it at a local mock.
//!
//! # Error mapping
//!
//! | Condition | Error |
//! |-----------|-------|
//! | No API key configured | `MissingApiKey` (no request is sent) |
//! | Client-side timeout | `Timeout` |
//! | Connection failure | `UpstreamCallFailure` |
//! | Non-2xx status | `UpstreamCallFailure` with `status` |
//! | Body without `choices[0].message.content` | `MalformedResponse` |

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::analyzer::DEFAULT_ANALYSIS_TIMEOUT;
use super::error::{AnalysisError, AnalysisResult};
use super::provider::{CompletionProvider, CompletionRequest};

/// Default base URL of the hosted API
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Connection settings for [`OpenAiCompletionClient`]
#[derive(Clone)]
pub struct OpenAiConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            timeout: DEFAULT_ANALYSIS_TIMEOUT,
        }
    }
}

impl std::fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("base_url", &self.base_url)
            .field("has_api_key", &self.api_key.is_some())
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// reqwest-backed [`CompletionProvider`]
#[derive(Clone)]
pub struct OpenAiCompletionClient {
    endpoint: String,
    api_key: Option<String>,
    timeout: Duration,
    http: Client,
}

impl std::fmt::Debug for OpenAiCompletionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiCompletionClient")
            .field("endpoint", &self.endpoint)
            .field("has_api_key", &self.api_key.is_some())
            .finish()
    }
}

impl OpenAiCompletionClient {
    /// Create a client from connection settings
    pub fn new(config: OpenAiConfig) -> AnalysisResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(format!("smartbiz-core/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AnalysisError::upstream(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            api_key: config.api_key.filter(|key| !key.trim().is_empty()),
            timeout: config.timeout,
            http,
        })
    }

    /// Full URL of the completions endpoint
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn map_send_error(&self, err: reqwest::Error) -> AnalysisError {
        if err.is_timeout() {
            AnalysisError::Timeout {
                timeout_ms: self.timeout.as_millis() as u64,
            }
        } else {
            AnalysisError::upstream(format!("Failed to reach completion service: {}", err))
        }
    }
}

#[async_trait]
impl CompletionProvider for OpenAiCompletionClient {
    async fn complete(&self, request: &CompletionRequest) -> AnalysisResult<String> {
        let api_key = self.api_key.as_deref().ok_or(AnalysisError::MissingApiKey)?;

        debug!(url = %self.endpoint, model = %request.model, "Requesting chat completion");

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AnalysisError::upstream_status(
                status.as_u16(),
                format!("HTTP {}: {}", status, error_text),
            ));
        }

        let body: ChatCompletionResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                self.map_send_error(e)
            } else {
                AnalysisError::malformed(format!("Failed to parse completion body: {}", e))
            }
        })?;

        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .ok_or_else(|| AnalysisError::malformed("reply has no choices[0].message.content"))
    }
}
