//! Completion provider seam
//!
//! The analyzer talks to the language model only through [`CompletionProvider`].
//! The production implementation is
//! [`OpenAiCompletionClient`](super::openai::OpenAiCompletionClient). Tests
//! substitute scripted providers.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::error::AnalysisResult;

/// Role of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
}

/// A single chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// Chat-completion request body
///
/// Serializes to the `{model, messages, temperature, max_tokens}` shape of the
/// OpenAI chat-completions endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Source of chat completions
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Send one completion request and return the text of the first choice.
    async fn complete(&self, request: &CompletionRequest) -> AnalysisResult<String>;
}
