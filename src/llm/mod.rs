//! Chat-completion models.
//!
//! The research layer and the agent only see [`ChatModel`]; [`OpenAiChat`]
//! talks to any OpenAI-compatible `/chat/completions` endpoint.

mod openai;

pub use openai::OpenAiChat;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("LLM api_key is not configured")]
    MissingApiKey,

    #[error("LLM request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("LLM API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("LLM returned no choices")]
    EmptyResponse,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[async_trait]
pub trait ChatModel: Send + Sync {
    fn model_name(&self) -> &str;

    /// Run one completion. Generation halts before any of the `stop` sequences.
    async fn complete(&self, messages: &[ChatMessage], stop: &[String])
        -> Result<String, LlmError>;
}
