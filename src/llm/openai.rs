use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info};

use super::{ChatMessage, ChatModel, LlmError};
use crate::config::LlmConfig;

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    stop: &'a [String],
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
    r#type: Option<String>,
}

pub struct OpenAiChat {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
}

impl OpenAiChat {
    pub fn new(config: &LlmConfig) -> Result<Self, LlmError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.is_empty())
            .ok_or(LlmError::MissingApiKey)?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        let endpoint = format!(
            "{}/chat/completions",
            config.api_endpoint.trim_end_matches('/')
        );

        info!(
            "Initialized chat model {} with endpoint: {}",
            config.model, endpoint
        );

        Ok(Self {
            client,
            endpoint,
            api_key,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }
}

#[async_trait]
impl ChatModel for OpenAiChat {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn complete(
        &self,
        messages: &[ChatMessage],
        stop: &[String],
    ) -> Result<String, LlmError> {
        let body = ChatCompletionRequest {
            model: &self.model,
            messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            stop,
        };

        debug!(
            "Sending chat completion with {} messages to {}",
            messages.len(),
            self.model
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;

        if !status.is_success() {
            error!(
                "Chat completion failed with status {}: {}",
                status, response_text
            );

            let message = match serde_json::from_str::<ErrorResponse>(&response_text) {
                Ok(err) => match err.error.r#type {
                    Some(kind) => format!("{} (type: {})", err.error.message, kind),
                    None => err.error.message,
                },
                Err(_) => response_text,
            };

            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let completion: ChatCompletionResponse =
            serde_json::from_str(&response_text).map_err(|e| LlmError::Api {
                status: status.as_u16(),
                message: format!("Failed to parse completion response: {}", e),
            })?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(LlmError::EmptyResponse)?;

        debug!("Chat completion returned {} chars", content.len());
        Ok(content)
    }
}
