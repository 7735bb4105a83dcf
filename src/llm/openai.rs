//! `OpenAI`-compatible chat-completions provider

use super::config::CompletionConfig;
use super::{CompletionService, LlmError};
use crate::conversation::Message;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

/// Chat-completions client bound to one model and temperature
pub struct OpenAIService {
    client: Client,
    api_key: String,
    config: CompletionConfig,
    endpoint: String,
}

impl OpenAIService {
    pub fn new(
        api_key: String,
        config: CompletionConfig,
        endpoint: &str,
    ) -> Result<Self, LlmError> {
        // No request timeout: a hung call keeps the session in flight.
        let client = Client::builder()
            .build()
            .map_err(|e| LlmError::unknown(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            config,
            endpoint: endpoint.to_string(),
        })
    }

    fn translate_request<'a>(&'a self, messages: &'a [Message]) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.config.model,
            messages: messages
                .iter()
                .map(|m| ChatMessage {
                    role: m.role.as_str(),
                    content: &m.content,
                })
                .collect(),
            temperature: self.config.temperature,
        }
    }

    /// Only `choices[0].message.content` is read
    fn normalize_response(resp: ChatResponse) -> Result<String, LlmError> {
        let choice = resp
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::malformed("No choices in response"))?;

        let content = choice
            .message
            .content
            .ok_or_else(|| LlmError::malformed("First choice has no message content"))?;

        let reply = content.trim();
        if reply.is_empty() {
            return Err(LlmError::malformed("Completion content is empty"));
        }
        Ok(reply.to_string())
    }

    fn classify_status(status: StatusCode, body: &str) -> LlmError {
        if let Ok(error_resp) = serde_json::from_str::<ErrorResponse>(body) {
            let message = error_resp.error.message;
            return match status.as_u16() {
                401 | 403 => LlmError::auth(format!("Authentication failed: {message}")),
                429 => LlmError::rate_limit(format!("Rate limit exceeded: {message}")),
                400 => LlmError::invalid_request(format!("Invalid request: {message}")),
                500..=599 => LlmError::server_error(format!("Server error: {message}")),
                _ => LlmError::unknown(format!("HTTP {status}: {message}")),
            };
        }
        match status.as_u16() {
            401 | 403 => LlmError::auth(format!("HTTP {status}")),
            500..=599 => LlmError::server_error(format!("HTTP {status} error: {body}")),
            _ => LlmError::unknown(format!("HTTP {status} error: {body}")),
        }
    }
}

#[async_trait]
impl CompletionService for OpenAIService {
    async fn complete(&self, messages: &[Message]) -> Result<String, LlmError> {
        let request = self.translate_request(messages);

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::network(format!("Request timeout: {e}"))
                } else if e.is_connect() {
                    LlmError::network(format!("Connection failed: {e}"))
                } else {
                    LlmError::unknown(format!("Request failed: {e}"))
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| LlmError::network(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(Self::classify_status(status, &body));
        }

        let chat_response: ChatResponse = serde_json::from_str(&body).map_err(|e| {
            LlmError::malformed(format!("Failed to parse response: {e} - body: {body}"))
        })?;

        Self::normalize_response(chat_response)
    }

    fn model_id(&self) -> &str {
        &self.config.model
    }
}

// Wire types

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}
