//! Chat-completion API client
//!
//! Used by the material extractor (JSON output) and the draft writer
//! (outline JSON, draft text, lengthen pass). The [`ChatBackend`] trait is the
//! seam the stages depend on, so tests can script responses.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use storyline_common::config::LlmConfig;
use thiserror::Error;

const USER_AGENT: &str = concat!("storyline-wizard/", env!("CARGO_PKG_VERSION"));

/// Chat-completion client errors
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("LLM API key is not configured")]
    MissingApiKey,

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("LLM returned an empty message")]
    EmptyResponse,
}

/// One chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
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

/// Provider-independent completion request
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub top_p: Option<f32>,
    pub max_tokens: u32,
}

impl ChatRequest {
    /// System + user prompt pair
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            messages: vec![ChatMessage::system(system), ChatMessage::user(user)],
            temperature: 0.7,
            top_p: None,
            max_tokens: 1_000,
        }
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn top_p(mut self, top_p: f32) -> Self {
        self.top_p = Some(top_p);
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// The user prompt (last user message)
    pub fn user_prompt(&self) -> &str {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == "user")
            .map(|m| m.content.as_str())
            .unwrap_or("")
    }
}

/// Anything that turns a chat request into assistant text
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn complete(&self, request: ChatRequest) -> Result<String, LlmError>;
}

/// Slice out the JSON object between the first `{` and the last `}`.
///
/// Models often wrap JSON in prose or code fences; everything outside the
/// outermost braces is ignored.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// Parse the JSON object embedded in an assistant message
pub fn parse_json_object(text: &str) -> Result<serde_json::Value, LlmError> {
    let slice = extract_json_object(text)
        .ok_or_else(|| LlmError::ParseError("no JSON object in response".to_string()))?;
    serde_json::from_str(slice).map_err(|e| LlmError::ParseError(e.to_string()))
}

#[derive(Serialize)]
struct WireRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct WireResponse {
    choices: Vec<WireChoice>,
}

#[derive(Deserialize)]
struct WireChoice {
    message: WireMessage,
}

#[derive(Deserialize)]
struct WireMessage {
    content: Option<String>,
}

/// OpenAI-compatible `/v1/chat/completions` client
pub struct OpenAiChatClient {
    http_client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

impl OpenAiChatClient {
    pub fn new(config: &LlmConfig) -> Result<Self, LlmError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| LlmError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            api_key: config.api_key.clone().filter(|k| !k.trim().is_empty()),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }
}

#[async_trait]
impl ChatBackend for OpenAiChatClient {
    async fn complete(&self, request: ChatRequest) -> Result<String, LlmError> {
        let api_key = self.api_key.as_deref().ok_or(LlmError::MissingApiKey)?;

        let body = WireRequest {
            model: &self.model,
            messages: &request.messages,
            temperature: request.temperature,
            top_p: request.top_p,
            max_tokens: request.max_tokens,
        };

        tracing::debug!(
            model = %self.model,
            max_tokens = request.max_tokens,
            prompt_chars = request.user_prompt().chars().count(),
            "Sending chat completion request"
        );

        let response = self
            .http_client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "Chat completion request rejected");
            return Err(LlmError::ApiError(status.as_u16(), error_text));
        }

        let parsed: WireResponse = response
            .json()
            .await
            .map_err(|e| LlmError::ParseError(e.to_string()))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or(LlmError::EmptyResponse)?;

        tracing::debug!(chars = content.chars().count(), "Chat completion received");
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_json_object_with_prose() {
        let text = "Sure! Here it is:\n```json\n{\"a\": {\"b\": 1}}\n```\nAnything else?";
        assert_eq!(extract_json_object(text), Some("{\"a\": {\"b\": 1}}"));
    }

    #[test]
    fn test_extract_json_object_missing() {
        assert_eq!(extract_json_object("no braces here"), None);
        assert_eq!(extract_json_object("} backwards {"), None);
    }

    #[test]
    fn test_parse_json_object_malformed() {
        let err = parse_json_object("{not json}").unwrap_err();
        assert!(matches!(err, LlmError::ParseError(_)));
    }

    #[test]
    fn test_request_builder() {
        let req = ChatRequest::new("sys", "hello")
            .temperature(0.3)
            .top_p(0.9)
            .max_tokens(4_000);
        assert_eq!(req.messages.len(), 2);
        assert_eq!(req.messages[0].role, "system");
        assert_eq!(req.user_prompt(), "hello");
        assert_eq!(req.top_p, Some(0.9));
        assert_eq!(req.max_tokens, 4_000);
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_without_network() {
        let client = OpenAiChatClient::new(&LlmConfig::default()).unwrap();
        let err = client.complete(ChatRequest::new("s", "u")).await.unwrap_err();
        assert!(matches!(err, LlmError::MissingApiKey));
    }

    #[tokio::test]
    async fn test_blank_api_key_treated_as_missing() {
        let config = LlmConfig {
            api_key: Some("   ".to_string()),
            ..LlmConfig::default()
        };
        let client = OpenAiChatClient::new(&config).unwrap();
        let err = client.complete(ChatRequest::new("s", "u")).await.unwrap_err();
        assert!(matches!(err, LlmError::MissingApiKey));
    }
}
