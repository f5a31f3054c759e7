//! LLM Client: the single point of entry for all completion calls.
//!
//! ARCHITECTURAL RULE: No other module may call the Anthropic API directly.
//! All LLM interactions MUST go through a `CompletionOracle`.
//!
//! One blocking request per call: no retries, no streaming, transport defaults.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod models;
pub mod prompts;

pub use models::ModelId;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
pub const DEFAULT_MAX_TOKENS: u32 = 4000;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("API key is not configured")]
    MissingCredential,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// Parameters of a single completion call.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub prompt: String,
    pub model: ModelId,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Omitted from the request body when `None` or empty.
    pub system: Option<String>,
}

impl CompletionRequest {
    pub fn new(prompt: String, model: ModelId, temperature: f32) -> Self {
        Self {
            prompt,
            model,
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature,
            system: None,
        }
    }

    pub fn with_system(mut self, system: &str) -> Self {
        self.system = Some(system.to_string());
        self
    }
}

/// The remote text-completion service, seen as an opaque oracle.
///
/// Carried in `AppState` as `Arc<dyn CompletionOracle>` so tests can swap in a stub.
#[async_trait]
pub trait CompletionOracle: Send + Sync {
    /// Sends one completion request and returns the text of the first text block.
    /// `api_key` is resolved by the caller at point of use.
    async fn complete(
        &self,
        api_key: Option<&str>,
        request: &CompletionRequest,
    ) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    messages: Vec<AnthropicMessage<'a>>,
}

impl<'a> AnthropicRequest<'a> {
    fn from_request(request: &'a CompletionRequest) -> Self {
        Self {
            model: request.model.as_str(),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            system: request.system.as_deref().filter(|s| !s.is_empty()),
            messages: vec![AnthropicMessage {
                role: "user",
                content: &request.prompt,
            }],
        }
    }
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LlmResponse {
    pub content: Vec<ContentBlock>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl LlmResponse {
    /// Extracts the text content from the first text block.
    pub fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text.as_deref())
    }
}

/// Anthropic Messages API client.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_url: String,
}

impl LlmClient {
    pub fn new() -> Self {
        Self::with_url(ANTHROPIC_API_URL)
    }

    pub fn with_url(api_url: &str) -> Self {
        Self {
            client: Client::new(),
            api_url: api_url.to_string(),
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }
}

impl Default for LlmClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompletionOracle for LlmClient {
    async fn complete(
        &self,
        api_key: Option<&str>,
        request: &CompletionRequest,
    ) -> Result<String, LlmError> {
        let api_key = api_key
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(LlmError::MissingCredential)?;

        let body = AnthropicRequest::from_request(request);

        let response = self
            .client
            .post(&self.api_url)
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let raw = response.text().await?;

        if !status.is_success() {
            warn!("LLM API returned {}", status);
            return Err(LlmError::Api {
                status: status.as_u16(),
                body: raw,
            });
        }

        let text = parse_completion_text(&raw)?;

        debug!(
            "LLM call succeeded: model={}, prompt_bytes={}, completion_bytes={}",
            request.model,
            request.prompt.len(),
            text.len()
        );

        Ok(text)
    }
}

/// Parses a Messages API success payload and returns the first text block.
fn parse_completion_text(raw: &str) -> Result<String, LlmError> {
    let parsed: LlmResponse = serde_json::from_str(raw)?;
    if let Some(usage) = &parsed.usage {
        debug!(
            "Token usage: input_tokens={}, output_tokens={}",
            usage.input_tokens, usage.output_tokens
        );
    }
    parsed
        .text()
        .map(str::to_string)
        .ok_or(LlmError::EmptyContent)
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
/// A leading or trailing marker is removed even if its partner is missing.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let text = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```JSON"))
        .or_else(|| text.strip_prefix("```"))
        .unwrap_or(text)
        .trim();
    text.strip_suffix("```").unwrap_or(text).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_unbalanced() {
        assert_eq!(strip_json_fences("```json\n{}"), "{}");
        assert_eq!(strip_json_fences("{}\n```"), "{}");
    }

    #[test]
    fn test_request_body_omits_empty_system() {
        let req = CompletionRequest::new("hi".into(), ModelId::Claude3Haiku, 0.3);
        let json = serde_json::to_value(AnthropicRequest::from_request(&req)).unwrap();
        assert!(json.get("system").is_none());
        assert_eq!(json["model"], "claude-3-haiku-20240307");
        assert_eq!(json["max_tokens"], 4000);
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "hi");

        let req = req.with_system("");
        let json = serde_json::to_value(AnthropicRequest::from_request(&req)).unwrap();
        assert!(json.get("system").is_none());
    }

    #[test]
    fn test_request_body_includes_system() {
        let req = CompletionRequest::new("hi".into(), ModelId::Claude3Opus, 0.0)
            .with_system("be terse");
        let json = serde_json::to_value(AnthropicRequest::from_request(&req)).unwrap();
        assert_eq!(json["system"], "be terse");
        assert_eq!(json["temperature"], 0.0);
    }

    #[test]
    fn test_parse_completion_text_takes_first_text_block() {
        let raw = r#"{
            "content": [
                {"type": "tool_use", "id": "t1"},
                {"type": "text", "text": "first"},
                {"type": "text", "text": "second"}
            ],
            "usage": {"input_tokens": 10, "output_tokens": 2}
        }"#;
        assert_eq!(parse_completion_text(raw).unwrap(), "first");
    }

    #[test]
    fn test_parse_completion_text_missing_content() {
        assert!(matches!(
            parse_completion_text(r#"{"content": []}"#),
            Err(LlmError::EmptyContent)
        ));
        assert!(matches!(
            parse_completion_text(r#"{"id": "msg"}"#),
            Err(LlmError::Parse(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_credential_sends_nothing() {
        // Unroutable URL: a request attempt would surface as Http, not MissingCredential.
        let client = LlmClient::with_url("http://127.0.0.1:9/v1/messages");
        let req = CompletionRequest::new("hi".into(), ModelId::default(), 0.3);
        assert!(matches!(
            client.complete(None, &req).await,
            Err(LlmError::MissingCredential)
        ));
        assert!(matches!(
            client.complete(Some("   "), &req).await,
            Err(LlmError::MissingCredential)
        ));
    }
}
