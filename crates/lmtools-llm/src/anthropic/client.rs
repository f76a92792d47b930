// Anthropic messages API client

use crate::config::ProviderType;
use crate::error::{error_from_response, transport_error, ApiError, LlmError, Result};
use crate::traits::{ChatClient, ChatOptions, ChatRequest, ChatResponse, TokenUsage};
use crate::types::{fold_system_into_user, Message};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use serde::Deserialize;
use serde_json::{Map, Value};

pub const ANTHROPIC_API_BASE: &str = "https://api.anthropic.com/v1";
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Anthropic client (HTTP direct, no SDK)
///
/// Sends a single user message. The system prompt is prepended to the user
/// text rather than passed as the top-level `system` field.
#[derive(Debug)]
pub struct AnthropicClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl AnthropicClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            HeaderName::from_static("x-api-key"),
            HeaderValue::from_str(&api_key).map_err(|_| LlmError::InvalidApiKey)?,
        );
        headers.insert(
            HeaderName::from_static("anthropic-version"),
            HeaderValue::from_static(ANTHROPIC_VERSION),
        );
        headers.insert(
            HeaderName::from_static("anthropic-dangerous-direct-browser-access"),
            HeaderValue::from_static("true"),
        );

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(LlmError::Client)?;

        Ok(Self {
            http_client,
            base_url: ANTHROPIC_API_BASE.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build messages request payload
    pub fn build_messages_request(model: &str, messages: Vec<Message>, options: &ChatOptions) -> Value {
        let messages = fold_system_into_user(messages);

        let mut request = Map::new();
        request.insert("model".to_string(), Value::from(model));
        // max_tokens is mandatory for this API
        request.insert(
            "max_tokens".to_string(),
            Value::from(options.max_tokens.unwrap_or(1024)),
        );
        if let Some(temp) = options.temperature {
            request.insert("temperature".to_string(), serde_json::json!(temp));
        }
        request.insert(
            "messages".to_string(),
            Value::Array(
                messages
                    .iter()
                    .map(|m| serde_json::json!({"role": m.role(), "content": m.content()}))
                    .collect(),
            ),
        );

        Value::Object(request)
    }

    fn parse_messages_response(raw: Value) -> std::result::Result<ChatResponse, ApiError> {
        let parsed: AnthropicMessagesResponse = serde_json::from_value(raw.clone()).map_err(|e| {
            ApiError::new(ProviderType::Anthropic, None, format!("Failed to parse response: {}", e))
        })?;

        let block = parsed.content.into_iter().next().ok_or_else(|| {
            ApiError::new(ProviderType::Anthropic, None, "No valid response received from Anthropic API")
        })?;

        let text = block.text.ok_or_else(|| {
            ApiError::new(ProviderType::Anthropic, None, "Anthropic API returned a non-text content block")
        })?;

        Ok(ChatResponse {
            content: text.trim().to_string(),
            usage: parsed.usage.map(|u| TokenUsage {
                input_tokens: u.input_tokens,
                output_tokens: u.output_tokens,
            }),
            finish_reason: parsed.stop_reason,
            raw,
        })
    }
}

#[async_trait]
impl ChatClient for AnthropicClient {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        tracing::debug!(model = %request.model, "Calling Anthropic messages API");

        let payload = Self::build_messages_request(&request.model, request.messages, &request.options);

        let response = self
            .http_client
            .post(format!("{}/messages", self.base_url))
            .json(&payload)
            .send()
            .await
            .map_err(|e| transport_error(ProviderType::Anthropic, e))?;

        if !response.status().is_success() {
            return Err(error_from_response(ProviderType::Anthropic, response).await.into());
        }

        let raw: Value = response.json().await.map_err(|e| {
            ApiError::new(ProviderType::Anthropic, None, format!("Failed to parse response: {}", e))
        })?;

        Ok(Self::parse_messages_response(raw)?)
    }
}

// ============================================================================
// ANTHROPIC-SPECIFIC RESPONSE TYPES
// ============================================================================

#[derive(Debug, Deserialize)]
struct AnthropicMessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
    stop_reason: Option<String>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    input_tokens: u32,
    output_tokens: u32,
}
