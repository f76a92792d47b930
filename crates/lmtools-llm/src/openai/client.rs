// OpenAI-compatible chat completions client

use crate::config::ProviderType;
use crate::error::{error_from_response, transport_error, ApiError, LlmError, Result};
use crate::traits::{ChatClient, ChatOptions, ChatRequest, ChatResponse, TokenUsage};
use crate::types::{fold_system_into_user, Message};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use serde_json::{Map, Value};

pub const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

/// OpenAI client (HTTP direct, no SDK)
#[derive(Debug)]
pub struct OpenAIClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl OpenAIClient {
    /// Create new client with API key
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key))
                .map_err(|_| LlmError::InvalidApiKey)?,
        );

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(LlmError::Client)?;

        Ok(Self {
            http_client,
            base_url: OPENAI_API_BASE.to_string(),
        })
    }

    /// Point the client at an OpenAI-compatible endpoint
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Reasoning-tier models (o1, o3, o4-mini, ...) reject system messages and
    /// `temperature`, and take `max_completion_tokens` instead of `max_tokens`.
    pub fn is_reasoning_model(model: &str) -> bool {
        model.starts_with('o')
    }

    /// Build chat completion request payload
    pub fn build_chat_request(model: &str, messages: Vec<Message>, options: &ChatOptions) -> Value {
        let is_reasoning_model = Self::is_reasoning_model(model);

        let messages = if is_reasoning_model {
            fold_system_into_user(messages)
        } else {
            messages
        };

        let mut request = Map::new();
        request.insert("model".to_string(), Value::from(model));
        request.insert(
            "messages".to_string(),
            Value::Array(messages.iter().map(Self::convert_message).collect()),
        );

        if let Some(max_tokens) = options.max_tokens {
            let token_field = if is_reasoning_model {
                "max_completion_tokens"
            } else {
                "max_tokens"
            };
            request.insert(token_field.to_string(), Value::from(max_tokens));
        }
        if let Some(temp) = options.temperature {
            // Reasoning models only accept the API default
            if !is_reasoning_model {
                request.insert("temperature".to_string(), serde_json::json!(temp));
            }
        }

        Value::Object(request)
    }

    fn convert_message(message: &Message) -> Value {
        serde_json::json!({
            "role": message.role(),
            "content": message.content(),
        })
    }

    fn parse_chat_response(raw: Value) -> std::result::Result<ChatResponse, ApiError> {
        let parsed: OpenAIChatResponse = serde_json::from_value(raw.clone()).map_err(|e| {
            ApiError::new(ProviderType::OpenAI, None, format!("Failed to parse response: {}", e))
        })?;

        let choice = parsed.choices.into_iter().next().ok_or_else(|| {
            ApiError::new(ProviderType::OpenAI, None, "No valid response received from OpenAI API")
        })?;

        let content = choice.message.content.ok_or_else(|| {
            ApiError::new(ProviderType::OpenAI, None, "OpenAI API returned an empty message")
        })?;

        Ok(ChatResponse {
            content: content.trim().to_string(),
            usage: parsed.usage.map(|u| TokenUsage {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
            }),
            finish_reason: choice.finish_reason,
            raw,
        })
    }
}

#[async_trait]
impl ChatClient for OpenAIClient {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        tracing::debug!(
            model = %request.model,
            reasoning_model = Self::is_reasoning_model(&request.model),
            "Calling OpenAI chat completions"
        );

        let payload = Self::build_chat_request(&request.model, request.messages, &request.options);

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .json(&payload)
            .send()
            .await
            .map_err(|e| transport_error(ProviderType::OpenAI, e))?;

        if !response.status().is_success() {
            return Err(error_from_response(ProviderType::OpenAI, response).await.into());
        }

        let raw: Value = response.json().await.map_err(|e| {
            ApiError::new(ProviderType::OpenAI, None, format!("Failed to parse response: {}", e))
        })?;

        Ok(Self::parse_chat_response(raw)?)
    }
}

// ============================================================================
// OPENAI-SPECIFIC RESPONSE TYPES (for Chat Completions)
// ============================================================================

#[derive(Debug, Deserialize)]
struct OpenAIChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn messages() -> Vec<Message> {
        vec![Message::system("You are terse."), Message::human("Summarize this.")]
    }

    #[test]
    fn test_reasoning_model_detection() {
        assert!(OpenAIClient::is_reasoning_model("o4-mini"));
        assert!(OpenAIClient::is_reasoning_model("o1-preview"));
        assert!(!OpenAIClient::is_reasoning_model("gpt-4.1-mini"));
    }

    #[test]
    fn test_standard_model_payload() {
        let options = ChatOptions::new().max_tokens(256).temperature(0.5);
        let payload = OpenAIClient::build_chat_request("gpt-4.1-mini", messages(), &options);

        assert_eq!(payload["max_tokens"], json!(256));
        assert_eq!(payload["temperature"], json!(0.5));
        assert!(payload.get("max_completion_tokens").is_none());
        assert_eq!(payload["messages"][0]["role"], "system");
        assert_eq!(payload["messages"][1]["role"], "user");
    }

    #[test]
    fn test_reasoning_model_payload() {
        let options = ChatOptions::new().max_tokens(256).temperature(0.5);
        let payload = OpenAIClient::build_chat_request("o4-mini", messages(), &options);

        assert_eq!(payload["max_completion_tokens"], json!(256));
        assert!(payload.get("max_tokens").is_none());
        assert!(payload.get("temperature").is_none());

        let sent = payload["messages"].as_array().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0]["role"], "user");
        assert_eq!(sent[0]["content"], "You are terse.\n\nSummarize this.");
    }

    #[test]
    fn test_parse_response_trims_first_choice() {
        let raw = json!({
            "choices": [
                {"message": {"role": "assistant", "content": "  hello \n"}, "finish_reason": "stop"},
                {"message": {"role": "assistant", "content": "ignored"}, "finish_reason": "stop"}
            ],
            "usage": {"prompt_tokens": 10, "completion_tokens": 2, "total_tokens": 12}
        });
        let response = OpenAIClient::parse_chat_response(raw).unwrap();
        assert_eq!(response.content, "hello");
        assert_eq!(response.finish_reason.as_deref(), Some("stop"));
        assert_eq!(response.usage.unwrap().output_tokens, 2);
    }

    #[test]
    fn test_parse_response_without_choices_fails() {
        let err = OpenAIClient::parse_chat_response(json!({"choices": []})).unwrap_err();
        assert_eq!(err.provider, ProviderType::OpenAI);
        assert!(err.message.contains("No valid response"));

        assert!(OpenAIClient::parse_chat_response(json!({"id": "x"})).is_err());
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = OpenAIClient::new("sk-test")
            .unwrap()
            .with_base_url("http://localhost:1234/v1/");
        assert_eq!(client.base_url(), "http://localhost:1234/v1");
    }
}
