// Maps an ApiConfig snapshot onto the matching provider client

use crate::anthropic::AnthropicClient;
use crate::config::{ApiConfig, ProviderType};
use crate::error::{LlmError, Result};
use crate::openai::OpenAIClient;
use crate::traits::{ChatClient, ChatOptions, ChatRequest, CompletionProvider};
use crate::types::Message;
use async_trait::async_trait;

/// Provider-agnostic completion entry point.
///
/// A fresh client is built from the config on every call, so settings
/// changes take effect on the next action.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProviderAdapter;

impl ProviderAdapter {
    pub fn new() -> Self {
        Self
    }

    /// Create the chat client for the configured provider
    pub fn create_client(config: &ApiConfig) -> Result<Box<dyn ChatClient>> {
        match config.provider {
            ProviderType::OpenAI => {
                let client = OpenAIClient::new(config.api_key.trim())?.with_base_url(&config.endpoint);
                Ok(Box::new(client))
            }
            ProviderType::Anthropic => {
                let client =
                    AnthropicClient::new(config.api_key.trim())?.with_base_url(&config.endpoint);
                Ok(Box::new(client))
            }
        }
    }

    /// `[system?, user]` request carrying the config's sampling options.
    pub fn build_request(prompt: &str, system_prompt: Option<&str>, config: &ApiConfig) -> ChatRequest {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = system_prompt.filter(|s| !s.is_empty()) {
            messages.push(Message::system(system));
        }
        messages.push(Message::human(prompt));

        ChatRequest::new(config.model.clone(), messages).with_options(
            ChatOptions::new()
                .max_tokens(config.max_tokens)
                .temperature(config.temperature),
        )
    }
}

#[async_trait]
impl CompletionProvider for ProviderAdapter {
    async fn complete(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        config: &ApiConfig,
    ) -> Result<String> {
        if !config.has_api_key() {
            return Err(LlmError::MissingApiKey);
        }

        tracing::info!(provider = %config.provider, model = %config.model, "Calling LLM provider");

        let client = Self::create_client(config)?;
        let response = client
            .chat(Self::build_request(prompt, system_prompt, config))
            .await
            .map_err(|e| {
                tracing::error!(provider = %config.provider, error = %e, "LLM call failed");
                e
            })?;

        if let Some(usage) = &response.usage {
            tracing::debug!(
                input_tokens = usage.input_tokens,
                output_tokens = usage.output_tokens,
                finish_reason = ?response.finish_reason,
                "LLM call completed"
            );
        }

        Ok(response.content)
    }
}
