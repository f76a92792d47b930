// Provider configuration and the per-call snapshot handed to clients

use serde::{Deserialize, Serialize};
use std::fmt;

/// Type of LLM provider
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    #[default]
    OpenAI,
    Anthropic,
}

impl fmt::Display for ProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderType::OpenAI => write!(f, "OpenAI"),
            ProviderType::Anthropic => write!(f, "Anthropic"),
        }
    }
}

/// Immutable provider configuration taken from settings at call time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiConfig {
    pub provider: ProviderType,
    pub api_key: String,
    pub model: String,
    /// Base URL, e.g. `https://api.openai.com/v1`. Paths are appended to it.
    pub endpoint: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl ApiConfig {
    pub fn openai(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            provider: ProviderType::OpenAI,
            api_key: api_key.into(),
            model: model.into(),
            endpoint: crate::openai::OPENAI_API_BASE.to_string(),
            max_tokens: 2048,
            temperature: 0.7,
        }
    }

    pub fn anthropic(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            provider: ProviderType::Anthropic,
            api_key: api_key.into(),
            model: model.into(),
            endpoint: crate::anthropic::ANTHROPIC_API_BASE.to_string(),
            max_tokens: 2048,
            temperature: 0.7,
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}
