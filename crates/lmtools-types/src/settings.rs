use lmtools_llm::{ApiConfig, ProviderType};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_MESSAGE_LIMIT: u32 = 50;

/// Persisted plugin settings.
///
/// Every field has a default, so a partially stored document deserializes
/// with the missing keys filled in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PluginSettings {
    pub enabled: bool,
    pub api_provider: ProviderType,
    pub openai_api_key: String,
    pub openai_model: String,
    pub openai_endpoint: String,
    pub anthropic_api_key: String,
    pub anthropic_model: String,
    pub anthropic_endpoint: String,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Number of most recent messages to send. `0` means unlimited; stored
    /// negative values read as `0`.
    #[serde(deserialize_with = "clamped_limit")]
    pub message_limit: u32,
    /// User-wide summary template. Empty means "use the built-in one".
    pub default_prompt: String,
    /// Per-channel summary templates keyed by channel id.
    pub channel_prompts: BTreeMap<String, String>,
    /// Language code translations are produced in.
    pub target_language: String,
}

impl Default for PluginSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            api_provider: ProviderType::OpenAI,
            openai_api_key: String::new(),
            openai_model: "gpt-4.1-mini".to_string(),
            openai_endpoint: "https://api.openai.com/v1".to_string(),
            anthropic_api_key: String::new(),
            anthropic_model: "claude-3-5-haiku-latest".to_string(),
            anthropic_endpoint: "https://api.anthropic.com/v1".to_string(),
            max_tokens: 2048,
            temperature: 0.7,
            message_limit: DEFAULT_MESSAGE_LIMIT,
            default_prompt: String::new(),
            channel_prompts: BTreeMap::new(),
            target_language: "ko".to_string(),
        }
    }
}

impl PluginSettings {
    pub fn current_api_key(&self) -> &str {
        match self.api_provider {
            ProviderType::OpenAI => &self.openai_api_key,
            ProviderType::Anthropic => &self.anthropic_api_key,
        }
    }

    pub fn current_model(&self) -> &str {
        match self.api_provider {
            ProviderType::OpenAI => &self.openai_model,
            ProviderType::Anthropic => &self.anthropic_model,
        }
    }

    pub fn api_endpoint(&self) -> &str {
        match self.api_provider {
            ProviderType::OpenAI => &self.openai_endpoint,
            ProviderType::Anthropic => &self.anthropic_endpoint,
        }
    }

    pub fn is_api_key_configured(&self) -> bool {
        !self.current_api_key().trim().is_empty()
    }

    /// Snapshot of the active provider configuration for a single call.
    pub fn api_config(&self) -> ApiConfig {
        ApiConfig {
            provider: self.api_provider.clone(),
            api_key: self.current_api_key().to_string(),
            model: self.current_model().to_string(),
            endpoint: self.api_endpoint().to_string(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }

    pub fn message_limit(&self) -> usize {
        self.message_limit as usize
    }

    pub fn channel_prompt(&self, channel_id: &str) -> Option<&str> {
        self.channel_prompts.get(channel_id).map(String::as_str)
    }

    /// Copy with API keys masked, for logging.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        copy.openai_api_key = redact(&self.openai_api_key);
        copy.anthropic_api_key = redact(&self.anthropic_api_key);
        copy
    }
}

fn clamped_limit<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = i64::deserialize(deserializer)?;
    Ok(raw.clamp(0, u32::MAX as i64) as u32)
}

fn redact(key: &str) -> String {
    if key.trim().is_empty() {
        String::new()
    } else {
        "***".to_string()
    }
}
