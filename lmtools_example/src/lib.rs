//! Headless host for running the plugin against a serialized chat page.

pub mod config;
pub mod host;

use anyhow::{Context, Result};
use config::{Config, LoggingConfig, PluginOverrides};
use host::{ConsoleNotifier, FileSettingsStore, FixtureDocument, FixtureLocator, HeadlessPatcher, LoggingStyles};
use lmtools::{LmTools, PluginSettings, ProviderType};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn init_logging(config: &LoggingConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info,lmtools=debug"));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.format.as_str() {
        "json" => {
            registry
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
                .init();
        }
    }
}

/// Wire the file-backed host into a plugin and apply config overrides.
pub fn build_plugin(config: &Config) -> Result<LmTools> {
    let store = FileSettingsStore::open(&config.host.settings_path).with_context(|| {
        format!("Failed to open settings store {}", config.host.settings_path.display())
    })?;

    let plugin = LmTools::builder()
        .settings_store(Arc::new(store))
        .documents(Arc::new(FixtureDocument::new(&config.host.fixture)))
        .locator(Arc::new(FixtureLocator {
            channel_id: config.host.channel_id.clone(),
            self_name: config.host.self_name.clone(),
            location_path: config.host.location_path.clone(),
        }))
        .notifier(Arc::new(ConsoleNotifier))
        .styles(Arc::new(LoggingStyles::default()))
        .patcher(Arc::new(HeadlessPatcher))
        .build()?;

    let overrides = config.plugin.clone();
    let (openai_key, anthropic_key) = (config.openai_api_key.clone(), config.anthropic_api_key.clone());
    plugin
        .settings()
        .update(|settings| {
            apply_overrides(settings, &overrides);
            if !openai_key.is_empty() {
                settings.openai_api_key = openai_key;
            }
            if !anthropic_key.is_empty() {
                settings.anthropic_api_key = anthropic_key;
            }
        })
        .context("Failed to save settings")?;

    for key in ["apiProvider", "openaiApiKey", "anthropicApiKey"] {
        plugin.on_setting_changed(key);
    }

    Ok(plugin)
}

/// Overwrite the settings fields that `overrides` sets.
///
/// `model` and `endpoint` apply to the provider selected after the override.
pub fn apply_overrides(settings: &mut PluginSettings, overrides: &PluginOverrides) {
    if let Some(provider) = overrides.api_provider.as_deref() {
        match provider.to_ascii_lowercase().as_str() {
            "openai" => settings.api_provider = ProviderType::OpenAI,
            "anthropic" => settings.api_provider = ProviderType::Anthropic,
            other => tracing::warn!("Unknown provider '{}', keeping {}", other, settings.api_provider),
        }
    }

    let (model, endpoint) = match settings.api_provider {
        ProviderType::OpenAI => (&mut settings.openai_model, &mut settings.openai_endpoint),
        ProviderType::Anthropic => (&mut settings.anthropic_model, &mut settings.anthropic_endpoint),
    };
    if let Some(value) = &overrides.model {
        *model = value.clone();
    }
    if let Some(value) = &overrides.endpoint {
        *endpoint = value.clone();
    }

    if let Some(value) = overrides.max_tokens {
        settings.max_tokens = value;
    }
    if let Some(value) = overrides.temperature {
        settings.temperature = value;
    }
    if let Some(value) = overrides.message_limit {
        settings.message_limit = value;
    }
    if let Some(value) = &overrides.target_language {
        settings.target_language = value.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_target_selected_provider() {
        let mut settings = PluginSettings::default();
        let overrides = PluginOverrides {
            api_provider: Some("Anthropic".into()),
            model: Some("claude-sonnet-4-5".into()),
            message_limit: Some(0),
            ..Default::default()
        };

        apply_overrides(&mut settings, &overrides);

        assert_eq!(settings.api_provider, ProviderType::Anthropic);
        assert_eq!(settings.anthropic_model, "claude-sonnet-4-5");
        assert_eq!(settings.openai_model, "gpt-4.1-mini");
        assert_eq!(settings.message_limit, 0);
    }

    #[test]
    fn test_unknown_provider_is_ignored() {
        let mut settings = PluginSettings::default();
        let overrides = PluginOverrides {
            api_provider: Some("mistral".into()),
            ..Default::default()
        };

        apply_overrides(&mut settings, &overrides);

        assert_eq!(settings, PluginSettings::default());
    }
}
