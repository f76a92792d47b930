use config::{Config as ConfigLoader, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub logging: LoggingConfig,
    pub host: HostConfig,
    #[serde(default)]
    pub plugin: PluginOverrides,

    // Secrets (from ENV only)
    #[serde(default)]
    pub openai_api_key: String,
    #[serde(default)]
    pub anthropic_api_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HostConfig {
    /// JSON file backing the plugin's settings store.
    pub settings_path: PathBuf,
    /// Rendered chat page serialized as a DOM tree.
    pub fixture: PathBuf,
    #[serde(default)]
    pub channel_id: Option<String>,
    #[serde(default)]
    pub self_name: Option<String>,
    /// Used when `channel_id` is unset.
    #[serde(default)]
    pub location_path: Option<String>,
}

/// Plugin settings forced at startup; unset fields keep the stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PluginOverrides {
    pub api_provider: Option<String>,
    pub model: Option<String>,
    pub endpoint: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub message_limit: Option<u32>,
    pub target_language: Option<String>,
}

impl Config {
    /// Load configuration from TOML files and environment variables
    ///
    /// Hierarchy (weakest to strongest):
    /// 1. config/default.toml
    /// 2. config/{ENV}.toml (if ENV is set)
    /// 3. Environment variables prefixed with LMTOOLS (e.g. LMTOOLS_LOGGING__FORMAT=json)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Path::new("lmtools_example/config"))
    }

    pub fn load_from(dir: &Path) -> Result<Self, ConfigError> {
        let env = std::env::var("ENV").unwrap_or_else(|_| "dev".to_string());

        let builder = ConfigLoader::builder()
            .add_source(File::with_name(&dir.join("default").to_string_lossy()).required(false))
            .add_source(File::with_name(&dir.join(&env).to_string_lossy()).required(false))
            .add_source(
                Environment::with_prefix("LMTOOLS")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let mut cfg: Config = builder.build()?.try_deserialize()?;

        // Load secrets from ENV (not in TOML)
        cfg.openai_api_key = std::env::var("OPENAI_API_KEY").unwrap_or_default();
        cfg.anthropic_api_key = std::env::var("ANTHROPIC_API_KEY").unwrap_or_default();

        Ok(cfg)
    }

    /// Load config from a specific file (useful for testing)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        ConfigLoader::builder()
            .add_source(File::from(path.as_ref()))
            .build()?
            .try_deserialize()
    }
}
