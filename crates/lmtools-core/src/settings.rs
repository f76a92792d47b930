use crate::error::Result;
use crate::host::SettingsStore;
use lmtools_llm::{ApiConfig, ProviderType};
use lmtools_types::PluginSettings;
use serde_json::{Map, Value};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, warn};

pub const PLUGIN_NAME: &str = "LMTools";
pub const SETTINGS_KEY: &str = "settings";

/// In-memory view of [`PluginSettings`] backed by a [`SettingsStore`].
///
/// Every mutation is written through immediately; concurrent writers are
/// last-writer-wins.
pub struct SettingsManager {
    store: Arc<dyn SettingsStore>,
    settings: RwLock<PluginSettings>,
}

impl SettingsManager {
    /// Load stored settings, filling missing keys with defaults.
    ///
    /// Keys are merged one at a time, so a single unreadable value falls back
    /// to its default without discarding the rest of the document.
    pub fn load(store: Arc<dyn SettingsStore>) -> Self {
        let settings = match store.load(PLUGIN_NAME, SETTINGS_KEY) {
            Some(value) => merge_stored(value),
            None => {
                debug!("No stored settings, using defaults");
                PluginSettings::default()
            }
        };

        Self {
            store,
            settings: RwLock::new(settings),
        }
    }

    pub fn get_all(&self) -> PluginSettings {
        self.read().clone()
    }

    /// Apply `f` to the settings and persist the result.
    pub fn update<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&mut PluginSettings),
    {
        let snapshot = {
            let mut settings = self.write();
            f(&mut settings);
            settings.clone()
        };
        self.save(&snapshot)
    }

    pub fn set_default_prompt(&self, prompt: impl Into<String>) -> Result<()> {
        let prompt = prompt.into();
        self.update(|s| s.default_prompt = prompt)
    }

    pub fn set_channel_prompt(&self, channel_id: impl Into<String>, prompt: impl Into<String>) -> Result<()> {
        let (channel_id, prompt) = (channel_id.into(), prompt.into());
        self.update(|s| {
            s.channel_prompts.insert(channel_id, prompt);
        })
    }

    pub fn remove_channel_prompt(&self, channel_id: &str) -> Result<()> {
        self.update(|s| {
            s.channel_prompts.remove(channel_id);
        })
    }

    pub fn current_provider(&self) -> ProviderType {
        self.read().api_provider.clone()
    }

    pub fn current_api_key(&self) -> String {
        self.read().current_api_key().to_string()
    }

    pub fn current_model(&self) -> String {
        self.read().current_model().to_string()
    }

    pub fn api_endpoint(&self) -> String {
        self.read().api_endpoint().to_string()
    }

    pub fn is_api_key_configured(&self) -> bool {
        self.read().is_api_key_configured()
    }

    pub fn api_config(&self) -> ApiConfig {
        self.read().api_config()
    }

    fn save(&self, settings: &PluginSettings) -> Result<()> {
        let value = serde_json::to_value(settings)?;
        self.store.save(PLUGIN_NAME, SETTINGS_KEY, &value)?;
        debug!("Settings saved");
        Ok(())
    }

    fn read(&self) -> RwLockReadGuard<'_, PluginSettings> {
        self.settings.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, PluginSettings> {
        self.settings.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn merge_stored(stored: Value) -> PluginSettings {
    let Value::Object(stored) = stored else {
        warn!("Stored settings are not an object, using defaults");
        return PluginSettings::default();
    };
    let mut merged = match serde_json::to_value(PluginSettings::default()) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    };

    for (key, value) in stored {
        let mut candidate = merged.clone();
        candidate.insert(key.clone(), value.clone());
        match serde_json::from_value::<PluginSettings>(Value::Object(candidate)) {
            Ok(_) => {
                merged.insert(key, value);
            }
            Err(e) => warn!(key = %key, "Ignoring unreadable stored setting: {}", e),
        }
    }

    serde_json::from_value(Value::Object(merged)).unwrap_or_else(|e| {
        warn!("Merged settings are unreadable, using defaults: {}", e);
        PluginSettings::default()
    })
}
