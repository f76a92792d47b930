//! File- and console-backed implementations of the host capabilities.

use lmtools::{
    CurrentUser, DocumentProvider, Element, ExtractError, LmToolsError, ModuleLocator, Notifier,
    SettingsStore, StyleRegistry, ToastKind, UiPatcher,
};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Settings persisted as `{ "<plugin>": { "<key>": value } }` in one JSON file.
pub struct FileSettingsStore {
    path: PathBuf,
    data: Mutex<Map<String, Value>>,
}

impl FileSettingsStore {
    pub fn open(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let path = path.into();
        let data = if path.exists() {
            let text = fs::read_to_string(&path)
                .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
            match serde_json::from_str::<Value>(&text)? {
                Value::Object(map) => map,
                _ => anyhow::bail!("{} does not contain a JSON object", path.display()),
            }
        } else {
            Map::new()
        };

        Ok(Self {
            path,
            data: Mutex::new(data),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, data: &Map<String, Value>) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let text = serde_json::to_string_pretty(data).map_err(std::io::Error::other)?;
        fs::write(&self.path, text)
    }
}

impl SettingsStore for FileSettingsStore {
    fn load(&self, plugin: &str, key: &str) -> Option<Value> {
        let data = self.data.lock().unwrap_or_else(|p| p.into_inner());
        data.get(plugin).and_then(|entries| entries.get(key)).cloned()
    }

    fn save(&self, plugin: &str, key: &str, value: &Value) -> lmtools_core::Result<()> {
        let mut data = self.data.lock().unwrap_or_else(|p| p.into_inner());
        let entries = data
            .entry(plugin.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        match entries {
            Value::Object(map) => {
                map.insert(key.to_string(), value.clone());
            }
            other => {
                let mut map = Map::new();
                map.insert(key.to_string(), value.clone());
                *other = Value::Object(map);
            }
        }

        self.write(&data)
            .map_err(|e| LmToolsError::Settings(format!("{}: {}", self.path.display(), e)))
    }
}

/// Re-reads a serialized page from disk on every request.
pub struct FixtureDocument {
    path: PathBuf,
}

impl FixtureDocument {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DocumentProvider for FixtureDocument {
    fn document(&self) -> Result<Element, ExtractError> {
        let text = fs::read_to_string(&self.path)
            .map_err(|e| ExtractError::Document(format!("{}: {}", self.path.display(), e)))?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// Host state taken from configuration.
#[derive(Debug, Clone, Default)]
pub struct FixtureLocator {
    pub channel_id: Option<String>,
    pub self_name: Option<String>,
    pub location_path: Option<String>,
}

impl ModuleLocator for FixtureLocator {
    fn current_user(&self) -> Option<CurrentUser> {
        self.self_name.as_ref().map(|name| CurrentUser {
            global_name: Some(name.clone()),
            username: None,
        })
    }

    fn selected_channel_id(&self) -> Option<String> {
        self.channel_id.clone()
    }

    fn location_path(&self) -> Option<String> {
        self.location_path.clone()
    }
}

/// Prints toasts to stderr.
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn toast(&self, message: &str, kind: ToastKind) {
        let label = match kind {
            ToastKind::Info => "info",
            ToastKind::Success => "success",
            ToastKind::Error => "error",
            ToastKind::Warning => "warning",
        };
        eprintln!("[{}] {}", label, message);
    }
}

#[derive(Default)]
pub struct LoggingStyles {
    active: Mutex<HashSet<String>>,
}

impl LoggingStyles {
    pub fn is_active(&self, id: &str) -> bool {
        self.active.lock().unwrap_or_else(|p| p.into_inner()).contains(id)
    }
}

impl StyleRegistry for LoggingStyles {
    fn add_style(&self, id: &str, css: &str) {
        tracing::debug!(id, bytes = css.len(), "Style registered");
        self.active.lock().unwrap_or_else(|p| p.into_inner()).insert(id.to_string());
    }

    fn remove_style(&self, id: &str) {
        tracing::debug!(id, "Style removed");
        self.active.lock().unwrap_or_else(|p| p.into_inner()).remove(id);
    }
}

/// There is no toolbar to patch in a fixture; patching always succeeds.
pub struct HeadlessPatcher;

impl UiPatcher for HeadlessPatcher {
    fn patch_toolbar(&self) -> bool {
        tracing::debug!("Headless host, toolbar patch is a no-op");
        true
    }

    fn inject_into_container(&self) -> bool {
        true
    }

    fn unpatch_all(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("lmtools-example-{}-{}", std::process::id(), name))
            .join("settings.json")
    }

    #[test]
    fn test_file_store_persists_across_instances() {
        let path = temp_path("persist");
        let store = FileSettingsStore::open(&path).unwrap();
        assert!(store.load("LMTools", "settings").is_none());

        store
            .save("LMTools", "settings", &json!({"messageLimit": 5}))
            .unwrap();

        let reopened = FileSettingsStore::open(&path).unwrap();
        assert_eq!(
            reopened.load("LMTools", "settings"),
            Some(json!({"messageLimit": 5}))
        );
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_fixture_document_missing_file() {
        let doc = FixtureDocument::new("/nonexistent/lmtools/page.json");
        assert!(matches!(doc.document(), Err(ExtractError::Document(_))));
    }

    #[test]
    fn test_bundled_fixture_extracts() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/conversation.json");
        let document = FixtureDocument::new(path).document().unwrap();

        let messages = lmtools::ConversationExtractor::with_default_selectors()
            .unwrap()
            .extract(&document, 0);
        let authors: Vec<_> = messages.iter().map(|m| m.username.as_str()).collect();
        assert_eq!(authors, vec!["mina", "jake", "jake", "sora"]);
        assert_eq!(messages[1].content, "ngl I'm lowkey cooked after work :skull:");
        assert_eq!(messages[3].reference_username.as_deref(), Some("jake"));
        assert!(messages[3].content.ends_with("brb grabbing food<thumbs up cat>"));

        let page = lmtools::PageReader::with_default_selectors().unwrap();
        assert_eq!(page.self_name(&document).as_deref(), Some("mina"));
        assert_eq!(page.draft_input(&document), "sounds good, I'll bring snacks");
    }

    #[test]
    fn test_locator_exposes_configured_name() {
        let locator = FixtureLocator {
            self_name: Some("mina".into()),
            ..Default::default()
        };
        assert_eq!(
            locator.current_user().and_then(|u| u.global_name).as_deref(),
            Some("mina")
        );
        assert_eq!(locator.selected_channel_id(), None);
    }
}
