use async_trait::async_trait;
use lmtools::prelude::*;
use lmtools::{BoundaryError, InjectionPolicy, STYLESHEET};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

#[derive(Default)]
struct MemoryStore {
    data: Mutex<HashMap<String, Value>>,
}

impl MemoryStore {
    fn with_settings(value: Value) -> Arc<Self> {
        let store = Self::default();
        store.data.lock().unwrap().insert("LMTools/settings".into(), value);
        Arc::new(store)
    }
}

impl SettingsStore for MemoryStore {
    fn load(&self, plugin: &str, key: &str) -> Option<Value> {
        self.data.lock().unwrap().get(&format!("{}/{}", plugin, key)).cloned()
    }

    fn save(&self, plugin: &str, key: &str, value: &Value) -> lmtools_core::Result<()> {
        self.data
            .lock()
            .unwrap()
            .insert(format!("{}/{}", plugin, key), value.clone());
        Ok(())
    }
}

struct FakeLocator {
    channel: Option<String>,
}

impl ModuleLocator for FakeLocator {
    fn current_user(&self) -> Option<CurrentUser> {
        Some(CurrentUser {
            global_name: Some("alice".into()),
            username: None,
        })
    }

    fn selected_channel_id(&self) -> Option<String> {
        self.channel.clone()
    }

    fn location_path(&self) -> Option<String> {
        None
    }
}

#[derive(Default)]
struct RecordingNotifier {
    toasts: Mutex<Vec<(String, ToastKind)>>,
}

impl RecordingNotifier {
    fn kinds(&self) -> Vec<ToastKind> {
        self.toasts.lock().unwrap().iter().map(|(_, kind)| *kind).collect()
    }

    fn messages(&self) -> Vec<String> {
        self.toasts.lock().unwrap().iter().map(|(m, _)| m.clone()).collect()
    }
}

impl Notifier for RecordingNotifier {
    fn toast(&self, message: &str, kind: ToastKind) {
        self.toasts.lock().unwrap().push((message.to_string(), kind));
    }
}

#[derive(Default)]
struct RecordingStyles {
    active: Mutex<HashMap<String, String>>,
}

impl StyleRegistry for RecordingStyles {
    fn add_style(&self, id: &str, css: &str) {
        self.active.lock().unwrap().insert(id.to_string(), css.to_string());
    }

    fn remove_style(&self, id: &str) {
        self.active.lock().unwrap().remove(id);
    }
}

#[derive(Default)]
struct CountingPatcher {
    patches: AtomicUsize,
    unpatches: AtomicUsize,
}

impl UiPatcher for CountingPatcher {
    fn patch_toolbar(&self) -> bool {
        self.patches.fetch_add(1, Ordering::SeqCst);
        true
    }

    fn inject_into_container(&self) -> bool {
        false
    }

    fn unpatch_all(&self) {
        self.unpatches.fetch_add(1, Ordering::SeqCst);
    }
}

/// Returns `reply` after `gate` is notified (if set), recording prompts.
struct GatedProvider {
    reply: String,
    gate: Option<Arc<Notify>>,
    prompts: Mutex<Vec<String>>,
}

impl GatedProvider {
    fn new(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            gate: None,
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn gated(reply: &str, gate: Arc<Notify>) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            gate: Some(gate),
            prompts: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl CompletionProvider for GatedProvider {
    async fn complete(
        &self,
        prompt: &str,
        _system_prompt: Option<&str>,
        _config: &ApiConfig,
    ) -> lmtools_llm::Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        Ok(self.reply.clone())
    }
}

fn message_item(id: u64, username: &str, text: &str) -> Element {
    Element::new("li").with_class("messageListItem_d5deea").with_child(
        Element::new("div")
            .with_class("contents_f9f2ca")
            .with_child(Element::new("span").with_class("username_f9f2ca").with_text(username))
            .with_child(
                Element::new("div")
                    .with_class("messageContent_f9f2ca")
                    .with_id(format!("message-content-{}", id))
                    .with_text(text),
            ),
    )
}

fn page(draft: Option<&str>) -> Element {
    let list = Element::new("ol")
        .with_child(message_item(1, "alice", "anyone up for lunch?"))
        .with_child(message_item(2, "bob", "sure, 12:30?"))
        .with_child(message_item(3, "carol", "ngl I'm starving"));
    let mut body = Element::new("body").with_child(list);
    if let Some(draft) = draft {
        body = body.with_child(
            Element::new("div").with_attr("data-slate-editor", "true").with_child(
                Element::new("span")
                    .with_attr("data-slate-node", "text")
                    .with_text(draft),
            ),
        );
    }
    body
}

struct Host {
    notifier: Arc<RecordingNotifier>,
    styles: Arc<RecordingStyles>,
    patcher: Arc<CountingPatcher>,
}

fn plugin_with(
    provider: Arc<GatedProvider>,
    settings: Value,
    channel: Option<&str>,
    document: Element,
) -> (LmTools, Host) {
    let host = Host {
        notifier: Arc::new(RecordingNotifier::default()),
        styles: Arc::new(RecordingStyles::default()),
        patcher: Arc::new(CountingPatcher::default()),
    };
    let plugin = LmTools::builder()
        .settings_store(MemoryStore::with_settings(settings))
        .documents(Arc::new(StaticDocument(document)))
        .locator(Arc::new(FakeLocator {
            channel: channel.map(str::to_string),
        }))
        .notifier(host.notifier.clone())
        .styles(host.styles.clone())
        .patcher(host.patcher.clone())
        .provider(provider)
        .build()
        .unwrap();
    (plugin, host)
}

fn configured() -> Value {
    json!({"openaiApiKey": "sk-test"})
}

#[tokio::test]
async fn test_summarize_end_to_end_with_draft() {
    let provider = GatedProvider::new(r#"{"summary": "Lunch plans", "suggested_replies": ["12:30 works"]}"#);
    let (plugin, host) = plugin_with(provider.clone(), configured(), Some("99"), page(Some("count me in")));

    let result = plugin.handle_summarize().await.unwrap();

    assert_eq!(result.channel_id, "99");
    assert_eq!(result.message_count, 3);
    assert_eq!(result.summary.suggested_replies, vec!["12:30 works"]);

    let prompt = provider.prompts.lock().unwrap()[0].clone();
    assert!(prompt.contains("alice: anyone up for lunch?\nbob: sure, 12:30?\ncarol: ngl I'm starving"));
    assert!(prompt.contains("count me in"));
    assert_eq!(host.notifier.kinds(), vec![ToastKind::Info, ToastKind::Success]);
    assert!(host.notifier.messages()[0].contains("draft"));
}

#[tokio::test]
async fn test_translate_uses_resolved_self_name() {
    let provider = GatedProvider::new("plain translation");
    let (plugin, host) = plugin_with(provider, configured(), Some("99"), page(None));

    let result = plugin.handle_translate().await.unwrap();

    // alice spoke first, so bob and carol are unread
    assert_eq!(result.username, "carol");
    assert_eq!(result.original_text, "ngl I'm starving");
    assert_eq!(result.translated_text, "plain translation");
    assert_eq!(host.notifier.kinds(), vec![ToastKind::Info, ToastKind::Success]);
}

#[tokio::test]
async fn test_failures_are_toasted_and_returned() {
    let provider = GatedProvider::new("unused");
    let (plugin, host) = plugin_with(provider.clone(), json!({}), Some("99"), page(None));

    let err = plugin.handle_summarize().await.unwrap_err();

    assert!(matches!(err, LmToolsError::Configuration(_)));
    assert!(provider.prompts.lock().unwrap().is_empty());
    let toasts = host.notifier.toasts.lock().unwrap().clone();
    let (message, kind) = toasts.last().unwrap();
    assert_eq!(*kind, ToastKind::Error);
    assert!(message.starts_with("Summary failed: "));
}

#[tokio::test]
async fn test_missing_channel() {
    let (plugin, host) = plugin_with(GatedProvider::new("unused"), configured(), None, page(None));

    let err = plugin.handle_translate().await.unwrap_err();

    assert!(matches!(err, LmToolsError::NoChannel));
    assert_eq!(host.notifier.kinds(), vec![ToastKind::Error]);
}

#[tokio::test]
async fn test_translate_only_own_messages() {
    let document = Element::new("body").with_child(
        Element::new("ol").with_child(message_item(1, "alice", "hello?")),
    );
    let (plugin, _host) = plugin_with(GatedProvider::new("unused"), configured(), Some("1"), document);

    let err = plugin.handle_translate().await.unwrap_err();

    assert!(matches!(err, LmToolsError::Boundary(BoundaryError::NoOtherAuthor)));
}

#[tokio::test]
async fn test_concurrent_invocation_is_busy() {
    let gate = Arc::new(Notify::new());
    let provider = GatedProvider::gated("done", gate.clone());
    let (plugin, host) = plugin_with(provider, configured(), Some("99"), page(None));

    let (first, second, _) = tokio::join!(plugin.handle_summarize(), plugin.handle_summarize(), async {
        gate.notify_one();
    });

    assert!(first.is_ok());
    assert!(matches!(second, Err(LmToolsError::Busy("Summarization"))));
    assert!(host.notifier.kinds().contains(&ToastKind::Warning));

    // the flag is released once the first call finishes
    gate.notify_one();
    assert!(plugin.handle_summarize().await.is_ok());
}

#[tokio::test]
async fn test_actions_are_guarded_independently() {
    let gate = Arc::new(Notify::new());
    let provider = GatedProvider::gated("done", gate.clone());
    let (plugin, _host) = plugin_with(provider, configured(), Some("99"), page(None));

    let (summary, translation, _) = tokio::join!(plugin.handle_summarize(), plugin.handle_translate(), async {
        gate.notify_waiters();
    });

    assert!(summary.is_ok());
    assert!(translation.is_ok());
}

#[tokio::test(start_paused = true)]
async fn test_start_and_stop_lifecycle() {
    let (plugin, host) = plugin_with(GatedProvider::new("unused"), configured(), Some("1"), page(None));

    plugin.start();
    tokio::time::sleep(Duration::from_millis(10)).await;

    assert_eq!(
        host.styles.active.lock().unwrap().get("LMTools").map(String::as_str),
        Some(STYLESHEET)
    );
    assert_eq!(host.patcher.patches.load(Ordering::SeqCst), 1);

    plugin.stop();

    assert!(host.styles.active.lock().unwrap().is_empty());
    assert_eq!(host.patcher.unpatches.load(Ordering::SeqCst), 1);
}

#[test]
fn test_start_without_runtime_still_registers_styles() {
    let (plugin, host) = plugin_with(GatedProvider::new("unused"), configured(), Some("1"), page(None));

    plugin.start();

    assert!(host.styles.active.lock().unwrap().contains_key("LMTools"));
    assert_eq!(host.patcher.patches.load(Ordering::SeqCst), 0);
}

#[test]
fn test_builder_requires_host_capabilities() {
    let err = LmTools::builder()
        .injection_policy(InjectionPolicy::default())
        .build()
        .err()
        .unwrap();
    assert!(err.to_string().contains("Settings store is required"));
}

#[test]
fn test_setting_change_persists_through_manager() {
    let (plugin, _host) = plugin_with(GatedProvider::new("unused"), json!({}), Some("1"), page(None));

    plugin
        .settings()
        .update(|s| s.openai_api_key = "sk-new".into())
        .unwrap();
    plugin.on_setting_changed("openaiApiKey");

    assert!(plugin.settings().is_api_key_configured());
}
