use lmtools_core::{
    inject_toolbar, resolve_channel_id, resolve_self_name, ActionContext, InjectionOutcome,
    InjectionPolicy, LmToolsError, ModuleLocator, Notifier, Result, SettingsManager,
    StyleRegistry, SummarizationOrchestrator, ToastKind, TranslationOrchestrator, UiPatcher,
    PLUGIN_NAME,
};
use lmtools_extract::{DocumentProvider, PageReader};
use lmtools_types::{preview, SummaryResult, TranslationResult};
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Styles for the toolbar controls.
pub const STYLESHEET: &str = r#".lm-tools-button {
  background: transparent;
  border: none;
  padding: 8px;
  border-radius: 4px;
  cursor: pointer;
  color: var(--interactive-normal, #b9bbbe);
}
.lm-tools-button:hover {
  background-color: var(--background-modifier-hover, #4f545c);
  color: var(--interactive-hover, #dcddde);
}
.lm-tools-button[disabled] {
  opacity: 0.5;
  cursor: not-allowed;
}
"#;

/// Settings keys that change which provider or key is used.
const API_SETTING_KEYS: &[&str] = &[
    "apiProvider",
    "openaiApiKey",
    "openaiModel",
    "openaiEndpoint",
    "anthropicApiKey",
    "anthropicModel",
    "anthropicEndpoint",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Summarize,
    Translate,
}

impl Action {
    fn name(self) -> &'static str {
        match self {
            Action::Summarize => "Summarization",
            Action::Translate => "Translation",
        }
    }

    fn failure_prefix(self) -> &'static str {
        match self {
            Action::Summarize => "Summary failed",
            Action::Translate => "Translation failed",
        }
    }
}

/// Clears the in-flight flag on drop.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool, action: Action) -> Result<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| LmToolsError::Busy(action.name()))?;
        Ok(Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// The plugin: host capabilities wired to the two user actions.
pub struct LmTools {
    pub(crate) settings: Arc<SettingsManager>,
    pub(crate) summarizer: SummarizationOrchestrator,
    pub(crate) translator: TranslationOrchestrator,
    pub(crate) page: PageReader,
    pub(crate) documents: Arc<dyn DocumentProvider>,
    pub(crate) locator: Arc<dyn ModuleLocator>,
    pub(crate) notifier: Arc<dyn Notifier>,
    pub(crate) styles: Arc<dyn StyleRegistry>,
    pub(crate) patcher: Arc<dyn UiPatcher>,
    pub(crate) injection_policy: InjectionPolicy,
    pub(crate) injection_task: Mutex<Option<JoinHandle<InjectionOutcome>>>,
    pub(crate) summarizing: AtomicBool,
    pub(crate) translating: AtomicBool,
}

impl LmTools {
    pub fn builder() -> crate::builder::LmToolsBuilder {
        crate::builder::LmToolsBuilder::new()
    }

    pub fn settings(&self) -> &Arc<SettingsManager> {
        &self.settings
    }

    /// Register styles and begin injecting toolbar controls.
    ///
    /// Injection runs as a background task and needs a Tokio runtime; without
    /// one it is skipped.
    pub fn start(&self) {
        info!("Starting {}", PLUGIN_NAME);
        self.styles.add_style(PLUGIN_NAME, STYLESHEET);

        match serde_json::to_string(&self.settings.get_all().redacted()) {
            Ok(json) => info!(settings = %json, "Loaded settings"),
            Err(e) => warn!("Could not serialize settings for logging: {}", e),
        }

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!("No async runtime available, toolbar controls not injected");
            return;
        };

        let patcher = Arc::clone(&self.patcher);
        let policy = self.injection_policy.clone();
        let handle = runtime.spawn(async move { inject_toolbar(patcher.as_ref(), &policy).await });

        if let Some(previous) = self.lock_injection_task().replace(handle) {
            previous.abort();
        }
    }

    /// Undo everything `start` did.
    pub fn stop(&self) {
        if let Some(task) = self.lock_injection_task().take() {
            task.abort();
        }
        self.patcher.unpatch_all();
        self.styles.remove_style(PLUGIN_NAME);
        info!("{} stopped", PLUGIN_NAME);
    }

    /// Summarize the current channel, using any unsent draft as a hint.
    pub async fn handle_summarize(&self) -> Result<SummaryResult> {
        let result = self
            .run_action(Action::Summarize, &self.summarizing, |ctx| async move {
                if ctx.draft.is_empty() {
                    self.notifier.toast("Summarizing the conversation...", ToastKind::Info);
                } else {
                    debug!(draft = %preview(&ctx.draft, 100), "Including draft in summary request");
                    self.notifier
                        .toast("Summarizing the conversation with your draft...", ToastKind::Info);
                }
                self.summarizer.summarize(&ctx).await
            })
            .await?;

        self.notifier.toast("Summary ready", ToastKind::Success);
        Ok(result)
    }

    /// Translate the messages the user has not replied to yet.
    pub async fn handle_translate(&self) -> Result<TranslationResult> {
        let result = self
            .run_action(Action::Translate, &self.translating, |ctx| async move {
                self.notifier.toast("Translating the latest messages...", ToastKind::Info);
                self.translator.translate(&ctx).await
            })
            .await?;

        self.notifier.toast("Translation ready", ToastKind::Success);
        Ok(result)
    }

    /// React to a settings change made through the settings panel.
    pub fn on_setting_changed(&self, key: &str) {
        debug!(key, "Setting changed");
        if !API_SETTING_KEYS.contains(&key) {
            return;
        }

        let config = self.settings.api_config();
        if config.has_api_key() {
            info!(provider = %config.provider, model = %config.model, "API configuration is valid");
        } else {
            warn!(provider = %config.provider, "API key is not configured for the selected provider");
        }
    }

    async fn run_action<T, F, Fut>(&self, action: Action, flag: &AtomicBool, run: F) -> Result<T>
    where
        F: FnOnce(ActionContext) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let outcome = match InFlight::acquire(flag, action) {
            Ok(_guard) => match self.action_context(action) {
                Ok(ctx) => run(ctx).await,
                Err(e) => Err(e),
            },
            Err(e) => Err(e),
        };

        if let Err(e) = &outcome {
            match e {
                LmToolsError::Busy(_) => {
                    warn!(action = action.name(), "Action already running");
                    self.notifier.toast(&e.to_string(), ToastKind::Warning);
                }
                _ => {
                    error!(action = action.name(), error = %e, "Action failed");
                    self.notifier
                        .toast(&format!("{}: {}", action.failure_prefix(), e), ToastKind::Error);
                }
            }
        }
        outcome
    }

    fn action_context(&self, action: Action) -> Result<ActionContext> {
        let channel_id = resolve_channel_id(self.locator.as_ref())?;

        let document = match self.documents.document() {
            Ok(document) => Some(document),
            Err(e) => {
                warn!("Could not read the page: {}", e);
                None
            }
        };

        let self_name = resolve_self_name(self.locator.as_ref(), &self.page, document.as_ref());
        let draft = match (action, document.as_ref()) {
            (Action::Summarize, Some(doc)) => self.page.draft_input(doc),
            _ => String::new(),
        };

        debug!(channel_id = %channel_id, self_name = %self_name, "Resolved action context");
        Ok(ActionContext::new(channel_id, self_name).with_draft(draft))
    }

    fn lock_injection_task(&self) -> std::sync::MutexGuard<'_, Option<JoinHandle<InjectionOutcome>>> {
        self.injection_task
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
