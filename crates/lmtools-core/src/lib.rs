pub mod boundary;
pub mod error;
pub mod host;
pub mod identity;
pub mod injection;
pub mod parser;
pub mod prompt;
pub mod settings;
pub mod summarize;
pub mod templates;
pub mod translate;

pub use boundary::{resolve_unread, BoundaryError, UnreadBlock};
pub use error::{LmToolsError, Result};
pub use host::{
    CurrentUser, ModuleLocator, Notifier, SettingsStore, StyleRegistry, ToastKind, UiPatcher,
};
pub use identity::{resolve_channel_id, resolve_self_name, DEFAULT_SELF_NAME};
pub use injection::{inject_toolbar, InjectionOutcome, InjectionPolicy};
pub use parser::{extract_json_block, parse_summary, parse_translation};
pub use prompt::{compose, resolve_template, PromptVars, TemplateSource};
pub use settings::{SettingsManager, PLUGIN_NAME, SETTINGS_KEY};
pub use summarize::SummarizationOrchestrator;
pub use translate::TranslationOrchestrator;

/// Per-action inputs gathered from the host before an orchestrator runs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionContext {
    pub channel_id: String,
    /// Display name of the signed-in user.
    pub self_name: String,
    /// Unsent composer text; empty when the user has not typed anything.
    pub draft: String,
}

impl ActionContext {
    pub fn new(channel_id: impl Into<String>, self_name: impl Into<String>) -> Self {
        Self {
            channel_id: channel_id.into(),
            self_name: self_name.into(),
            draft: String::new(),
        }
    }

    pub fn with_draft(mut self, draft: impl Into<String>) -> Self {
        self.draft = draft.into();
        self
    }
}
