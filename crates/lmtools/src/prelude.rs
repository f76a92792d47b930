//! Prelude module for convenient imports
//!
//! ```rust
//! use lmtools::prelude::*;
//! ```

pub use crate::{
    LmTools, LmToolsBuilder,
    ChatMessage, PluginSettings, SummaryResult, TranslationResult,
    ApiConfig, CompletionProvider, ProviderAdapter, ProviderType,
    DocumentProvider, Element, StaticDocument,
    ActionContext, CurrentUser, LmToolsError, ModuleLocator, Notifier, SettingsStore,
    StyleRegistry, ToastKind, UiPatcher,
};
