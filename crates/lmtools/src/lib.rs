//! # LMTools
//!
//! Conversation summaries, suggested replies and context-aware translation
//! for a chat client, driven by OpenAI or Anthropic models.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lmtools::prelude::*;
//! use std::sync::Arc;
//!
//! # fn host() -> (Arc<dyn SettingsStore>, Arc<dyn DocumentProvider>, Arc<dyn ModuleLocator>,
//! #     Arc<dyn Notifier>, Arc<dyn StyleRegistry>, Arc<dyn UiPatcher>) { unimplemented!() }
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let (store, documents, locator, notifier, styles, patcher) = host();
//!
//!     let plugin = LmTools::builder()
//!         .settings_store(store)
//!         .documents(documents)
//!         .locator(locator)
//!         .notifier(notifier)
//!         .styles(styles)
//!         .patcher(patcher)
//!         .build()?;
//!
//!     plugin.start();
//!     let summary = plugin.handle_summarize().await?;
//!     println!("{}", summary.summary.to_plain_text());
//!     plugin.stop();
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **`lmtools-types`**: messages, results and the persisted settings schema
//! - **`lmtools-llm`**: OpenAI and Anthropic completion clients
//! - **`lmtools-extract`**: selector-cascade conversation extraction from a rendered tree
//! - **`lmtools-core`**: unread detection, prompts, response parsing and the two use cases

pub mod builder;
pub mod plugin;
pub mod prelude;

pub use builder::LmToolsBuilder;
pub use plugin::{LmTools, STYLESHEET};

pub use lmtools_types::{
    ChatMessage, ConversationSnapshot, DetailedTranslation, PluginSettings, SummaryPayload,
    SummaryResult, TranslationResult,
};

pub use lmtools_llm::{
    AnthropicClient, ApiConfig, ApiError, ChatClient, CompletionProvider, OpenAIClient,
    ProviderAdapter, ProviderType,
};

pub use lmtools_extract::{
    ConversationExtractor, ConversationSource, DocumentProvider, DomConversationSource, DomNode,
    Element, ExtractError, ExtractorSelectors, PageReader, PageSelectors, StaticConversationSource,
    StaticDocument,
};

pub use lmtools_core::{
    ActionContext, BoundaryError, CurrentUser, InjectionOutcome, InjectionPolicy, LmToolsError,
    ModuleLocator, Notifier, SettingsManager, SettingsStore, StyleRegistry, SummarizationOrchestrator,
    ToastKind, TranslationOrchestrator, UiPatcher,
};
