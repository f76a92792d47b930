//! High-level builder wiring host capabilities into an [`LmTools`] plugin

use crate::plugin::LmTools;
use anyhow::{Context, Result};
use lmtools_core::{
    InjectionPolicy, ModuleLocator, Notifier, SettingsManager, SettingsStore, StyleRegistry,
    SummarizationOrchestrator, TranslationOrchestrator, UiPatcher,
};
use lmtools_extract::{
    ConversationExtractor, ConversationSource, DocumentProvider, DomConversationSource,
    ExtractorSelectors, PageReader, PageSelectors,
};
use lmtools_llm::{CompletionProvider, ProviderAdapter};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

/// Builder for [`LmTools`].
///
/// The host capabilities (settings store, documents, locator, notifier,
/// styles, patcher) are required. The completion provider defaults to
/// [`ProviderAdapter`] and the conversation source to DOM extraction over
/// the configured documents.
#[derive(Default)]
pub struct LmToolsBuilder {
    settings_store: Option<Arc<dyn SettingsStore>>,
    documents: Option<Arc<dyn DocumentProvider>>,
    locator: Option<Arc<dyn ModuleLocator>>,
    notifier: Option<Arc<dyn Notifier>>,
    styles: Option<Arc<dyn StyleRegistry>>,
    patcher: Option<Arc<dyn UiPatcher>>,
    provider: Option<Arc<dyn CompletionProvider>>,
    source: Option<Arc<dyn ConversationSource>>,
    extractor_selectors: ExtractorSelectors,
    page_selectors: PageSelectors,
    injection_policy: InjectionPolicy,
}

impl LmToolsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn settings_store(mut self, store: Arc<dyn SettingsStore>) -> Self {
        self.settings_store = Some(store);
        self
    }

    pub fn documents(mut self, documents: Arc<dyn DocumentProvider>) -> Self {
        self.documents = Some(documents);
        self
    }

    pub fn locator(mut self, locator: Arc<dyn ModuleLocator>) -> Self {
        self.locator = Some(locator);
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn styles(mut self, styles: Arc<dyn StyleRegistry>) -> Self {
        self.styles = Some(styles);
        self
    }

    pub fn patcher(mut self, patcher: Arc<dyn UiPatcher>) -> Self {
        self.patcher = Some(patcher);
        self
    }

    /// Replace the HTTP-backed provider, e.g. with a canned one in tests.
    pub fn provider(mut self, provider: Arc<dyn CompletionProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Read messages from `source` instead of extracting them from documents.
    pub fn conversation_source(mut self, source: Arc<dyn ConversationSource>) -> Self {
        self.source = Some(source);
        self
    }

    pub fn extractor_selectors(mut self, selectors: ExtractorSelectors) -> Self {
        self.extractor_selectors = selectors;
        self
    }

    pub fn page_selectors(mut self, selectors: PageSelectors) -> Self {
        self.page_selectors = selectors;
        self
    }

    pub fn injection_policy(mut self, policy: InjectionPolicy) -> Self {
        self.injection_policy = policy;
        self
    }

    /// Build the plugin
    ///
    /// # Errors
    ///
    /// Returns an error if a required host capability is missing or a
    /// configured selector does not parse.
    pub fn build(self) -> Result<LmTools> {
        let store = self
            .settings_store
            .context("Settings store is required. Call .settings_store(store)")?;
        let documents = self
            .documents
            .context("Document provider is required. Call .documents(provider)")?;
        let locator = self.locator.context("Module locator is required. Call .locator(locator)")?;
        let notifier = self.notifier.context("Notifier is required. Call .notifier(notifier)")?;
        let styles = self.styles.context("Style registry is required. Call .styles(registry)")?;
        let patcher = self.patcher.context("UI patcher is required. Call .patcher(patcher)")?;

        let page = PageReader::new(&self.page_selectors).context("Invalid page selectors")?;

        let source: Arc<dyn ConversationSource> = match self.source {
            Some(source) => source,
            None => {
                let extractor = ConversationExtractor::new(&self.extractor_selectors)
                    .context("Invalid extractor selectors")?;
                Arc::new(DomConversationSource::new(extractor, Arc::clone(&documents)))
            }
        };
        let provider: Arc<dyn CompletionProvider> = match self.provider {
            Some(provider) => provider,
            None => Arc::new(ProviderAdapter::new()),
        };

        let settings = Arc::new(SettingsManager::load(store));

        Ok(LmTools {
            summarizer: SummarizationOrchestrator::new(
                Arc::clone(&provider),
                Arc::clone(&source),
                Arc::clone(&settings),
            ),
            translator: TranslationOrchestrator::new(provider, source, Arc::clone(&settings)),
            settings,
            page,
            documents,
            locator,
            notifier,
            styles,
            patcher,
            injection_policy: self.injection_policy,
            injection_task: Mutex::new(None),
            summarizing: AtomicBool::new(false),
            translating: AtomicBool::new(false),
        })
    }
}
