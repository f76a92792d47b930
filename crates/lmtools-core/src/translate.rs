use crate::boundary::resolve_unread;
use crate::error::{LmToolsError, Result};
use crate::parser::parse_translation;
use crate::prompt::{compose, PromptVars};
use crate::settings::SettingsManager;
use crate::templates::{language_name, DEFAULT_TRANSLATION_TEMPLATE, TRANSLATION_SYSTEM_PROMPT};
use crate::ActionContext;
use chrono::Utc;
use lmtools_extract::ConversationSource;
use lmtools_llm::CompletionProvider;
use lmtools_types::{transcript, ConversationSnapshot, TranslationResult};
use std::sync::Arc;
use tracing::{debug, info};

/// Translates the messages the user has not replied to yet.
pub struct TranslationOrchestrator {
    provider: Arc<dyn CompletionProvider>,
    source: Arc<dyn ConversationSource>,
    settings: Arc<SettingsManager>,
}

impl TranslationOrchestrator {
    pub fn new(
        provider: Arc<dyn CompletionProvider>,
        source: Arc<dyn ConversationSource>,
        settings: Arc<SettingsManager>,
    ) -> Self {
        Self {
            provider,
            source,
            settings,
        }
    }

    pub async fn translate(&self, ctx: &ActionContext) -> Result<TranslationResult> {
        info!(channel_id = %ctx.channel_id, "Translating unread messages");

        let settings = self.settings.get_all();
        if !settings.is_api_key_configured() {
            return Err(LmToolsError::Configuration(
                "API key is not configured. Enter one in the plugin settings.".to_string(),
            ));
        }

        let snapshot = ConversationSnapshot::new(
            self.source.list_visible_messages(settings.message_limit()),
        );
        if snapshot.is_empty() {
            return Err(LmToolsError::NoMessages);
        }

        let unread = resolve_unread(snapshot.messages(), &ctx.self_name)?;
        let last_unread = unread.last();
        debug!(
            unread = unread.messages().len(),
            total = snapshot.len(),
            last_author = %last_unread.username,
            "Resolved unread messages"
        );

        let vars = PromptVars::new(ctx.self_name.as_str(), snapshot.transcript())
            .with_var("unread", transcript(unread.messages()))
            .with_var("language", language_name(&settings.target_language));
        let prompt = compose(DEFAULT_TRANSLATION_TEMPLATE, &vars, None);

        let raw = self
            .provider
            .complete(&prompt, Some(TRANSLATION_SYSTEM_PROMPT), &settings.api_config())
            .await?;

        let detailed = parse_translation(&raw, &last_unread.content);
        info!(
            channel_id = %ctx.channel_id,
            slang = detailed.slang_and_idioms.len(),
            abbreviations = detailed.abbreviations.len(),
            grammar_notes = detailed.grammar_notes.len(),
            "Translation completed"
        );

        Ok(TranslationResult {
            channel_id: ctx.channel_id.clone(),
            original_text: detailed.original_last_message.clone(),
            translated_text: detailed.translated_last_message.clone(),
            target_language: settings.target_language.clone(),
            username: last_unread.username.clone(),
            created_at: Utc::now(),
            detailed_translation: Some(detailed),
        })
    }
}
