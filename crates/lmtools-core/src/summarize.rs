use crate::error::{LmToolsError, Result};
use crate::parser::parse_summary;
use crate::prompt::{compose, resolve_template, PromptVars};
use crate::settings::SettingsManager;
use crate::templates::{DEFAULT_SUMMARY_TEMPLATE, SUMMARY_SYSTEM_PROMPT};
use crate::ActionContext;
use chrono::Utc;
use lmtools_extract::ConversationSource;
use lmtools_llm::CompletionProvider;
use lmtools_types::{ConversationSnapshot, SummaryResult};
use std::sync::Arc;
use tracing::{debug, info};

/// Summarizes the visible conversation and suggests replies.
pub struct SummarizationOrchestrator {
    provider: Arc<dyn CompletionProvider>,
    source: Arc<dyn ConversationSource>,
    settings: Arc<SettingsManager>,
}

impl SummarizationOrchestrator {
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

    pub async fn summarize(&self, ctx: &ActionContext) -> Result<SummaryResult> {
        info!(channel_id = %ctx.channel_id, has_draft = !ctx.draft.trim().is_empty(), "Summarizing conversation");

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
        debug!(count = snapshot.len(), "Collected messages for summary");

        let (template, template_source) =
            resolve_template(&settings, &ctx.channel_id, DEFAULT_SUMMARY_TEMPLATE);
        debug!(?template_source, "Resolved summary template");

        let vars = PromptVars::new(ctx.self_name.as_str(), snapshot.transcript());
        let prompt = compose(template, &vars, Some(&ctx.draft));

        let raw = self
            .provider
            .complete(&prompt, Some(SUMMARY_SYSTEM_PROMPT), &settings.api_config())
            .await?;

        let summary = parse_summary(&raw);
        info!(
            channel_id = %ctx.channel_id,
            replies = summary.suggested_replies.len(),
            "Summary completed"
        );

        Ok(SummaryResult {
            channel_id: ctx.channel_id.clone(),
            summary,
            raw_response: raw,
            message_count: snapshot.len(),
            time_range: snapshot.time_range_label(),
            created_at: Utc::now(),
        })
    }
}
