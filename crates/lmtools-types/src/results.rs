use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Structured summary parsed from the model output.
///
/// `suggested_replies` is always present (possibly empty) so renderers never
/// need to null-check it. `examples` is accepted as an alias.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryPayload {
    pub summary: String,
    #[serde(default, alias = "examples")]
    pub suggested_replies: Vec<String>,
}

impl SummaryPayload {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            summary: text.into(),
            suggested_replies: Vec::new(),
        }
    }

    /// Plain-text rendering suitable for copying to the clipboard.
    pub fn to_plain_text(&self) -> String {
        if self.suggested_replies.is_empty() {
            return self.summary.clone();
        }
        let replies = self
            .suggested_replies
            .iter()
            .enumerate()
            .map(|(i, reply)| format!("{}. {}", i + 1, reply))
            .collect::<Vec<_>>()
            .join("\n");
        format!("{}\n\nSuggested replies:\n{}", self.summary, replies)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResult {
    pub channel_id: String,
    pub summary: SummaryPayload,
    /// Model output as received, before parsing.
    pub raw_response: String,
    pub message_count: usize,
    pub time_range: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Formality {
    Formal,
    Informal,
    #[default]
    #[serde(other)]
    Slang,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SlangOrIdiom {
    pub original: String,
    pub meaning: String,
    /// Closest expression in the target language.
    #[serde(alias = "koreanEquivalent")]
    pub equivalent: String,
    pub usage: String,
    pub formality: Formality,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Abbreviation {
    pub abbr: String,
    pub full_form: String,
    pub meaning: String,
    pub common_usage: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GrammarNote {
    pub pattern: String,
    pub explanation: String,
    pub examples: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedTranslation {
    pub original_last_message: String,
    pub translated_last_message: String,
    #[serde(default)]
    pub slang_and_idioms: Vec<SlangOrIdiom>,
    #[serde(default)]
    pub abbreviations: Vec<Abbreviation>,
    #[serde(default)]
    pub grammar_notes: Vec<GrammarNote>,
}

impl DetailedTranslation {
    pub fn has_annotations(&self) -> bool {
        !self.slang_and_idioms.is_empty()
            || !self.abbreviations.is_empty()
            || !self.grammar_notes.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationResult {
    pub channel_id: String,
    pub original_text: String,
    pub translated_text: String,
    pub target_language: String,
    /// Author of the last unread message.
    pub username: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detailed_translation: Option<DetailedTranslation>,
}
