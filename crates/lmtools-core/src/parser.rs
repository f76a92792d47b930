//! Best-effort parsing of model output.
//!
//! Models are asked for JSON, usually inside a ```` ```json ```` fence. Output
//! is tried as fenced JSON, then as bare JSON, then wrapped as plain text.
//! Nothing here fails: problems are logged and a fallback shape returned.

use lmtools_types::{Abbreviation, DetailedTranslation, GrammarNote, SlangOrIdiom, SummaryPayload};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, warn};

const FENCE_OPEN: &str = "```json";
const FENCE_CLOSE: &str = "```";

/// Interior of the first ```` ```json ... ``` ```` block, whitespace trimmed.
pub fn extract_json_block(raw: &str) -> Option<&str> {
    let start = raw.find(FENCE_OPEN)? + FENCE_OPEN.len();
    let rest = &raw[start..];
    let end = rest.find(FENCE_CLOSE)?;
    Some(rest[..end].trim())
}

/// Fenced JSON if a fence exists, otherwise the whole text as JSON.
fn parse_object(raw: &str) -> Option<Map<String, Value>> {
    let (candidate, fenced) = match extract_json_block(raw) {
        Some(block) => (block, true),
        None => (raw.trim(), false),
    };

    match serde_json::from_str::<Value>(candidate) {
        Ok(Value::Object(map)) => {
            debug!(fenced, "Parsed structured model output");
            Some(map)
        }
        Ok(other) => {
            warn!(fenced, kind = json_kind(&other), "Model output is JSON but not an object");
            None
        }
        Err(e) => {
            warn!(fenced, "Model output is not valid JSON, using plain text: {}", e);
            None
        }
    }
}

pub fn parse_summary(raw: &str) -> SummaryPayload {
    let Some(map) = parse_object(raw) else {
        return SummaryPayload::from_text(raw.trim());
    };

    let summary = match map.get("summary") {
        Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
        Some(Value::Null) | None => raw.trim().to_string(),
        Some(Value::String(_)) => raw.trim().to_string(),
        Some(other) => other.to_string(),
    };

    let suggested_replies = ["suggested_replies", "suggestedReplies", "examples"]
        .iter()
        .find_map(|key| map.get(*key).and_then(Value::as_array))
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_str())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    SummaryPayload {
        summary,
        suggested_replies,
    }
}

/// Parse a translation response.
///
/// `last_unread` is the content of the newest unread message and stands in
/// for the original text when the model does not echo it back.
pub fn parse_translation(raw: &str, last_unread: &str) -> DetailedTranslation {
    let Some(map) = parse_object(raw) else {
        return DetailedTranslation {
            original_last_message: last_unread.to_string(),
            translated_last_message: raw.trim().to_string(),
            ..Default::default()
        };
    };

    DetailedTranslation {
        original_last_message: non_empty_str(&map, "originalLastMessage")
            .unwrap_or_else(|| last_unread.to_string()),
        translated_last_message: non_empty_str(&map, "translatedLastMessage")
            .unwrap_or_else(|| raw.trim().to_string()),
        slang_and_idioms: records::<SlangOrIdiom>(&map, "slangAndIdioms"),
        abbreviations: records::<Abbreviation>(&map, "abbreviations"),
        grammar_notes: records::<GrammarNote>(&map, "grammarNotes"),
    }
}

fn non_empty_str(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}

/// Array field as typed records. Missing or non-array fields are empty and
/// malformed entries are dropped.
fn records<T: DeserializeOwned>(map: &Map<String, Value>, key: &str) -> Vec<T> {
    let Some(items) = map.get(key).and_then(Value::as_array) else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| match serde_json::from_value(item.clone()) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(field = key, "Dropping malformed annotation: {}", e);
                None
            }
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
