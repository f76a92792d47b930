//! Turns a rendered message list into [`ChatMessage`]s.

use crate::cascade::SelectorCascade;
use crate::dom::{DomNode, Element};
use crate::error::SelectorError;
use crate::selector::Selector;
use chrono::Utc;
use lmtools_types::{preview, ChatMessage, ConversationSnapshot};
use serde::{Deserialize, Serialize};

/// Selector configuration for every structural role the extractor looks up.
///
/// Defaults target the current chat client markup, with progressively
/// looser fallbacks for when hashed class names change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExtractorSelectors {
    pub message_items: Vec<String>,
    pub contents: Vec<String>,
    pub username: Vec<String>,
    pub message_body: Vec<String>,
    /// Body children matching this are quoted text and are dropped.
    pub quote_container: String,
    pub emoji_image: String,
    pub sticker_image: String,
    pub replied_message: String,
    pub replied_text: String,
    pub replied_username: Vec<String>,
}

impl Default for ExtractorSelectors {
    fn default() -> Self {
        fn owned(list: &[&str]) -> Vec<String> {
            list.iter().map(|s| s.to_string()).collect()
        }

        Self {
            message_items: owned(&[
                "li.messageListItem_d5deea",
                r#"li[id^="chat-messages-"]"#,
                ".messageListItem",
                r#"[class*="messageListItem"]"#,
                "[data-list-item-id]",
                r#"li[class*="message"]"#,
                r#"div[class*="message"]"#,
                r#"[role="listitem"]"#,
            ]),
            contents: owned(&[
                ".contents_f9f2ca",
                ".contents",
                r#"[class*="contents"]"#,
                ".messageContent",
                r#"[class*="messageContent"]"#,
            ]),
            username: owned(&[
                ".username_f9f2ca",
                ".username",
                r#"[class*="username"]"#,
                ".author",
                r#"[class*="author"]"#,
            ]),
            message_body: owned(&[
                ".messageContent_f9f2ca",
                ".messageContent",
                r#"[class*="messageContent"]"#,
                ".content",
                r#"[class*="content"]"#,
            ]),
            quote_container: ".blockquoteContainer_f8f345".to_string(),
            emoji_image: ".emojiContainer_bae8cb img".to_string(),
            sticker_image: ".clickableSticker_a1debe div div img".to_string(),
            replied_message: ".repliedMessage_f9f2ca".to_string(),
            replied_text: ".repliedTextContent_f9f2ca span".to_string(),
            replied_username: owned(&[".username_f9f2ca"]),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConversationExtractor {
    items: SelectorCascade,
    contents: SelectorCascade,
    username: SelectorCascade,
    body: SelectorCascade,
    quote: Selector,
    emoji: Selector,
    sticker: Selector,
    replied: Selector,
    replied_text: Selector,
    replied_username: SelectorCascade,
}

impl ConversationExtractor {
    pub fn new(selectors: &ExtractorSelectors) -> Result<Self, SelectorError> {
        Ok(Self {
            items: SelectorCascade::parse("message item", &selectors.message_items)?,
            contents: SelectorCascade::parse("contents", &selectors.contents)?,
            username: SelectorCascade::parse("username", &selectors.username)?,
            body: SelectorCascade::parse("message body", &selectors.message_body)?,
            quote: Selector::parse(&selectors.quote_container)?,
            emoji: Selector::parse(&selectors.emoji_image)?,
            sticker: Selector::parse(&selectors.sticker_image)?,
            replied: Selector::parse(&selectors.replied_message)?,
            replied_text: Selector::parse(&selectors.replied_text)?,
            replied_username: SelectorCascade::parse("replied username", &selectors.replied_username)?,
        })
    }

    /// Extractor configured with [`ExtractorSelectors::default`].
    pub fn with_default_selectors() -> Result<Self, SelectorError> {
        Self::new(&ExtractorSelectors::default())
    }

    /// Extract the visible conversation, keeping the last `limit` messages
    /// (`0` keeps all of them).
    ///
    /// Never fails: items that cannot be read are skipped and an unreadable
    /// page yields an empty list.
    pub fn extract(&self, document: &Element, limit: usize) -> Vec<ChatMessage> {
        let Some((items, selector)) = self.items.all_in(document) else {
            tracing::warn!("No message items found with any selector");
            return Vec::new();
        };
        tracing::debug!(selector = %selector, count = items.len(), "Selected message items");

        let now_ms = Utc::now().timestamp_millis();
        // Consecutive messages from one author only label the first
        let mut last_username = String::new();

        let messages: Vec<ChatMessage> = items
            .into_iter()
            .enumerate()
            .filter_map(|(index, item)| self.extract_item(item, index, &mut last_username, now_ms))
            .filter(|message| !message.content.is_empty())
            .collect();

        let total = messages.len();
        let recent = ConversationSnapshot::new(messages).truncated(limit).into_messages();
        tracing::info!(total, returned = recent.len(), limit, "Extracted conversation");

        recent
    }

    fn extract_item(
        &self,
        item: &Element,
        index: usize,
        last_username: &mut String,
        now_ms: i64,
    ) -> Option<ChatMessage> {
        let Some((contents, _)) = self.contents.first_in(item) else {
            tracing::warn!(index, "No contents region found, skipping item");
            return None;
        };

        let username_element = self.username.first_in(contents).map(|(el, _)| el);

        let Some((body, _)) = self.body.first_in(contents) else {
            tracing::warn!(index, "No message body found, skipping item");
            return None;
        };

        let id = message_id(body, index, now_ms);

        let username = match username_element {
            Some(el) => el.text_content().trim().to_string(),
            None => last_username.clone(),
        };

        let mut content = self.body_text(body);

        if let Some(sticker) = item.query_selector(&self.sticker) {
            let label = sticker.attr("alt").filter(|alt| !alt.is_empty()).unwrap_or("sticker");
            content.push('<');
            content.push_str(label);
            content.push('>');
        }

        if username_element.is_some() {
            *last_username = username.clone();
        }

        let (reference_username, reference_message) = self.reply_reference(item);
        if let (Some(ref_user), Some(ref_text)) = (&reference_username, &reference_message) {
            content = format!("Reference: {} - {}\n\n{}", ref_user, ref_text, content);
        }

        tracing::debug!(
            index,
            id = %id,
            username = %username,
            preview = %preview(&content, 100),
            "Extracted message"
        );

        Some(ChatMessage::new(id, username, content).with_reference(reference_username, reference_message))
    }

    /// Text of the body's direct children: quotes dropped, emoji as alt text.
    fn body_text(&self, body: &Element) -> String {
        let context = [body];
        body.children
            .iter()
            .map(|node| match node {
                DomNode::Text(text) => text.trim_start().to_string(),
                DomNode::Element(element) => {
                    if self.quote.matches(element, &context) {
                        return String::new();
                    }
                    match element.query_selector(&self.emoji) {
                        Some(img) => img.attr("alt").unwrap_or_default().to_string(),
                        None => element.text_content().trim_start().to_string(),
                    }
                }
            })
            .collect()
    }

    fn reply_reference(&self, item: &Element) -> (Option<String>, Option<String>) {
        let Some(replied) = item.query_selector(&self.replied) else {
            return (None, None);
        };
        let Some(text_element) = replied.query_selector(&self.replied_text) else {
            return (None, None);
        };

        let message = non_empty(text_element.text_content().trim());
        let username = self
            .replied_username
            .first_in(replied)
            .or_else(|| self.replied_username.first_in(item))
            .and_then(|(el, _)| non_empty(el.text_content().trim()));

        (username, message)
    }
}

/// Digits of the body's element id (`message-content-<snowflake>`), else a
/// synthetic `<millis>-<index>` id.
fn message_id(body: &Element, index: usize, now_ms: i64) -> String {
    let digits: String = body
        .id()
        .unwrap_or_default()
        .chars()
        .filter(char::is_ascii_digit)
        .collect();
    if digits.is_empty() {
        format!("{}-{}", now_ms, index)
    } else {
        digits
    }
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_id_from_element_id() {
        let body = Element::new("div").with_id("message-content-1308457639944126515");
        assert_eq!(message_id(&body, 0, 42), "1308457639944126515");
    }

    #[test]
    fn test_message_id_fallback() {
        let body = Element::new("div");
        assert_eq!(message_id(&body, 3, 1700000000000), "1700000000000-3");
        let body = Element::new("div").with_id("no-digits");
        assert_eq!(message_id(&body, 1, 5), "5-1");
    }

    #[test]
    fn test_default_selectors_parse() {
        assert!(ConversationExtractor::with_default_selectors().is_ok());
    }
}
