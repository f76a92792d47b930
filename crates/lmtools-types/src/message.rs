use serde::{Deserialize, Serialize};

/// One message extracted from the visible conversation.
///
/// Created fresh on every extraction and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    /// Author label. Inherited from the previous message when the source omits it.
    pub username: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_message: Option<String>,
}

impl ChatMessage {
    pub fn new(
        id: impl Into<String>,
        username: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            content: content.into(),
            reference_username: None,
            reference_message: None,
        }
    }

    pub fn with_reference(
        mut self,
        username: Option<String>,
        message: Option<String>,
    ) -> Self {
        self.reference_username = username;
        self.reference_message = message;
        self
    }

    pub fn is_authored_by(&self, name: &str) -> bool {
        self.username == name
    }

    /// `username: content`, the line format used in prompts
    pub fn to_transcript_line(&self) -> String {
        format!("{}: {}", self.username, self.content)
    }
}

/// Ordered messages in visual order, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationSnapshot {
    messages: Vec<ChatMessage>,
}

impl ConversationSnapshot {
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self { messages }
    }

    /// Keep only the most recent `limit` messages. `0` keeps everything.
    pub fn truncated(mut self, limit: usize) -> Self {
        if limit > 0 && self.messages.len() > limit {
            let excess = self.messages.len() - limit;
            self.messages.drain(..excess);
        }
        self
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn into_messages(self) -> Vec<ChatMessage> {
        self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    /// Render as newline-separated `username: content` lines.
    pub fn transcript(&self) -> String {
        transcript(&self.messages)
    }

    /// Rough label for how much time the snapshot spans.
    ///
    /// There are no timestamps in the source, so this is estimated from the
    /// message count: one hour per ten messages, clamped to 1..=24.
    pub fn time_range_label(&self) -> String {
        if self.messages.is_empty() {
            return "unknown".to_string();
        }
        let hours = (self.messages.len() / 10).clamp(1, 24);
        if hours == 1 {
            "last 1 hour".to_string()
        } else {
            format!("last {} hours", hours)
        }
    }
}

impl From<Vec<ChatMessage>> for ConversationSnapshot {
    fn from(messages: Vec<ChatMessage>) -> Self {
        Self::new(messages)
    }
}

/// Render any message slice as a prompt transcript.
pub fn transcript(messages: &[ChatMessage]) -> String {
    messages
        .iter()
        .map(ChatMessage::to_transcript_line)
        .collect::<Vec<_>>()
        .join("\n")
}

/// First `max_chars` characters of `s`, with `...` appended when truncated.
pub fn preview(s: &str, max_chars: usize) -> String {
    let mut out: String = s.chars().take(max_chars).collect();
    if s.chars().count() > max_chars {
        out.push_str("...");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(n: usize) -> Vec<ChatMessage> {
        (0..n)
            .map(|i| ChatMessage::new(i.to_string(), "alice", format!("msg {}", i)))
            .collect()
    }

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        assert_eq!(preview("안녕하세요", 2), "안녕...");
        assert_eq!(preview("hi", 10), "hi");
    }

    #[test]
    fn test_truncated_keeps_most_recent_in_order() {
        let snapshot = ConversationSnapshot::new(numbered(10)).truncated(3);
        let ids: Vec<_> = snapshot.messages().iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["7", "8", "9"]);
    }

    #[test]
    fn test_truncated_zero_is_unbounded() {
        let snapshot = ConversationSnapshot::new(numbered(10)).truncated(0);
        assert_eq!(snapshot.len(), 10);
    }

    #[test]
    fn test_transcript_format() {
        let snapshot = ConversationSnapshot::new(vec![
            ChatMessage::new("1", "alice", "hi"),
            ChatMessage::new("2", "bob", "yo"),
        ]);
        assert_eq!(snapshot.transcript(), "alice: hi\nbob: yo");
    }

    #[test]
    fn test_time_range_label() {
        assert_eq!(ConversationSnapshot::default().time_range_label(), "unknown");
        assert_eq!(ConversationSnapshot::new(numbered(5)).time_range_label(), "last 1 hour");
        assert_eq!(ConversationSnapshot::new(numbered(35)).time_range_label(), "last 3 hours");
        assert_eq!(ConversationSnapshot::new(numbered(500)).time_range_label(), "last 24 hours");
    }

    #[test]
    fn test_serialization_uses_camel_case_and_skips_missing_reference() {
        let msg = ChatMessage::new("1", "alice", "hi");
        let json = serde_json::to_string(&msg).unwrap();
        assert!(!json.contains("referenceUsername"));

        let msg = msg.with_reference(Some("bob".into()), Some("earlier".into()));
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"referenceUsername\":\"bob\""));
    }
}
