use serde::{Deserialize, Serialize};

/// Chat message as sent on the wire by both providers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Message {
    /// System prompt (instructions)
    System { content: String },

    /// User/Human message
    #[serde(rename = "user")]
    Human { content: String },
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self::System {
            content: content.into(),
        }
    }

    pub fn human(content: impl Into<String>) -> Self {
        Self::Human {
            content: content.into(),
        }
    }

    pub fn role(&self) -> &str {
        match self {
            Self::System { .. } => "system",
            Self::Human { .. } => "user",
        }
    }

    pub fn content(&self) -> &str {
        match self {
            Self::System { content } | Self::Human { content } => content,
        }
    }
}

/// Merge system messages into the first user message as `"{system}\n\n{user}"`.
///
/// Used for models and providers that reject a separate system role.
pub fn fold_system_into_user(messages: Vec<Message>) -> Vec<Message> {
    let system = messages
        .iter()
        .filter_map(|m| match m {
            Message::System { content } => Some(content.as_str()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    let mut folded = Vec::with_capacity(messages.len());
    let mut pending_system = (!system.is_empty()).then_some(system);

    for message in messages {
        match message {
            Message::System { .. } => {}
            Message::Human { content } => match pending_system.take() {
                Some(system) => folded.push(Message::human(format!("{}\n\n{}", system, content))),
                None => folded.push(Message::Human { content }),
            },
        }
    }

    // System prompt with no user turn to attach to
    if let Some(system) = pending_system {
        folded.push(Message::human(system));
    }

    folded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_with_wire_roles() {
        let json = serde_json::to_string(&Message::human("hi")).unwrap();
        assert_eq!(json, r#"{"role":"user","content":"hi"}"#);
        let json = serde_json::to_string(&Message::system("be brief")).unwrap();
        assert_eq!(json, r#"{"role":"system","content":"be brief"}"#);
    }

    #[test]
    fn test_fold_prepends_system_to_user() {
        let folded = fold_system_into_user(vec![Message::system("sys"), Message::human("prompt")]);
        assert_eq!(folded, vec![Message::human("sys\n\nprompt")]);
    }

    #[test]
    fn test_fold_without_system_is_identity() {
        let folded = fold_system_into_user(vec![Message::human("prompt")]);
        assert_eq!(folded, vec![Message::human("prompt")]);
    }
}
