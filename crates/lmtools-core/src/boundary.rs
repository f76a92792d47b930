//! Which part of the visible conversation the user has not answered yet.
//!
//! The host exposes no read state, so the boundary is inferred from where
//! the user last spoke.

use lmtools_types::ChatMessage;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryError {
    #[error("No messages from other users found; nothing to translate")]
    NoOtherAuthor,

    #[error("No unread messages to translate")]
    NoContent,
}

/// Non-empty run of messages the user has not replied to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnreadBlock<'a> {
    messages: &'a [ChatMessage],
    last: &'a ChatMessage,
}

impl<'a> UnreadBlock<'a> {
    pub fn messages(&self) -> &'a [ChatMessage] {
        self.messages
    }

    /// Newest unread message.
    pub fn last(&self) -> &'a ChatMessage {
        self.last
    }
}

/// Slice of `messages` the user identified by `self_name` has not replied to.
///
/// - The user never spoke: everything is unread.
/// - The last message is someone else's: everything after the user's last
///   message is unread.
/// - The conversation ends with the user's own messages: the block of other
///   authors' messages right before that trailing run is unread, starting
///   after the user's previous message.
pub fn resolve_unread<'a>(
    messages: &'a [ChatMessage],
    self_name: &str,
) -> Result<UnreadBlock<'a>, BoundaryError> {
    let is_self = |m: &ChatMessage| m.is_authored_by(self_name);

    let unread = match messages.iter().rposition(is_self) {
        None => {
            debug!("No self messages found, treating all messages as unread");
            messages
        }
        Some(last_self) if last_self + 1 == messages.len() => {
            let other_end = messages[..last_self]
                .iter()
                .rposition(|m| !is_self(m))
                .ok_or(BoundaryError::NoOtherAuthor)?;
            let start = messages[..other_end]
                .iter()
                .rposition(is_self)
                .map_or(0, |i| i + 1);

            debug!(
                trailing_self = messages.len() - other_end - 1,
                start,
                end = other_end,
                "Conversation ends with self messages, using the preceding block"
            );
            &messages[start..=other_end]
        }
        Some(last_self) => &messages[last_self + 1..],
    };

    let Some(last) = unread.last() else {
        return Err(BoundaryError::NoContent);
    };
    Ok(UnreadBlock {
        messages: unread,
        last,
    })
}
