use crate::dom::Element;
use crate::error::Result;
use crate::extractor::ConversationExtractor;
use lmtools_types::ChatMessage;
use std::sync::Arc;
use tracing::warn;

/// Supplies the current rendered document.
pub trait DocumentProvider: Send + Sync {
    fn document(&self) -> Result<Element>;
}

/// Anything that can list the messages currently visible in a channel.
pub trait ConversationSource: Send + Sync {
    /// Oldest to newest, at most `limit` entries (0 means no limit).
    fn list_visible_messages(&self, limit: usize) -> Vec<ChatMessage>;
}

pub struct DomConversationSource<D> {
    extractor: ConversationExtractor,
    provider: D,
}

impl<D: DocumentProvider> DomConversationSource<D> {
    pub fn new(extractor: ConversationExtractor, provider: D) -> Self {
        Self { extractor, provider }
    }

    pub fn provider(&self) -> &D {
        &self.provider
    }
}

impl<D: DocumentProvider> ConversationSource for DomConversationSource<D> {
    fn list_visible_messages(&self, limit: usize) -> Vec<ChatMessage> {
        match self.provider.document() {
            Ok(document) => self.extractor.extract(&document, limit),
            Err(e) => {
                warn!("Failed to read document, no messages extracted: {}", e);
                Vec::new()
            }
        }
    }
}

/// Fixed message list, mostly for hosts that already hold the messages.
#[derive(Debug, Clone, Default)]
pub struct StaticConversationSource(pub Vec<ChatMessage>);

impl ConversationSource for StaticConversationSource {
    fn list_visible_messages(&self, limit: usize) -> Vec<ChatMessage> {
        let messages = &self.0;
        let start = if limit > 0 && messages.len() > limit {
            messages.len() - limit
        } else {
            0
        };
        messages[start..].to_vec()
    }
}

impl<T: DocumentProvider + ?Sized> DocumentProvider for Arc<T> {
    fn document(&self) -> Result<Element> {
        (**self).document()
    }
}

/// Always returns a copy of the same tree.
#[derive(Debug, Clone)]
pub struct StaticDocument(pub Element);

impl DocumentProvider for StaticDocument {
    fn document(&self) -> Result<Element> {
        Ok(self.0.clone())
    }
}
