pub mod cascade;
pub mod dom;
pub mod error;
pub mod extractor;
pub mod page;
pub mod selector;
pub mod source;

pub use cascade::SelectorCascade;
pub use dom::{DomNode, Element};
pub use error::{ExtractError, Result, SelectorError};
pub use extractor::{ConversationExtractor, ExtractorSelectors};
pub use page::{channel_id_from_path, read_draft_input, read_self_name, PageReader, PageSelectors};
pub use selector::Selector;
pub use source::{
    ConversationSource, DocumentProvider, DomConversationSource, StaticConversationSource,
    StaticDocument,
};
