pub mod message;
pub mod results;
pub mod settings;

pub use message::{preview, transcript, ChatMessage, ConversationSnapshot};
pub use results::{
    Abbreviation, DetailedTranslation, Formality, GrammarNote, SlangOrIdiom, SummaryPayload,
    SummaryResult, TranslationResult,
};
pub use settings::{PluginSettings, DEFAULT_MESSAGE_LIMIT};
