pub mod adapter;
pub mod anthropic;
pub mod config;
pub mod error;
pub mod openai;
pub mod traits;
pub mod types;

pub use traits::{
    ChatClient, CompletionProvider,
    ChatRequest, ChatResponse, ChatOptions,
    TokenUsage,
};

pub use adapter::ProviderAdapter;
pub use anthropic::AnthropicClient;
pub use config::{ApiConfig, ProviderType};
pub use error::{ApiError, LlmError, Result};
pub use openai::OpenAIClient;
pub use types::Message;
