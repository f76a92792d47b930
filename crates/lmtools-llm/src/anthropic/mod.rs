pub mod client;

pub use client::{AnthropicClient, ANTHROPIC_API_BASE, ANTHROPIC_VERSION};
