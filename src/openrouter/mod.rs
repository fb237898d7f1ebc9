pub mod client;
pub mod provider;
pub mod prompts;

pub use client::OpenRouterClient;
pub use provider::{AiProvider, ChatMessage, CompletionProvider};
