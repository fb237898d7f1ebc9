pub mod config;
pub mod error;
pub mod models;
pub mod openrouter;
pub mod analysis;
pub mod limits;
pub mod storage;

pub use config::{Config, EngineConfig};
pub use error::{Error, Result};
pub use openrouter::{AiProvider, ChatMessage, CompletionProvider, OpenRouterClient};
pub use analysis::BrandIntelligenceEngine;
pub use storage::Storage;
