use crate::error::{Error, Result};
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub openrouter_api_key: String,
    pub database_path: String,
    pub cache_ttl_secs: u64,
    pub rate_limit_per_minute: u32,
    pub request_timeout_secs: u64,
    pub max_tokens: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let openrouter_api_key = env::var("OPENROUTER_API_KEY").map_err(|_| {
            Error::Config("OPENROUTER_API_KEY environment variable not set".to_string())
        })?;

        let database_path = env::var("DATABASE_PATH")
            .unwrap_or_else(|_| "brandpulse.db".to_string());

        let cache_ttl_secs = env::var("CACHE_TTL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3600);

        let rate_limit_per_minute = env::var("RATE_LIMIT_PER_MINUTE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(10);

        let request_timeout_secs = env::var("REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(45);

        let max_tokens = env::var("MAX_TOKENS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(1000);

        Ok(Self {
            openrouter_api_key,
            database_path,
            cache_ttl_secs,
            rate_limit_per_minute,
            request_timeout_secs,
            max_tokens,
        })
    }
}

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub cache_ttl_secs: u64,
    pub rate_limit_per_minute: u32,
    pub max_tokens: u32,
}

impl From<&Config> for EngineConfig {
    fn from(config: &Config) -> Self {
        Self {
            cache_ttl_secs: config.cache_ttl_secs,
            rate_limit_per_minute: config.rate_limit_per_minute,
            max_tokens: config.max_tokens,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: 3600,
            rate_limit_per_minute: 10,
            max_tokens: 1000,
        }
    }
}
