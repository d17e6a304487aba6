//! Advice service configuration

use log::warn;
use serde::{Deserialize, Serialize};
use std::env;

/// Connection settings for the advice service
///
/// Any OpenAI-compatible chat-completions endpoint works, including local
/// servers that need no API key (set `api_key_env` to an empty string).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdviceConfig {
    /// API base URL; `/chat/completions` is appended
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Model identifier
    pub model: String,

    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,

    /// Sampling temperature
    pub temperature: f32,
}

impl Default for AdviceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            timeout_ms: 60_000,
            temperature: 0.7,
        }
    }
}

impl AdviceConfig {
    /// Defaults overridden by `ADVICE_*` environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = env::var("ADVICE_BASE_URL") {
            config.base_url = url;
        }
        if let Ok(model) = env::var("ADVICE_MODEL") {
            config.model = model;
        }
        if let Ok(key_env) = env::var("ADVICE_API_KEY_ENV") {
            config.api_key_env = key_env;
        }
        if let Ok(timeout) = env::var("ADVICE_TIMEOUT_MS") {
            match timeout.parse() {
                Ok(ms) => config.timeout_ms = ms,
                Err(_) => warn!("Ignoring invalid ADVICE_TIMEOUT_MS: {}", timeout),
            }
        }

        config
    }
}
