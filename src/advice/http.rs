//! Chat-completions client for the advice service

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::AdviceConfig;
use crate::plan::RetirementPlan;
use super::{AdviceError, AdvicePrompt, AdviceProvider};

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}

/// HTTP advice client for OpenAI-compatible endpoints
pub struct HttpAdviceClient {
    http: Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    temperature: f32,
    timeout: Duration,
    prompt: AdvicePrompt,
}

impl HttpAdviceClient {
    /// Create a new client from configuration
    ///
    /// Reads the API key from the environment variable named in config,
    /// unless that name is empty.
    pub fn from_config(config: &AdviceConfig) -> Result<Self, AdviceError> {
        debug!("from_config: base_url={} model={}", config.base_url, config.model);
        let api_key = if config.api_key_env.is_empty() {
            None
        } else {
            match std::env::var(&config.api_key_env) {
                Ok(key) if !key.trim().is_empty() => Some(key),
                _ => return Err(AdviceError::MissingApiKey(config.api_key_env.clone())),
            }
        };

        let timeout = Duration::from_millis(config.timeout_ms);
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            model: config.model.clone(),
            api_key,
            temperature: config.temperature,
            timeout,
            prompt: AdvicePrompt::new(),
        })
    }

    /// Replace the advisor prompt
    pub fn with_prompt(mut self, prompt: AdvicePrompt) -> Self {
        self.prompt = prompt;
        self
    }

    fn build_request(&self, prompt: String) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            temperature: self.temperature,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt,
            }],
        }
    }

    fn map_transport_error(&self, err: reqwest::Error) -> AdviceError {
        if err.is_timeout() {
            AdviceError::Timeout(self.timeout)
        } else {
            AdviceError::Network(err)
        }
    }
}

/// Pull the advice text out of a completion response
fn extract_advice(response: ChatCompletionResponse) -> Result<String, AdviceError> {
    let text = response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .map(|t| t.trim().to_string())
        .unwrap_or_default();

    if text.is_empty() {
        return Err(AdviceError::InvalidResponse("no advice in response".to_string()));
    }
    Ok(text)
}

#[async_trait]
impl AdviceProvider for HttpAdviceClient {
    async fn request_advice(&self, plan: &RetirementPlan) -> Result<String, AdviceError> {
        let prompt = self.prompt.render(plan)?;
        let body = self.build_request(prompt);

        debug!("request_advice: POST {}", self.endpoint);
        let mut request = self.http.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| self.map_transport_error(e))?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!("request_advice: service returned {}", status);
            return Err(AdviceError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| AdviceError::InvalidResponse(e.to_string()))?;
        extract_advice(completion)
    }
}
