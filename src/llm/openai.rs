//! OpenAI chat-completions structuring provider.

use serde_json::Value;

use super::provider::{structuring_prompt, ProviderConfig, ProviderError, StructuringProvider};

const ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// [`StructuringProvider`] backed by the OpenAI chat-completions API.
pub struct OpenAiProvider {
    http: reqwest::blocking::Client,
    api_key: String,
    model: String,
}

impl OpenAiProvider {
    pub fn new(config: &ProviderConfig) -> Result<Self, ProviderError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ProviderError::Transport(e.to_string()))?;
        Ok(Self {
            http,
            api_key: config.api_key.clone(),
            model: config
                .model
                .clone()
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        })
    }
}

impl StructuringProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    fn structure(&self, text: &str) -> Result<Value, ProviderError> {
        let payload = serde_json::json!({
            "model": self.model,
            "messages": [{"role": "user", "content": structuring_prompt(text)}],
            "temperature": 0.2
        });

        let response = self
            .http
            .post(ENDPOINT)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::HttpStatus(status.as_u16()));
        }

        let body: Value = response
            .json()
            .map_err(|e| ProviderError::InvalidJson(e.to_string()))?;
        let content = body
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .ok_or(ProviderError::EmptyResponse)?;
        if content.trim().is_empty() {
            return Err(ProviderError::EmptyResponse);
        }

        serde_json::from_str(content)
            .map_err(|e| ProviderError::InvalidJson(format!("model output: {}", e)))
    }
}
