//! Gemini generateContent structuring provider.

use serde_json::Value;

use super::provider::{structuring_prompt, ProviderConfig, ProviderError, StructuringProvider};

const DEFAULT_MODEL: &str = "gemini-pro";

/// [`StructuringProvider`] backed by the Gemini generateContent API.
pub struct GeminiProvider {
    http: reqwest::blocking::Client,
    api_key: String,
    model: String,
}

impl GeminiProvider {
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

    fn endpoint(&self) -> String {
        format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent?key={}",
            self.model, self.api_key
        )
    }
}

impl StructuringProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn structure(&self, text: &str) -> Result<Value, ProviderError> {
        let payload = serde_json::json!({
            "contents": [{
                "parts": [{"text": structuring_prompt(text)}]
            }]
        });

        let response = self
            .http
            .post(self.endpoint())
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
        let raw = body
            .pointer("/candidates/0/content/parts/0/text")
            .and_then(Value::as_str)
            .ok_or(ProviderError::EmptyResponse)?;
        if raw.trim().is_empty() {
            return Err(ProviderError::EmptyResponse);
        }

        serde_json::from_str(raw)
            .map_err(|e| ProviderError::InvalidJson(format!("model output: {}", e)))
    }
}
