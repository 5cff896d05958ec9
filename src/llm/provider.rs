//! Structuring provider trait, configuration, and typed failure reasons.

use std::time::Duration;

use serde_json::Value;
use thiserror::Error;

/// Why a single structuring attempt failed.
///
/// Consumed by the chain's sequential-fallback logic; never caught
/// generically and never surfaced to the pipeline caller.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Connection, TLS, or timeout failure before a response arrived.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The service responded with a non-success HTTP status.
    #[error("service returned HTTP {0}")]
    HttpStatus(u16),

    /// The response arrived but carried no usable content.
    #[error("empty response")]
    EmptyResponse,

    /// The response content did not parse as JSON.
    #[error("response is not valid JSON: {0}")]
    InvalidJson(String),
}

/// Which hosted service a [`ProviderConfig`] selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    OpenAi,
    Gemini,
}

/// Configuration for one structuring provider.
///
/// Credentials are explicit state passed in at construction time, never
/// ambient globals. Providers are tried in ascending `priority` order;
/// equal priorities keep configuration order.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Which service to call
    pub provider: ProviderKind,
    /// API key for the service
    pub api_key: String,
    /// Position in the fallback chain (lower tries first)
    pub priority: u32,
    /// Model override; each provider has a default
    pub model: Option<String>,
    /// Request timeout; expiry counts as an attempt failure
    pub timeout: Duration,
}

impl ProviderConfig {
    pub fn new(provider: ProviderKind, api_key: impl Into<String>) -> Self {
        Self {
            provider,
            api_key: api_key.into(),
            priority: 0,
            model: None,
            timeout: Duration::from_secs(60),
        }
    }

    /// Set the chain priority (lower tries first).
    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }

    /// Override the model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// A single external structuring attempt.
pub trait StructuringProvider {
    /// Provider name for logging.
    fn name(&self) -> &str;

    /// Ask the service to structure the given text into a JSON document.
    fn structure(&self, text: &str) -> Result<Value, ProviderError>;
}

/// The instruction sent to every provider.
pub(crate) fn structuring_prompt(text: &str) -> String {
    format!(
        "Convert the following PDF content into structured JSON:\n\n{}",
        text
    )
}
