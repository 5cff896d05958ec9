//! Priority-ordered structuring fallback chain.

use serde_json::Value;

use super::gemini::GeminiProvider;
use super::openai::OpenAiProvider;
use super::provider::{ProviderConfig, ProviderKind, StructuringProvider};

/// An ordered sequence of external structuring attempts.
///
/// Each provider is tried exactly once, in priority order. Any failure —
/// transport, non-success status, empty or non-JSON content — moves
/// control to the next provider immediately. Exhaustion is reported as
/// `None`, an expected outcome the pipeline handles by falling back to
/// rule-based segmentation.
pub struct StructuringChain {
    providers: Vec<Box<dyn StructuringProvider>>,
}

impl StructuringChain {
    /// Build a chain from explicit provider instances, in order.
    pub fn new(providers: Vec<Box<dyn StructuringProvider>>) -> Self {
        Self { providers }
    }

    /// Build a chain from provider configurations, sorted by priority
    /// (stable, so equal priorities keep configuration order).
    ///
    /// A provider whose HTTP client cannot be constructed is skipped with
    /// a warning rather than failing the pipeline.
    pub fn from_configs(configs: &[ProviderConfig]) -> Self {
        let mut ordered: Vec<&ProviderConfig> = configs.iter().collect();
        ordered.sort_by_key(|config| config.priority);

        let mut providers: Vec<Box<dyn StructuringProvider>> = Vec::new();
        for config in ordered {
            match config.provider {
                ProviderKind::OpenAi => match OpenAiProvider::new(config) {
                    Ok(provider) => providers.push(Box::new(provider)),
                    Err(e) => log::warn!("skipping openai provider: {}", e),
                },
                ProviderKind::Gemini => match GeminiProvider::new(config) {
                    Ok(provider) => providers.push(Box::new(provider)),
                    Err(e) => log::warn!("skipping gemini provider: {}", e),
                },
            }
        }

        Self { providers }
    }

    /// An empty chain never attempts anything.
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Number of configured providers.
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Run the chain against the document's full text.
    ///
    /// Returns the first provider's parsed JSON on success, or `None` once
    /// every attempt has failed.
    pub fn structure(&self, text: &str) -> Option<Value> {
        for provider in &self.providers {
            match provider.structure(text) {
                Ok(value) => {
                    log::info!("structuring provider '{}' succeeded", provider.name());
                    return Some(value);
                }
                Err(e) => {
                    log::warn!("structuring provider '{}' failed: {}", provider.name(), e);
                }
            }
        }

        if !self.providers.is_empty() {
            log::info!("all structuring providers failed; using rule-based segmentation");
        }
        None
    }
}
