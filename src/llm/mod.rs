//! External structuring services and their fallback chain.
//!
//! Each provider is handed the document's full text and asked to return a
//! JSON document; the chain tries providers strictly in priority order and
//! falls through on any failure without retrying. Exhaustion is an
//! expected outcome, not an error — the pipeline then uses the rule-based
//! segmenter instead.

mod chain;
mod gemini;
mod openai;
mod provider;

pub use chain::StructuringChain;
pub use gemini::GeminiProvider;
pub use openai::OpenAiProvider;
pub use provider::{ProviderConfig, ProviderError, ProviderKind, StructuringProvider};
