//! Completion service integration.
//!
//! The webhook handler only sees the `LlmProvider` trait. The production
//! implementation is `OpenAiProvider`, which speaks the OpenAI chat
//! completions wire format over reqwest and works with any compatible API
//! reachable at `base_url`.

mod costs;
pub mod openai;
pub mod provider;

pub use openai::OpenAiProvider;
pub use provider::*;

use std::sync::Arc;
use std::time::Duration;

use crate::error::LlmError;

/// Configuration for creating an LLM provider.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: secrecy::SecretString,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

/// Create an LLM provider from configuration.
pub fn create_provider(config: &LlmConfig) -> Result<Arc<dyn LlmProvider>, LlmError> {
    let provider = OpenAiProvider::new(
        config.api_key.clone(),
        config.model.clone(),
        &config.base_url,
        config.timeout,
    )?;
    tracing::info!(model = %config.model, base_url = %config.base_url, "Using OpenAI-compatible provider");
    Ok(Arc::new(provider))
}
