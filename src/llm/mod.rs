//! LLM integration for the onboarding coach.
//!
//! The relays talk to models only through the [`LlmProvider`] trait. The one
//! concrete backend is Gemini's `generateContent` REST API, called with
//! reqwest; the vision and coaching relays each get their own provider so
//! they can run different models.

pub mod gemini;
pub mod provider;

pub use gemini::GeminiProvider;
pub use provider::*;

use std::sync::Arc;
use std::time::Duration;

use crate::error::LlmError;

/// Configuration for creating an LLM provider.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// `None` yields a provider that reports itself unconfigured.
    pub api_key: Option<secrecy::SecretString>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

/// Create an LLM provider from configuration.
pub fn create_provider(config: &LlmConfig) -> Result<Arc<dyn LlmProvider>, LlmError> {
    let provider = GeminiProvider::new(
        config.api_key.clone(),
        &config.model,
        &config.base_url,
        config.timeout,
    )?;
    if provider.is_configured() {
        tracing::info!("Using Gemini (model: {})", config.model);
    } else {
        tracing::warn!(
            "Gemini API key missing, model {} will reject requests",
            config.model
        );
    }
    Ok(Arc::new(provider))
}
