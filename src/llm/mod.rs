//! Answer-generation backend module
//!
//! One non-streaming completion call per request, against either the
//! hosted Gemini API or a local Ollama instance.

pub mod client;

pub use client::LlmClient;
pub use client::LlmProvider;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::LlmConfig;
use crate::errors::Result;
use crate::errors::WebRagError;

/// Seam for the generative backend.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a completion for the prompt.
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Create a generator from the llm section of the application config.
pub fn create_generator(config: &LlmConfig) -> Result<Arc<dyn TextGenerator>> {
    match config.provider.as_str() {
        "gemini" => Ok(Arc::new(LlmClient::new(
            LlmProvider::Gemini,
            config.model.clone(),
            config.endpoint.clone(),
            config.api_key.clone(),
        )?)),
        "ollama" => Ok(Arc::new(LlmClient::new(
            LlmProvider::Ollama,
            config.model.clone(),
            config.endpoint.clone(),
            None,
        )?)),
        other => Err(WebRagError::Configuration(format!(
            "unknown llm provider: {other}"
        ))),
    }
}
