//! Embeddings generation module
//!
//! Provides text embeddings from several providers:
//! - Gemini (hosted, `embedContent`/`batchEmbedContents`)
//! - Ollama (local models)
//! - Mock (deterministic, for tests and offline runs)
//!
//! Vectors are validated at this boundary: a response with the wrong
//! dimensionality or non-finite components is rejected before anything
//! downstream sees it.

pub mod client;
pub mod mock;

pub use client::EmbeddingClient;
pub use client::EmbeddingProvider;
pub use mock::MockEmbedder;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::EmbeddingsConfig;
use crate::errors::Result;
use crate::errors::WebRagError;

/// Seam for the embedding backend.
#[async_trait]
pub trait Embedder: Send + Sync + std::fmt::Debug {
    /// Dimensionality of the vectors this embedder produces.
    fn dimension(&self) -> usize;

    /// Embed a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed several texts in one backend round trip where the provider
    /// supports it. Output order matches input order.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}

/// Create an embedder from configuration. The hosted provider borrows the
/// generative API credential.
pub fn create_embedder(
    config: &EmbeddingsConfig,
    api_key: Option<&str>,
) -> Result<Arc<dyn Embedder>> {
    match config.provider.as_str() {
        "gemini" => Ok(Arc::new(EmbeddingClient::new(
            EmbeddingProvider::Gemini,
            config.model.clone(),
            config.endpoint.clone(),
            api_key.map(str::to_string),
            config.dimension,
        )?)),
        "ollama" => Ok(Arc::new(EmbeddingClient::new(
            EmbeddingProvider::Ollama,
            config.model.clone(),
            config.endpoint.clone(),
            None,
            config.dimension,
        )?)),
        "mock" => Ok(Arc::new(MockEmbedder::new(config.dimension))),
        other => Err(WebRagError::Configuration(format!(
            "unknown embedding provider: {other}"
        ))),
    }
}

/// Reject malformed vectors at the provider boundary: wrong dimensionality
/// or non-finite components mean no trustworthy filtering can proceed.
pub(crate) fn validate_vector(vector: &[f32], expected_dimension: usize) -> Result<()> {
    if vector.len() != expected_dimension {
        return Err(WebRagError::Embedding(format!(
            "expected {expected_dimension}-dimensional embedding, got {}",
            vector.len()
        )));
    }
    if vector.iter().any(|v| !v.is_finite()) {
        return Err(WebRagError::Embedding(
            "embedding contains non-finite components".to_string(),
        ));
    }
    Ok(())
}
