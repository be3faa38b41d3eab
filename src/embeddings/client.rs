//! Embedding API clients for hosted and local providers

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

use super::validate_vector;
use super::Embedder;
use crate::errors::Result;
use crate::errors::WebRagError;

/// Supported embedding providers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingProvider {
    /// Gemini embeddings API (`embedContent`)
    Gemini,
    /// Ollama local embeddings
    Ollama,
}

/// Client for generating embeddings over HTTP.
#[derive(Debug)]
pub struct EmbeddingClient {
    provider: EmbeddingProvider,
    model: String,
    endpoint: String,
    api_key: Option<String>,
    dimension: usize,
    client: Client,
}

impl EmbeddingClient {
    /// Create a new embedding client.
    pub fn new(
        provider: EmbeddingProvider,
        model: String,
        endpoint: String,
        api_key: Option<String>,
        dimension: usize,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .map_err(|e| WebRagError::Configuration(e.to_string()))?;

        Ok(Self {
            provider,
            model,
            endpoint,
            api_key,
            dimension,
            client,
        })
    }

    fn api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                WebRagError::Configuration("Gemini API key not provided".to_string())
            })
    }

    /// Generate an embedding using the Gemini API
    async fn embed_gemini(&self, text: &str) -> Result<Vec<f32>> {
        let api_key = self.api_key()?;

        #[derive(Serialize)]
        struct GeminiRequest<'a> {
            content: Content<'a>,
        }

        let url = format!(
            "{}/v1beta/models/{}:embedContent",
            self.endpoint, self.model
        );
        debug!("Calling Gemini embeddings API: {}", url);

        let request = GeminiRequest {
            content: Content {
                parts: vec![Part { text }],
            },
        };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| WebRagError::Embedding(format!("embedding request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(WebRagError::Embedding(format!(
                "Gemini API error ({status}): {error_text}"
            )));
        }

        let result: GeminiResponse = response
            .json()
            .await
            .map_err(|e| WebRagError::Embedding(format!("Failed to parse response: {e}")))?;

        let vector = result.embedding.values;
        validate_vector(&vector, self.dimension)?;
        Ok(vector)
    }

    /// Generate embeddings in batch using the Gemini API
    async fn embed_batch_gemini(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let api_key = self.api_key()?;

        #[derive(Serialize)]
        struct BatchRequest<'a> {
            requests: Vec<BatchEntry<'a>>,
        }

        #[derive(Serialize)]
        struct BatchEntry<'a> {
            model: String,
            content: Content<'a>,
        }

        #[derive(Deserialize)]
        struct BatchResponse {
            embeddings: Vec<EmbeddingValues>,
        }

        let url = format!(
            "{}/v1beta/models/{}:batchEmbedContents",
            self.endpoint, self.model
        );
        debug!("Calling Gemini batch embeddings API: {} items", texts.len());

        let request = BatchRequest {
            requests: texts
                .iter()
                .map(|text| BatchEntry {
                    model: format!("models/{}", self.model),
                    content: Content {
                        parts: vec![Part { text }],
                    },
                })
                .collect(),
        };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| WebRagError::Embedding(format!("embedding request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(WebRagError::Embedding(format!(
                "Gemini API error ({status}): {error_text}"
            )));
        }

        let result: BatchResponse = response
            .json()
            .await
            .map_err(|e| WebRagError::Embedding(format!("Failed to parse response: {e}")))?;

        if result.embeddings.len() != texts.len() {
            return Err(WebRagError::Embedding(format!(
                "batch response has {} embeddings for {} inputs",
                result.embeddings.len(),
                texts.len()
            )));
        }

        let mut vectors = Vec::with_capacity(result.embeddings.len());
        for entry in result.embeddings {
            validate_vector(&entry.values, self.dimension)?;
            vectors.push(entry.values);
        }
        Ok(vectors)
    }

    /// Generate an embedding using the Ollama API
    async fn embed_ollama(&self, text: &str) -> Result<Vec<f32>> {
        #[derive(Serialize)]
        struct OllamaRequest<'a> {
            model: &'a str,
            prompt: &'a str,
        }

        #[derive(Deserialize)]
        struct OllamaResponse {
            embedding: Vec<f32>,
        }

        let url = format!("{}/api/embeddings", self.endpoint);
        debug!("Calling Ollama embeddings API: {}", url);

        let request = OllamaRequest {
            model: &self.model,
            prompt: text,
        };

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| WebRagError::Embedding(format!("embedding request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(WebRagError::Embedding(format!(
                "Ollama API error ({status}): {error_text}"
            )));
        }

        let result: OllamaResponse = response
            .json()
            .await
            .map_err(|e| WebRagError::Embedding(format!("Failed to parse response: {e}")))?;

        validate_vector(&result.embedding, self.dimension)?;
        Ok(result.embedding)
    }
}

#[async_trait]
impl Embedder for EmbeddingClient {
    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        match self.provider {
            EmbeddingProvider::Gemini => self.embed_gemini(text).await,
            EmbeddingProvider::Ollama => self.embed_ollama(text).await,
        }
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        match self.provider {
            EmbeddingProvider::Gemini => self.embed_batch_gemini(texts).await,
            EmbeddingProvider::Ollama => {
                // Ollama has no batch endpoint; fan out with bounded
                // concurrency. `buffered` preserves input order.
                use futures::stream::StreamExt;
                use futures::stream::{
                    self,
                };

                let concurrency = std::cmp::min(texts.len(), 8);
                let results: Vec<Result<Vec<f32>>> = stream::iter(texts.to_vec())
                    .map(|text| async move { self.embed_ollama(&text).await })
                    .buffered(concurrency)
                    .collect()
                    .await;

                let mut embeddings = Vec::with_capacity(results.len());
                for result in results {
                    embeddings.push(result?);
                }

                Ok(embeddings)
            }
        }
    }
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GeminiResponse {
    embedding: EmbeddingValues,
}

#[derive(Deserialize)]
struct EmbeddingValues {
    values: Vec<f32>,
}
