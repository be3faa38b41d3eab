//! Similarity scoring and threshold-based curation

use std::sync::Arc;

use tracing::debug;

use super::ScoredResult;
use crate::embeddings::Embedder;
use crate::errors::Result;
use crate::errors::WebRagError;
use crate::search::SearchResult;

/// Filters search results by embedding similarity to the question.
///
/// The question is embedded once per invocation; each result is embedded
/// over the concatenation of its title and snippet (pages are never
/// fetched). Results at or above the threshold survive, ordered by
/// descending similarity with the backend's original order breaking ties,
/// truncated to `max_kept`.
pub struct RelevanceFilter {
    embedder: Arc<dyn Embedder>,
    threshold: f64,
    max_kept: usize,
}

impl RelevanceFilter {
    /// Create a new relevance filter.
    pub fn new(embedder: Arc<dyn Embedder>, threshold: f64, max_kept: usize) -> Self {
        Self {
            embedder,
            threshold,
            max_kept,
        }
    }

    /// Curate results with one embedding call per candidate.
    ///
    /// An empty input short-circuits to an empty outcome without any
    /// embedding calls. An empty outcome (everything below threshold) is a
    /// valid result, not an error.
    pub async fn curate(
        &self,
        question: &str,
        results: &[SearchResult],
    ) -> Result<Vec<ScoredResult>> {
        if results.is_empty() {
            return Ok(Vec::new());
        }

        let question_vector = self.embedder.embed(question).await?;

        let mut result_vectors = Vec::with_capacity(results.len());
        for result in results {
            result_vectors.push(self.embedder.embed(&result_text(result)).await?);
        }

        self.select(&question_vector, results, &result_vectors)
    }

    /// Curate results with a single batched embedding call.
    ///
    /// A performance-only variant: for any input it yields the same outcome
    /// as [`curate`](Self::curate), including ordering and tie-breaks.
    pub async fn curate_batched(
        &self,
        question: &str,
        results: &[SearchResult],
    ) -> Result<Vec<ScoredResult>> {
        if results.is_empty() {
            return Ok(Vec::new());
        }

        let question_vector = self.embedder.embed(question).await?;

        let texts: Vec<String> = results.iter().map(result_text).collect();
        let result_vectors = self.embedder.embed_batch(&texts).await?;
        if result_vectors.len() != results.len() {
            return Err(WebRagError::Embedding(format!(
                "batch embedding returned {} vectors for {} results",
                result_vectors.len(),
                results.len()
            )));
        }

        self.select(&question_vector, results, &result_vectors)
    }

    /// Score, threshold, sort, and truncate. Shared by both curation paths
    /// so they cannot drift apart.
    fn select(
        &self,
        question_vector: &[f32],
        results: &[SearchResult],
        result_vectors: &[Vec<f32>],
    ) -> Result<Vec<ScoredResult>> {
        let mut scored = Vec::new();

        for (result, vector) in results.iter().zip(result_vectors) {
            if vector.len() != question_vector.len() {
                return Err(WebRagError::Embedding(format!(
                    "result embedding has {} dimensions, question has {}",
                    vector.len(),
                    question_vector.len()
                )));
            }

            let similarity = cosine_similarity(question_vector, vector);
            if !similarity.is_finite() {
                return Err(WebRagError::Embedding(
                    "similarity computation produced a non-finite value".to_string(),
                ));
            }

            debug!(
                "result #{} similarity {:.4}: {}",
                result.position, similarity, result.title
            );

            // Inclusive lower bound: a score exactly at the threshold is kept
            if similarity >= self.threshold {
                scored.push(ScoredResult {
                    result: result.clone(),
                    similarity,
                });
            }
        }

        // Stable sort: equal scores keep the backend's original order
        scored.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        scored.truncate(self.max_kept);

        Ok(scored)
    }
}

/// Text scored for a result: title and snippet, never the page body.
fn result_text(result: &SearchResult) -> String {
    format!("{} {}", result.title, result.snippet)
}

/// Cosine similarity between two vectors, accumulated in double precision.
///
/// Returns 0.0 when either vector has zero norm (no shared basis to
/// compare on).
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;

    for (x, y) in a.iter().zip(b.iter()) {
        let x = f64::from(*x);
        let y = f64::from(*y);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 {
        0.0
    } else {
        dot / denom
    }
}
