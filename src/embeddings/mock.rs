//! Deterministic mock embedder for tests and offline runs

use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use async_trait::async_trait;

use super::Embedder;
use crate::errors::Result;

/// Words carrying no topical signal, dropped before hashing. Includes
/// question words so a question and a result snippet overlap only on
/// content terms.
const STOP_WORDS: &[&str] = &[
    "the", "is", "are", "was", "were", "a", "an", "and", "or", "but", "of", "in", "on", "for",
    "to", "with", "by", "from", "this", "that", "be", "have", "has", "had", "it", "its", "not",
    "what", "who", "where", "when", "how", "why", "which", "does", "did",
];

/// Mock embedder producing deterministic, content-derived unit vectors.
///
/// Each content word is hashed to one dimension and weighted by frequency,
/// so texts sharing vocabulary score high cosine similarity and disjoint
/// texts score zero. Not semantically accurate, but consistent, which is
/// what tests need. Also counts embed calls so tests can assert that a
/// stage made none.
#[derive(Debug)]
pub struct MockEmbedder {
    dimension: usize,
    calls: AtomicUsize,
}

impl MockEmbedder {
    /// Create a new mock embedder with the given dimensionality.
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of texts embedded so far (batch entries count individually).
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn embed_text(&self, text: &str) -> Vec<f32> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let mut vector = vec![0.0f32; self.dimension];
        if self.dimension == 0 {
            return vector;
        }
        let lower = text.to_lowercase();
        let words = lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| w.len() > 2 && !STOP_WORDS.contains(w));

        for word in words {
            let hash = word
                .bytes()
                .fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(u64::from(b)));
            let dim = usize::try_from(hash % self.dimension as u64).unwrap_or(0);
            vector[dim] += 1.0;
        }

        let norm: f32 = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }

        vector
    }
}

#[async_trait]
impl Embedder for MockEmbedder {
    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.embed_text(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|text| self.embed_text(text)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_is_deterministic() {
        let embedder = MockEmbedder::new(384);
        let first = embedder.embed("deterministic test").await.unwrap();
        let second = embedder.embed("deterministic test").await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_mock_produces_unit_vectors() {
        let embedder = MockEmbedder::new(384);
        let vector = embedder.embed("hello world").await.unwrap();
        assert_eq!(vector.len(), 384);
        let norm: f32 = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 0.001);
    }

    #[tokio::test]
    async fn test_mock_distinguishes_texts() {
        let embedder = MockEmbedder::new(384);
        let first = embedder.embed("rust programming language").await.unwrap();
        let second = embedder.embed("banana bread recipe").await.unwrap();
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_mock_stop_words_only_gives_zero_vector() {
        let embedder = MockEmbedder::new(384);
        let vector = embedder.embed("what is the").await.unwrap();
        assert!(vector.iter().all(|&v| v == 0.0));
    }

    #[tokio::test]
    async fn test_mock_counts_calls() {
        let embedder = MockEmbedder::new(64);
        assert_eq!(embedder.calls(), 0);

        embedder.embed("one").await.unwrap();
        assert_eq!(embedder.calls(), 1);

        embedder
            .embed_batch(&["two".to_string(), "three".to_string()])
            .await
            .unwrap();
        assert_eq!(embedder.calls(), 3);
    }
}
