//! Relevance curation module
//!
//! Scores raw search results against the question by embedding cosine
//! similarity and keeps the subset worth showing to the answer generator.

pub mod filter;

pub use filter::cosine_similarity;
pub use filter::RelevanceFilter;

use serde::Serialize;

use crate::search::SearchResult;

/// A search result annotated with its similarity to the question.
///
/// Created by the relevance filter and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredResult {
    pub result: SearchResult,
    /// Cosine similarity to the question, in [-1.0, 1.0].
    pub similarity: f64,
}
