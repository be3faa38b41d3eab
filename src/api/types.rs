//! API request and response types

use serde::Deserialize;
use serde::Serialize;

use crate::rag::AskOutcome;
use crate::relevance::ScoredResult;

/// Ask request body
#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub question: String,
}

/// One curated source in an answer response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceEntry {
    pub url: String,
    pub title: String,
    pub similarity: f64,
}

impl From<&ScoredResult> for SourceEntry {
    fn from(scored: &ScoredResult) -> Self {
        Self {
            url: scored.result.url.clone(),
            title: scored.result.title.clone(),
            similarity: scored.similarity,
        }
    }
}

/// Successful ask response
#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub answer: String,
    pub sources: Vec<SourceEntry>,
    pub total_found: usize,
    pub filtered_count: usize,
}

impl From<&AskOutcome> for AskResponse {
    fn from(outcome: &AskOutcome) -> Self {
        Self {
            answer: outcome.answer.text.clone(),
            sources: outcome.sources.iter().map(SourceEntry::from).collect(),
            total_found: outcome.total_found,
            filtered_count: outcome.sources.len(),
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub kind: String,
    pub message: String,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}
