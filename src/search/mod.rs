//! Web search retrieval module
//!
//! Issues a query against a web-search backend and returns raw results in
//! the backend's native relevance order. Responses are parsed into typed
//! entities at this boundary; nothing downstream sees untyped JSON.

pub mod client;

pub use client::SearchClient;

use async_trait::async_trait;
use serde::Deserialize;
use serde::Serialize;

use crate::errors::Result;

/// A single raw web search result.
///
/// Immutable once returned by the search stage; `position` is the 1-based
/// rank assigned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub snippet: String,
    pub url: String,
    pub position: usize,
}

/// Seam for the web-search backend so the pipeline can be exercised with a
/// fake backend in tests.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Run one search and return results in backend rank order. An empty
    /// vec means zero matches and is not an error.
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchResult>>;
}
