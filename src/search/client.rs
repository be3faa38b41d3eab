//! Google Custom Search API client

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::SearchBackend;
use super::SearchResult;
use crate::config::SearchConfig;
use crate::errors::Result;
use crate::errors::WebRagError;

/// The Custom Search JSON API returns at most this many results per page.
const BACKEND_PAGE_SIZE: usize = 10;

/// Client for the Google Custom Search JSON API.
///
/// Constructible without credentials so the rest of the pipeline can be
/// wired up for testing; each `search` call then fails with a
/// configuration error until the key and engine id are supplied.
pub struct SearchClient {
    endpoint: String,
    api_key: Option<String>,
    engine_id: Option<String>,
    client: Client,
}

impl SearchClient {
    /// Create a new search client.
    pub fn new(
        endpoint: String,
        api_key: Option<String>,
        engine_id: Option<String>,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| WebRagError::Configuration(e.to_string()))?;

        Ok(Self {
            endpoint,
            api_key,
            engine_id,
            client,
        })
    }

    /// Create a client from the search section of the application config.
    pub fn from_config(config: &SearchConfig) -> Result<Self> {
        Self::new(
            config.endpoint.clone(),
            config.api_key.clone(),
            config.engine_id.clone(),
        )
    }

    fn credentials(&self) -> Result<(&str, &str)> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                WebRagError::Configuration(
                    "search API key not configured: set GOOGLE_SEARCH_API_KEY".to_string(),
                )
            })?;
        let engine_id = self
            .engine_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                WebRagError::Configuration(
                    "search engine id not configured: set GOOGLE_SEARCH_ENGINE_ID".to_string(),
                )
            })?;
        Ok((api_key, engine_id))
    }
}

#[async_trait]
impl SearchBackend for SearchClient {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchResult>> {
        let (api_key, engine_id) = self.credentials()?;

        // The backend rejects num outside 1..=10
        let num = max_results.clamp(1, BACKEND_PAGE_SIZE).to_string();
        debug!("Calling search API: {} (num={})", self.endpoint, num);

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("key", api_key),
                ("cx", engine_id),
                ("q", query),
                ("num", num.as_str()),
            ])
            .send()
            .await
            .map_err(|e| WebRagError::Upstream(format!("search request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            // Quota exhaustion surfaces here as 429 (or 403 dailyLimitExceeded)
            return Err(WebRagError::Upstream(format!(
                "search backend returned {status}: {error_text}"
            )));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| WebRagError::Upstream(format!("malformed search response: {e}")))?;

        Ok(parse_results(body))
    }
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Deserialize)]
struct SearchItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    snippet: String,
    link: String,
}

/// Convert the backend's response shape into typed results, assigning the
/// 1-based backend rank.
fn parse_results(body: SearchResponse) -> Vec<SearchResult> {
    body.items
        .into_iter()
        .enumerate()
        .map(|(idx, item)| SearchResult {
            title: item.title,
            snippet: item.snippet,
            url: item.link,
            position: idx + 1,
        })
        .collect()
}
