//! Complete question-answering pipeline: Search -> Curate -> Generate

use std::sync::Arc;

use tracing::debug;
use tracing::info;

use super::Answer;
use super::AnswerSynthesizer;
use crate::config::AppConfig;
use crate::embeddings::create_embedder;
use crate::errors::Result;
use crate::errors::WebRagError;
use crate::llm::create_generator;
use crate::relevance::RelevanceFilter;
use crate::relevance::ScoredResult;
use crate::search::SearchBackend;
use crate::search::SearchClient;

/// Outcome of one question-answer request.
#[derive(Debug, Clone)]
pub struct AskOutcome {
    pub answer: Answer,
    /// Curated sources in descending-similarity order.
    pub sources: Vec<ScoredResult>,
    /// How many raw results the search backend returned before curation.
    pub total_found: usize,
}

/// The full pipeline service. Stateless and request-scoped: every call
/// runs search, curation, and synthesis start to finish, and nothing is
/// retained between calls.
pub struct AskService {
    search: Arc<dyn SearchBackend>,
    filter: RelevanceFilter,
    synthesizer: AnswerSynthesizer,
    max_results: usize,
}

impl AskService {
    /// Assemble the pipeline from the application config.
    ///
    /// # Errors
    /// - Unknown provider names or unbuildable HTTP clients
    ///
    /// A missing search credential is deliberately not an error here: the
    /// pipeline stays constructible, and the search stage reports the
    /// configuration problem per request.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let search = Arc::new(SearchClient::from_config(&config.search)?);
        let embedder = create_embedder(&config.embeddings, config.llm.api_key.as_deref())?;
        let filter = RelevanceFilter::new(
            embedder,
            config.similarity_threshold(),
            config.max_kept(),
        );
        let generator = create_generator(&config.llm)?;
        let synthesizer = AnswerSynthesizer::new(generator);

        Ok(Self::from_parts(
            search,
            filter,
            synthesizer,
            config.max_results(),
        ))
    }

    /// Assemble the pipeline from existing components.
    #[must_use]
    pub fn from_parts(
        search: Arc<dyn SearchBackend>,
        filter: RelevanceFilter,
        synthesizer: AnswerSynthesizer,
        max_results: usize,
    ) -> Self {
        Self {
            search,
            filter,
            synthesizer,
            max_results,
        }
    }

    /// Answer a question grounded in curated web search results.
    ///
    /// # Errors
    /// - `Validation` for an empty question
    /// - `Configuration`/`Upstream` from the search stage
    /// - `Embedding` from the curation stage
    /// - `Generation` from the synthesis stage
    ///
    /// Errors propagate unchanged; a failure in any stage fails the whole
    /// request. There is no partial "results without an answer" mode.
    pub async fn ask(&self, question: &str) -> Result<AskOutcome> {
        let question = question.trim();
        if question.is_empty() {
            return Err(WebRagError::Validation(
                "question must not be empty".to_string(),
            ));
        }

        info!("[1/3] Searching the web for: {}", question);
        let results = self.search.search(question, self.max_results).await?;
        debug!("      Found {} results", results.len());

        info!("[2/3] Filtering results by embedding similarity");
        let curated = self.filter.curate(question, &results).await?;
        debug!("      Kept {} relevant results", curated.len());

        info!("[3/3] Generating answer with curated context");
        let answer = self.synthesizer.answer(question, &curated).await?;

        info!("Question answered with {} sources", curated.len());

        Ok(AskOutcome {
            answer,
            sources: curated,
            total_found: results.len(),
        })
    }
}
