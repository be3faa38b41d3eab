//! Answer generation over curated context

use std::sync::Arc;

use tracing::debug;

use super::prompts;
use super::Answer;
use super::Citation;
use crate::errors::Result;
use crate::errors::WebRagError;
use crate::llm::TextGenerator;
use crate::relevance::ScoredResult;

/// Builds a grounded prompt from curated results, invokes the generative
/// backend, and maps the model's bracketed references back to the curated
/// sources.
pub struct AnswerSynthesizer {
    generator: Arc<dyn TextGenerator>,
}

impl AnswerSynthesizer {
    /// Create a new synthesizer.
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Generate a grounded answer for the question.
    ///
    /// An empty curation is handled with a prompt that requires the model
    /// to report that nothing relevant was found; it is never answered
    /// from unguided knowledge.
    pub async fn answer(&self, question: &str, curated: &[ScoredResult]) -> Result<Answer> {
        let prompt = if curated.is_empty() {
            prompts::build_no_context_prompt(question)
        } else {
            prompts::build_grounded_prompt(question, curated)
        };

        debug!("=== LLM PROMPT ===\n{}\n=== END PROMPT ===", prompt);

        let text = self.generator.generate(&prompt).await?;
        if text.trim().is_empty() {
            return Err(WebRagError::Generation(
                "generation backend returned an empty response".to_string(),
            ));
        }

        let citations = extract_citations(&text, curated);

        Ok(Answer { text, citations })
    }
}

/// Map bracketed markers like `[2]` in the model output back to the
/// curated entries that were supplied. Out-of-range markers are dropped;
/// repeated mentions are deduplicated in first-mention order. A URL the
/// model was not given can never appear.
fn extract_citations(text: &str, curated: &[ScoredResult]) -> Vec<Citation> {
    let mut citations: Vec<Citation> = Vec::new();
    let mut rest = text;

    while let Some(open) = rest.find('[') {
        rest = &rest[open + 1..];
        let Some(close) = rest.find(']') else {
            break;
        };
        let marker = &rest[..close];
        rest = &rest[close + 1..];

        if marker.is_empty() || !marker.bytes().all(|b| b.is_ascii_digit()) {
            continue;
        }
        let Ok(number) = marker.parse::<usize>() else {
            continue;
        };
        if number == 0 || number > curated.len() {
            continue;
        }

        let source = &curated[number - 1].result;
        let citation = Citation {
            url: source.url.clone(),
            title: source.title.clone(),
        };
        if !citations.contains(&citation) {
            citations.push(citation);
        }
    }

    citations
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::search::SearchResult;

    struct FakeGenerator {
        reply: String,
    }

    #[async_trait]
    impl TextGenerator for FakeGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String> {
            Ok(self.reply.clone())
        }
    }

    /// Generator that records the prompt it received.
    struct CapturingGenerator {
        reply: String,
        prompts: std::sync::Mutex<Vec<String>>,
    }

    #[async_trait]
    impl TextGenerator for CapturingGenerator {
        async fn generate(&self, prompt: &str) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok(self.reply.clone())
        }
    }

    fn scored(position: usize, title: &str, url: &str) -> ScoredResult {
        ScoredResult {
            result: SearchResult {
                title: title.to_string(),
                snippet: format!("snippet for {title}"),
                url: url.to_string(),
                position,
            },
            similarity: 0.8,
        }
    }

    #[test]
    fn test_extract_citations_maps_markers_to_sources() {
        let curated = [
            scored(1, "First", "https://a.example"),
            scored(2, "Second", "https://b.example"),
        ];

        let citations = extract_citations("Per [2], and also [1].", &curated);
        assert_eq!(citations.len(), 2);
        assert_eq!(citations[0].url, "https://b.example");
        assert_eq!(citations[1].url, "https://a.example");
    }

    #[test]
    fn test_extract_citations_ignores_out_of_range_markers() {
        let curated = [scored(1, "Only", "https://a.example")];

        let citations = extract_citations("See [1], [3], [0] and [12].", &curated);
        assert_eq!(citations.len(), 1);
        assert_eq!(citations[0].url, "https://a.example");
    }

    #[test]
    fn test_extract_citations_dedupes_repeated_mentions() {
        let curated = [scored(1, "Only", "https://a.example")];

        let citations = extract_citations("[1] says X. Again per [1].", &curated);
        assert_eq!(citations.len(), 1);
    }

    #[test]
    fn test_extract_citations_skips_non_numeric_brackets() {
        let curated = [scored(1, "Only", "https://a.example")];

        let citations = extract_citations("[sic] as noted [n.d.] in [1]", &curated);
        assert_eq!(citations.len(), 1);
    }

    #[test]
    fn test_extract_citations_without_markers_is_empty() {
        let curated = [scored(1, "Only", "https://a.example")];
        assert!(extract_citations("An answer with no references.", &curated).is_empty());
    }

    #[tokio::test]
    async fn test_answer_carries_citations_from_curated_set() {
        let generator = Arc::new(FakeGenerator {
            reply: "Paris is the capital of France. [1]".to_string(),
        });
        let synthesizer = AnswerSynthesizer::new(generator);

        let curated = [scored(1, "Paris - Wikipedia", "https://en.wikipedia.org/wiki/Paris")];
        let answer = synthesizer
            .answer("What is the capital of France?", &curated)
            .await
            .unwrap();

        assert!(answer.text.contains("Paris"));
        assert_eq!(answer.citations.len(), 1);
        assert_eq!(answer.citations[0].url, "https://en.wikipedia.org/wiki/Paris");
    }

    #[tokio::test]
    async fn test_answer_with_empty_curation_uses_no_context_prompt() {
        let generator = Arc::new(CapturingGenerator {
            reply: "No relevant information was found for this question.".to_string(),
            prompts: std::sync::Mutex::new(Vec::new()),
        });
        let synthesizer = AnswerSynthesizer::new(generator.clone());

        let answer = synthesizer.answer("anything?", &[]).await.unwrap();
        assert!(answer.citations.is_empty());

        let prompts = generator.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("no relevant sources"));
        assert!(!prompts[0].contains("Relevance:"));
    }

    #[tokio::test]
    async fn test_answer_empty_model_output_is_generation_error() {
        let generator = Arc::new(FakeGenerator {
            reply: "   ".to_string(),
        });
        let synthesizer = AnswerSynthesizer::new(generator);

        let err = synthesizer.answer("anything?", &[]).await.unwrap_err();
        assert_eq!(err.kind(), "generation");
    }
}
