//! Prompt construction for grounded answering

use std::fmt::Write;

use crate::relevance::ScoredResult;

/// Build the grounded prompt: each curated result becomes a numbered
/// context block, and the model is instructed to answer only from those
/// blocks and cite them by number.
pub fn build_grounded_prompt(question: &str, curated: &[ScoredResult]) -> String {
    let mut context = String::new();
    for (idx, scored) in curated.iter().enumerate() {
        let _ = write!(
            context,
            "{}. {}\n   Source: {}\n   Content: {}\n   Relevance: {:.2}\n\n",
            idx + 1,
            scored.result.title,
            scored.result.url,
            scored.result.snippet,
            scored.similarity
        );
    }

    format!(
        r"You are a careful research assistant. The following web search results are the only information available to you:

{context}Question: {question}

Instructions:
1. Answer the question using only the search results above
2. Cite the sources you use with bracketed numbers, e.g. [1] or [2]
3. If the results do not contain the answer, say that the available sources do not cover it
4. Be concise and factual

Answer:"
    )
}

/// Build the prompt used when curation kept nothing: the model must state
/// that no relevant information was found instead of answering from its
/// own knowledge.
pub fn build_no_context_prompt(question: &str) -> String {
    format!(
        r"You are a careful research assistant. A web search for the question below returned no relevant sources.

Question: {question}

Instructions:
1. State that no relevant information was found for this question
2. Do not answer from your own knowledge
3. Do not invent or imply sources

Answer:"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::SearchResult;

    fn scored(position: usize, title: &str, url: &str, similarity: f64) -> ScoredResult {
        ScoredResult {
            result: SearchResult {
                title: title.to_string(),
                snippet: format!("snippet for {title}"),
                url: url.to_string(),
                position,
            },
            similarity,
        }
    }

    #[test]
    fn test_grounded_prompt_enumerates_sources() {
        let curated = [
            scored(1, "First source", "https://a.example", 0.91),
            scored(2, "Second source", "https://b.example", 0.55),
        ];

        let prompt = build_grounded_prompt("the question?", &curated);

        assert!(prompt.contains("1. First source"));
        assert!(prompt.contains("2. Second source"));
        assert!(prompt.contains("Source: https://a.example"));
        assert!(prompt.contains("Relevance: 0.91"));
        assert!(prompt.contains("Question: the question?"));
        assert!(prompt.contains("only the search results above"));
    }

    #[test]
    fn test_no_context_prompt_forbids_unguided_answers() {
        let prompt = build_no_context_prompt("the question?");
        assert!(prompt.contains("no relevant information was found"));
        assert!(prompt.contains("Do not answer from your own knowledge"));
        assert!(prompt.contains("Question: the question?"));
    }
}
