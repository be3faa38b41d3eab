//! Grounded answering module
//!
//! End-to-end question answering over web search results:
//! - Search retrieval
//! - Embedding-based relevance curation
//! - Grounded prompt construction and LLM answer generation
//! - Citation mapping back to the curated sources
//!
//! # Examples
//!
//! ```rust,no_run
//! use webrag::config::AppConfig;
//! use webrag::rag::AskService;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let service = AskService::from_config(&config)?;
//!
//!     let outcome = service.ask("What is the capital of France?").await?;
//!     println!("Answer: {}", outcome.answer.text);
//!     println!("Sources: {} results", outcome.sources.len());
//!
//!     Ok(())
//! }
//! ```

pub mod pipeline;
pub mod prompts;
pub mod synthesizer;

pub use pipeline::AskOutcome;
pub use pipeline::AskService;
pub use synthesizer::AnswerSynthesizer;

use serde::Serialize;

/// A curated source the generated answer actually referenced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Citation {
    pub url: String,
    pub title: String,
}

/// The generated answer together with its citations. Citations are always
/// drawn from the curated sources supplied to the synthesizer, never from
/// anywhere else.
#[derive(Debug, Clone)]
pub struct Answer {
    pub text: String,
    pub citations: Vec<Citation>,
}
