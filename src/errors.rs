use thiserror::Error;

/// Error taxonomy for the question-answering pipeline.
///
/// Each pipeline stage maps its failures to a distinct variant so the
/// boundary can render a specific, actionable diagnostic. No stage catches
/// and masks an error raised by an earlier stage.
#[derive(Error, Debug)]
pub enum WebRagError {
    /// Missing or malformed credentials/settings. Terminal until the
    /// deployment is fixed.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Search backend failure: network error, non-success response, or
    /// exhausted daily quota. Terminal per-request, retryable later.
    #[error("Search backend error: {0}")]
    Upstream(String),

    /// Embedding backend failure or a malformed vector. Terminal
    /// per-request; there is no safe degraded path without embeddings.
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Answer-generation backend failure or empty response.
    #[error("Generation error: {0}")]
    Generation(String),

    /// Caller-correctable input problem (empty or missing question).
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlParsing(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl WebRagError {
    /// Stable machine-readable kind string used in boundary error objects.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "configuration",
            Self::Upstream(_) => "upstream",
            Self::Embedding(_) => "embedding",
            Self::Generation(_) => "generation",
            Self::Validation(_) => "validation",
            Self::Serialization(_) | Self::TomlParsing(_) | Self::Io(_) => "internal",
        }
    }
}

pub type Result<T> = std::result::Result<T, WebRagError>;
