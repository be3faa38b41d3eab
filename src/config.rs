use std::path::Path;

use serde::Deserialize;
use serde::Serialize;

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub enable_cors: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub backtrace: bool,
}

/// Web search backend settings. The API key and engine id are secrets and
/// normally arrive through the environment, not the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    pub endpoint: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub engine_id: Option<String>,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

fn default_max_results() -> usize {
    10
}

/// Embedding backend settings. The hosted provider shares the generative
/// API credential from [`LlmConfig`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingsConfig {
    pub provider: String,
    pub model: String,
    pub dimension: usize,
    pub endpoint: String,
}

/// Answer-generation backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    pub provider: String,
    pub endpoint: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_llm_model")]
    pub model: String,
}

fn default_llm_model() -> String {
    "gemini-2.0-flash".to_string()
}

/// Relevance curation tunables. Exposed as configuration rather than
/// constants; the defaults match the reference deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurationConfig {
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,
    #[serde(default = "default_max_kept")]
    pub max_kept: usize,
}

fn default_similarity_threshold() -> f64 {
    0.3
}

fn default_max_kept() -> usize {
    5
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub search: SearchConfig,
    pub embeddings: EmbeddingsConfig,
    pub llm: LlmConfig,
    #[serde(default)]
    pub curation: CurationConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file, then apply environment overrides.
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config: AppConfig = toml::from_str(&content)?;
        config.apply_env();
        Ok(config)
    }

    /// Load configuration from the default config file path, falling back to
    /// built-in defaults when no file is present. Environment variables
    /// override the file in either case.
    pub fn load() -> crate::Result<Self> {
        if Path::new("config.toml").exists() {
            Self::from_file("config.toml")
        } else {
            let mut config = Self::default();
            config.apply_env();
            Ok(config)
        }
    }

    /// Apply credential and port overrides from the process environment.
    ///
    /// Environment variables:
    /// - `GEMINI_API_KEY`: generative API credential (embeddings + generation)
    /// - `GOOGLE_SEARCH_API_KEY`: search API credential
    /// - `GOOGLE_SEARCH_ENGINE_ID`: custom search engine identifier
    /// - `PORT`: override the configured server port
    fn apply_env(&mut self) {
        if let Ok(key) = std::env::var("GEMINI_API_KEY") {
            if !key.is_empty() {
                self.llm.api_key = Some(key);
            }
        }
        if let Ok(key) = std::env::var("GOOGLE_SEARCH_API_KEY") {
            if !key.is_empty() {
                self.search.api_key = Some(key);
            }
        }
        if let Ok(id) = std::env::var("GOOGLE_SEARCH_ENGINE_ID") {
            if !id.is_empty() {
                self.search.engine_id = Some(id);
            }
        }
        if let Ok(port) = std::env::var("PORT") {
            if let Ok(port) = port.parse::<u16>() {
                self.server.port = port;
            }
        }
    }

    /// Validate the configuration at startup.
    ///
    /// The generative credential is required for hosted providers: without it
    /// neither filtering nor synthesis can run, so startup fails hard. The
    /// search credential is deliberately NOT required here — its absence
    /// degrades the search stage to a per-request configuration error while
    /// the rest of the pipeline stays constructible.
    pub fn validate(&self) -> crate::Result<()> {
        let known_embedding_providers = ["gemini", "ollama", "mock"];
        if !known_embedding_providers.contains(&self.embeddings.provider.as_str()) {
            return Err(crate::WebRagError::Configuration(format!(
                "unknown embedding provider: {}. Supported: {}",
                self.embeddings.provider,
                known_embedding_providers.join(", ")
            )));
        }

        let known_llm_providers = ["gemini", "ollama"];
        if !known_llm_providers.contains(&self.llm.provider.as_str()) {
            return Err(crate::WebRagError::Configuration(format!(
                "unknown llm provider: {}. Supported: {}",
                self.llm.provider,
                known_llm_providers.join(", ")
            )));
        }

        if self.llm.provider == "gemini"
            && self.llm.api_key.as_deref().unwrap_or("").is_empty()
        {
            return Err(crate::WebRagError::Configuration(
                "generative API credential is required: set GEMINI_API_KEY or [llm] api_key"
                    .to_string(),
            ));
        }

        if self.embeddings.dimension == 0 {
            return Err(crate::WebRagError::Configuration(
                "embedding dimension must be greater than zero".to_string(),
            ));
        }

        if !self.curation.similarity_threshold.is_finite()
            || self.curation.similarity_threshold < -1.0
            || self.curation.similarity_threshold > 1.0
        {
            return Err(crate::WebRagError::Configuration(format!(
                "similarity threshold must be a finite value in [-1.0, 1.0], got {}",
                self.curation.similarity_threshold
            )));
        }

        for (name, endpoint) in [
            ("search", &self.search.endpoint),
            ("embeddings", &self.embeddings.endpoint),
            ("llm", &self.llm.endpoint),
        ] {
            url::Url::parse(endpoint).map_err(|e| {
                crate::WebRagError::Configuration(format!(
                    "invalid {name} endpoint {endpoint:?}: {e}"
                ))
            })?;
        }

        Ok(())
    }

    /// Get the similarity threshold for curation
    pub fn similarity_threshold(&self) -> f64 {
        self.curation.similarity_threshold
    }

    /// Get the maximum number of curated results
    pub fn max_kept(&self) -> usize {
        self.curation.max_kept
    }

    /// Get the maximum number of raw search results per query
    pub fn max_results(&self) -> usize {
        self.search.max_results
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 5003,
                enable_cors: true,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                backtrace: true,
            },
            search: SearchConfig {
                endpoint: "https://www.googleapis.com/customsearch/v1".to_string(),
                api_key: None,
                engine_id: None,
                max_results: 10,
            },
            embeddings: EmbeddingsConfig {
                provider: "gemini".to_string(),
                model: "text-embedding-005".to_string(),
                dimension: 768,
                endpoint: "https://generativelanguage.googleapis.com".to_string(),
            },
            llm: LlmConfig {
                provider: "gemini".to_string(),
                endpoint: "https://generativelanguage.googleapis.com".to_string(),
                api_key: None,
                model: "gemini-2.0-flash".to_string(),
            },
            curation: CurationConfig::default(),
        }
    }
}

impl Default for CurationConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: default_similarity_threshold(),
            max_kept: default_max_kept(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 5003);
        assert_eq!(config.max_results(), 10);
        assert_eq!(config.max_kept(), 5);
        assert!((config.similarity_threshold() - 0.3).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_toml_sections() {
        let toml = r#"
            [server]
            host = "127.0.0.1"
            port = 8080
            enable_cors = false

            [logging]
            level = "debug"
            backtrace = false

            [search]
            endpoint = "https://www.googleapis.com/customsearch/v1"
            max_results = 7

            [embeddings]
            provider = "ollama"
            model = "nomic-embed-text"
            dimension = 768
            endpoint = "http://localhost:11434"

            [llm]
            provider = "ollama"
            endpoint = "http://localhost:11434"
            model = "gemma3:27b"

            [curation]
            similarity_threshold = 0.5
            max_kept = 3
        "#;

        let config: AppConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.search.max_results, 7);
        assert_eq!(config.embeddings.provider, "ollama");
        assert!((config.curation.similarity_threshold - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.curation.max_kept, 3);
        // Secrets are absent from the file and stay unset
        assert!(config.search.api_key.is_none());
        assert!(config.llm.api_key.is_none());
    }

    #[test]
    fn test_curation_section_is_optional() {
        let toml = r#"
            [server]
            host = "0.0.0.0"
            port = 5003
            enable_cors = true

            [logging]
            level = "info"
            backtrace = true

            [search]
            endpoint = "https://www.googleapis.com/customsearch/v1"

            [embeddings]
            provider = "gemini"
            model = "text-embedding-005"
            dimension = 768
            endpoint = "https://generativelanguage.googleapis.com"

            [llm]
            provider = "gemini"
            endpoint = "https://generativelanguage.googleapis.com"
        "#;

        let config: AppConfig = toml::from_str(toml).unwrap();
        assert!((config.similarity_threshold() - 0.3).abs() < f64::EPSILON);
        assert_eq!(config.max_kept(), 5);
    }

    #[test]
    fn test_validate_requires_generative_credential() {
        let config = AppConfig::default();
        let err = config.validate().unwrap_err();
        assert_eq!(err.kind(), "configuration");
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }

    #[test]
    fn test_validate_accepts_missing_search_credential() {
        let mut config = AppConfig::default();
        config.llm.api_key = Some("test-key".to_string());
        // No search credential: startup must still succeed
        assert!(config.search.api_key.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_unknown_provider() {
        let mut config = AppConfig::default();
        config.llm.api_key = Some("test-key".to_string());
        config.embeddings.provider = "unknown".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_threshold_range() {
        let mut config = AppConfig::default();
        config.llm.api_key = Some("test-key".to_string());
        config.curation.similarity_threshold = 1.5;
        assert!(config.validate().is_err());

        config.curation.similarity_threshold = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_invalid_endpoint() {
        let mut config = AppConfig::default();
        config.llm.api_key = Some("test-key".to_string());
        config.search.endpoint = "not a url".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("search endpoint"));
    }

    #[test]
    fn test_ollama_provider_needs_no_credential() {
        let mut config = AppConfig::default();
        config.llm.provider = "ollama".to_string();
        config.llm.endpoint = "http://localhost:11434".to_string();
        assert!(config.validate().is_ok());
    }
}
