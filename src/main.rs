use clap::Parser;
use clap::Subcommand;
use tracing::info;
use webrag::api::serve_api;
use webrag::config::AppConfig;
use webrag::rag::AskService;
use webrag::Result;

#[derive(Parser)]
#[command(name = "webrag")]
#[command(about = "Web-grounded question answering: search, curate by similarity, synthesize")]
#[command(version)]
struct Cli {
    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Bind address
        #[arg(long)]
        host: Option<String>,
        /// Bind port
        #[arg(short, long)]
        port: Option<u16>,
        /// Disable CORS headers
        #[arg(long)]
        no_cors: bool,
    },
    /// Answer a single question from the command line
    Ask {
        /// The question to answer
        question: String,
        /// Maximum number of search results to retrieve
        #[arg(short, long)]
        limit: Option<usize>,
        /// Minimum similarity for a result to be kept
        #[arg(long)]
        threshold: Option<f64>,
        /// Print the response as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = AppConfig::load()?;

    // Initialize logging
    if cli.verbose {
        webrag::logging::init_logging_with_level("debug")?;
    } else {
        webrag::logging::init_logging_with_config(&config)?;
    }
    info!("Configuration loaded successfully");

    match cli.command {
        Commands::Serve {
            host,
            port,
            no_cors,
        } => {
            config.validate()?;
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            let enable_cors = !no_cors && config.server.enable_cors;
            serve_api(&config, host, port, enable_cors).await?;
        }
        Commands::Ask {
            question,
            limit,
            threshold,
            json,
        } => {
            let mut config = config;
            if let Some(limit) = limit {
                config.search.max_results = limit;
            }
            if let Some(threshold) = threshold {
                config.curation.similarity_threshold = threshold;
            }
            config.validate()?;

            handle_ask_command(&config, &question, json).await?;
        }
        Commands::Config => {
            handle_config_command(&config);
        }
    }

    Ok(())
}

async fn handle_ask_command(config: &AppConfig, question: &str, json: bool) -> Result<()> {
    let service = AskService::from_config(config)?;
    let outcome = service.ask(question).await?;

    if json {
        let response = webrag::api::types::AskResponse::from(&outcome);
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    println!("Answer:");
    println!("{}", outcome.answer.text);
    println!();
    println!(
        "Sources ({} of {} results kept):",
        outcome.sources.len(),
        outcome.total_found
    );
    for (idx, source) in outcome.sources.iter().enumerate() {
        println!(
            "  {}. {} ({}) - similarity {:.2}",
            idx + 1,
            source.result.title,
            source.result.url,
            source.similarity
        );
    }

    if !outcome.answer.citations.is_empty() {
        println!();
        println!("Cited:");
        for citation in &outcome.answer.citations {
            println!("  - {} ({})", citation.title, citation.url);
        }
    }

    Ok(())
}

fn handle_config_command(config: &AppConfig) {
    println!("webrag configuration:");
    println!();

    println!("Server:");
    println!("  Host: {}", config.server.host);
    println!("  Port: {}", config.server.port);
    println!("  CORS: {}", config.server.enable_cors);
    println!();

    println!("Logging:");
    println!("  Level: {}", config.logging.level);
    println!("  Backtrace: {}", config.logging.backtrace);
    println!();

    println!("Search:");
    println!("  Endpoint: {}", config.search.endpoint);
    println!("  API key: {}", mask_secret(config.search.api_key.as_deref()));
    println!(
        "  Engine id: {}",
        mask_secret(config.search.engine_id.as_deref())
    );
    println!("  Max results: {}", config.max_results());
    println!();

    println!("Embeddings:");
    println!("  Provider: {}", config.embeddings.provider);
    println!("  Model: {}", config.embeddings.model);
    println!("  Dimension: {}", config.embeddings.dimension);
    println!("  Endpoint: {}", config.embeddings.endpoint);
    println!();

    println!("LLM:");
    println!("  Provider: {}", config.llm.provider);
    println!("  Model: {}", config.llm.model);
    println!("  Endpoint: {}", config.llm.endpoint);
    println!("  API key: {}", mask_secret(config.llm.api_key.as_deref()));
    println!();

    println!("Curation:");
    println!("  Similarity threshold: {}", config.similarity_threshold());
    println!("  Max kept: {}", config.max_kept());
}

/// Mask a secret for display: show only whether it is set.
fn mask_secret(secret: Option<&str>) -> &'static str {
    match secret {
        Some(s) if !s.is_empty() => "set (masked)",
        _ => "not set",
    }
}
