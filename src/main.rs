use std::path::{Path, PathBuf};
use std::sync::Arc;

use acervo::cli::{Cli, Commands, ConfigAction};
use acervo::config::Config;
use acervo::embedding::{EmbeddingProvider, FastEmbedProvider};
use acervo::error::Result;
use acervo::knowledge::{
    KnowledgeBase, PdftotextExtractor, PlainTextExtractor, TextExtractor,
};
use acervo::retrieval::RetrievalEngine;
use acervo::search::TextSearcher;

fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse_args();

    match cli.command {
        Commands::Status => {
            cmd_status(cli.config)?;
        }
        Commands::Query { query, limit, json } => {
            cmd_query(cli.config, &query, limit, json)?;
        }
        Commands::Snippets {
            file,
            query,
            radius,
        } => {
            cmd_snippets(cli.config, &file, &query, radius)?;
        }
        Commands::Config { action } => {
            cmd_config(cli.config, action)?;
        }
    }

    Ok(())
}

fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("acervo=info"));

    fmt().with_env_filter(filter).with_target(false).init();
}

/// Load configuration, falling back to defaults when no file exists
fn load_config(config_path: Option<PathBuf>) -> Result<Config> {
    let path = match config_path {
        Some(path) => path,
        None => Config::default_path()?,
    };

    if path.exists() {
        Config::load(&path)
    } else {
        tracing::info!("No config file at {:?}; using defaults", path);
        Ok(Config::default())
    }
}

/// Pick the extraction adapter matching the configured corpus type
fn extractor_for(config: &Config) -> Box<dyn TextExtractor> {
    if config.knowledge.extension.eq_ignore_ascii_case("pdf") {
        Box::new(PdftotextExtractor)
    } else {
        Box::new(PlainTextExtractor)
    }
}

/// Load the embedding model; failure degrades to retrieval-less operation
fn load_embedder(config: &Config) -> Option<Arc<dyn EmbeddingProvider>> {
    match FastEmbedProvider::new(&config.embedding.model) {
        Ok(provider) => Some(Arc::new(provider)),
        Err(e) => {
            tracing::warn!("Embedding model unavailable: {}", e);
            None
        }
    }
}

fn build_knowledge_base(config: &Config) -> KnowledgeBase {
    let extractor = extractor_for(config);
    let embedder = load_embedder(config);
    KnowledgeBase::build(config, extractor.as_ref(), embedder)
}

fn cmd_status(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config(config_path)?;
    let kb = build_knowledge_base(&config);

    println!("Acervo Status");
    println!("=============");
    println!("\nKnowledge base: {:?}", config.knowledge.directory);
    println!("Embedding model: {}", config.embedding.model);
    println!("Documents ingested: {}", kb.document_count());
    println!("Chunks indexed: {}", kb.chunk_count());
    println!(
        "Ready: {}",
        if kb.is_ready() {
            "yes"
        } else {
            "no (retrieval disabled, direct answers only)"
        }
    );

    Ok(())
}

fn cmd_query(
    config_path: Option<PathBuf>,
    query: &str,
    limit: Option<usize>,
    json: bool,
) -> Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(limit) = limit {
        config.retrieval.combined_k = limit;
    }

    let kb = build_knowledge_base(&config);
    if !kb.is_ready() {
        println!("Knowledge base is not ready; no context available.");
        return Ok(());
    }

    let engine = RetrievalEngine::new(&config.retrieval);
    let chunks = engine.retrieve(&[query.to_string()], &kb);

    if json {
        println!("{}", serde_json::to_string_pretty(&chunks).unwrap_or_default());
        return Ok(());
    }

    if chunks.is_empty() {
        println!("No relevant chunks found.");
        return Ok(());
    }

    println!("Top {} chunk(s) for '{}':\n", chunks.len(), query);
    for chunk in &chunks {
        println!("--- chunk {} ---", chunk.id);
        println!("{}\n", chunk.text.trim());
    }

    Ok(())
}

fn cmd_snippets(
    config_path: Option<PathBuf>,
    file: &Path,
    query: &str,
    radius: Option<usize>,
) -> Result<()> {
    let config = load_config(config_path)?;
    let radius = radius.unwrap_or(config.search.snippet_radius);

    let extractor: Box<dyn TextExtractor> = match file.extension() {
        Some(ext) if ext.eq_ignore_ascii_case("pdf") => Box::new(PdftotextExtractor),
        _ => Box::new(PlainTextExtractor),
    };

    // Extraction failure of the file named in this request is the one
    // failure surfaced verbatim to the user
    let text = match extractor.extract(file) {
        Ok(text) => text,
        Err(e) => {
            println!("{}", e);
            return Ok(());
        }
    };

    let searcher = TextSearcher::new(&config.search);
    let snippets = searcher.search(&text, query, radius);

    if snippets.is_empty() {
        println!("No occurrences of '{}' in {:?}.", query, file);
        return Ok(());
    }

    println!("Found {} occurrence(s) of '{}':\n", snippets.len(), query);
    for snippet in &snippets {
        println!("{}", snippet);
        println!("---");
    }

    Ok(())
}

fn cmd_config(config_path: Option<PathBuf>, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = load_config(config_path)?;
            println!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigAction::Init { force } => {
            let path = match config_path {
                Some(path) => path,
                None => Config::default_path()?,
            };

            if path.exists() && !force {
                println!("Config already exists at {:?} (use --force to overwrite)", path);
                return Ok(());
            }

            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| acervo::error::AcervoError::Io {
                    source: e,
                    context: format!("Failed to create config directory: {:?}", parent),
                })?;
            }

            Config::default().save(&path)?;
            println!("Wrote default config to {:?}", path);
        }
    }

    Ok(())
}
