//! CLI command definitions and parsing
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "acervo",
    version,
    about = "Retrieval core for a document-grounded assistant",
    long_about = "Acervo ingests a directory of PDF documents into an in-memory semantic index \
                  and answers two kinds of lookup: embedding-based retrieval over the knowledge \
                  base, and literal snippet search over a single attachment."
)]
pub struct Cli {
    /// Global config file path (defaults to ~/.config/acervo/config.toml)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the knowledge base and report its state
    Status,

    /// Retrieve the knowledge-base chunks most relevant to a query
    Query {
        /// Query text
        query: String,

        /// Maximum number of chunks to return (overrides retrieval.combined_k)
        #[arg(short, long)]
        limit: Option<usize>,

        /// Show results in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Literal snippet search inside a single document
    Snippets {
        /// Document to extract and search
        file: PathBuf,

        /// Search query
        query: String,

        /// Characters of context around each match (overrides search.snippet_radius)
        #[arg(short, long)]
        radius: Option<usize>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
