//! Configuration management for acervo
//!
//! Every tunable the retrieval core consumes lives here: chunking geometry,
//! embedding model, search depths, snippet extraction and session limits.
//! Nothing in the core hardcodes these values.

use crate::error::{AcervoError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

mod validator;

pub use validator::ConfigValidator;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub knowledge: KnowledgeConfig,
    pub chunking: ChunkingConfig,
    pub embedding: EmbeddingConfig,
    pub retrieval: RetrievalConfig,
    pub search: SearchConfig,
    pub session: SessionConfig,
}

/// Knowledge base source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeConfig {
    /// Directory scanned (non-recursively) for source documents
    pub directory: PathBuf,
    /// File extension ingested from the directory, without the dot
    pub extension: String,
}

/// Text chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Window size in characters
    pub chunk_size: usize,
    /// Characters shared between consecutive windows
    pub chunk_overlap: usize,
}

/// Embedding configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Sentence embedding model name
    pub model: String,
    /// Number of texts encoded per model call
    pub batch_size: usize,
}

/// Retrieval depth configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Nearest neighbors fetched per query source
    pub per_query_k: usize,
    /// Chunks kept after fusing all query sources
    pub combined_k: usize,
}

/// Direct text search configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Characters of context kept on each side of a match
    pub snippet_radius: usize,
    /// Query words must be strictly longer than this to become search terms
    pub min_term_chars: usize,
    /// Words excluded from per-word term extraction. The default list
    /// targets Portuguese function words and is deliberately small; it is
    /// data, swappable per deployment.
    pub stop_words: Vec<String>,
}

/// Session state limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Chat turns kept in the conversational history
    pub max_history_turns: usize,
    /// Characters of attachment text retained between turns
    pub file_text_cap: usize,
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(AcervoError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| AcervoError::Io {
            source: e,
            context: format!("Failed to read config file: {:?}", path),
        })?;
        let mut config: Config = toml::from_str(&content)?;

        // Apply environment variable overrides
        config.apply_env_overrides();

        // Validate configuration
        ConfigValidator::validate(&config)?;

        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| AcervoError::Io {
            source: e,
            context: format!("Failed to write config file: {:?}", path),
        })?;
        Ok(())
    }

    /// Apply environment variable overrides
    /// Environment variables in format: ACERVO_SECTION__KEY=value
    pub fn apply_env_overrides(&mut self) {
        for (key, value) in std::env::vars() {
            if let Some(config_key) = key.strip_prefix("ACERVO_") {
                if let Err(e) = self.set_value_from_env(config_key, &value) {
                    tracing::warn!("Failed to apply env override {}: {}", key, e);
                }
            }
        }
    }

    fn set_value_from_env(&mut self, path: &str, value: &str) -> Result<()> {
        match path {
            "KNOWLEDGE__DIRECTORY" => {
                self.knowledge.directory = PathBuf::from(value);
            }
            "EMBEDDING__MODEL" => {
                self.embedding.model = value.to_string();
            }
            "RETRIEVAL__PER_QUERY_K" => {
                self.retrieval.per_query_k =
                    value.parse().map_err(|_| AcervoError::InvalidConfigValue {
                        path: path.to_string(),
                        message: format!("Cannot parse '{}' as integer", value),
                    })?;
            }
            "RETRIEVAL__COMBINED_K" => {
                self.retrieval.combined_k =
                    value.parse().map_err(|_| AcervoError::InvalidConfigValue {
                        path: path.to_string(),
                        message: format!("Cannot parse '{}' as integer", value),
                    })?;
            }
            _ => {
                tracing::debug!("Unknown env config key: {}", path);
            }
        }
        Ok(())
    }

    /// Get the default configuration file path
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| AcervoError::Config("Cannot determine config directory".to_string()))?;

        Ok(config_dir.join("acervo").join("config.toml"))
    }
}

fn default_stop_words() -> Vec<String> {
    // Common short Portuguese function words plus a few domain nouns that
    // appear in nearly every query ("arquivo", "documento", "lista").
    // Known limitation: not exhaustive, and occasionally filters a word
    // the user actually meant to search for.
    [
        "a", "o", "de", "da", "do", "e", "é", "um", "uma", "os", "as", "em", "no", "na", "para",
        "com", "por", "que", "tem", "algum", "alguma", "alguns", "algumas", "esse", "essa",
        "nesse", "nessa", "lista", "arquivo", "documento", "meu", "minha", "meus", "minhas",
        "seu", "sua", "seus", "suas",
    ]
    .iter()
    .map(|w| w.to_string())
    .collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            knowledge: KnowledgeConfig {
                directory: PathBuf::from("knowledge_base"),
                extension: "pdf".to_string(),
            },
            chunking: ChunkingConfig {
                chunk_size: 1000,
                chunk_overlap: 200,
            },
            embedding: EmbeddingConfig {
                model: "paraphrase-multilingual-MiniLM-L12-v2".to_string(),
                batch_size: 32,
            },
            retrieval: RetrievalConfig {
                per_query_k: 5,
                combined_k: 7,
            },
            search: SearchConfig {
                snippet_radius: 150,
                min_term_chars: 2,
                stop_words: default_stop_words(),
            },
            session: SessionConfig {
                max_history_turns: 5,
                file_text_cap: 15000,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(ConfigValidator::validate(&config).is_ok());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");

        let config = Config::default();
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.chunking.chunk_size, config.chunking.chunk_size);
        assert_eq!(loaded.retrieval.combined_k, config.retrieval.combined_k);
        assert_eq!(loaded.search.stop_words, config.search.stop_words);
    }

    #[test]
    fn test_load_missing_file() {
        let temp = TempDir::new().unwrap();
        let result = Config::load(&temp.path().join("nope.toml"));
        assert!(matches!(
            result,
            Err(AcervoError::ConfigNotFound { .. })
        ));
    }
}
