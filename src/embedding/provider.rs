/// Embedding provider trait and FastEmbed implementation
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EmbeddingError {
    #[error("Model initialization failed: {0}")]
    Initialization(String),

    #[error("Embedding generation failed: {0}")]
    Generation(String),

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

/// Trait for embedding backends
///
/// Implementations load their model once at construction and are read-only
/// afterwards, so a single instance can be shared across request threads.
/// The same input must always produce the same vector within a process.
pub trait EmbeddingProvider: Send + Sync {
    /// Encode a batch of texts, preserving input length and order
    fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError>;

    /// Embedding dimension produced by this provider
    fn dimension(&self) -> usize;

    /// Model name
    fn model_name(&self) -> &str;
}

/// FastEmbed provider for local embedding generation
///
/// Defaults to the multilingual paraphrase model: the knowledge bases this
/// crate targets are Portuguese, where the English MiniLM variants degrade
/// noticeably.
///
/// **Important**: models are downloaded on-demand to `~/.cache/huggingface/`
/// on first use (~100-250MB depending on the model).
pub struct FastEmbedProvider {
    model: Arc<TextEmbedding>,
    model_name: String,
    dimension: usize,
}

impl FastEmbedProvider {
    /// Create a new FastEmbed provider with the specified model
    ///
    /// Supported:
    /// - paraphrase-multilingual-MiniLM-L12-v2 (384 dims) - default, 50+ languages
    /// - multilingual-e5-small (384 dims) - stronger multilingual retrieval
    /// - all-MiniLM-L6-v2 (384 dims) - English only, smallest download
    pub fn new(model_name: &str) -> Result<Self, EmbeddingError> {
        let embedding_model = match model_name {
            "paraphrase-multilingual-MiniLM-L12-v2" => EmbeddingModel::ParaphraseMLMiniLML12V2,
            "multilingual-e5-small" => EmbeddingModel::MultilingualE5Small,
            "all-MiniLM-L6-v2" | "all-minilm-l6-v2" => EmbeddingModel::AllMiniLML6V2,
            _ => {
                return Err(EmbeddingError::Initialization(format!(
                    "Unsupported model: {}. Supported: paraphrase-multilingual-MiniLM-L12-v2, \
                     multilingual-e5-small, all-MiniLM-L6-v2",
                    model_name
                )));
            }
        };

        let dimension = match embedding_model {
            EmbeddingModel::ParaphraseMLMiniLML12V2 => 384,
            EmbeddingModel::MultilingualE5Small => 384,
            EmbeddingModel::AllMiniLML6V2 => 384,
            _ => 384,
        };

        tracing::info!(
            "Initializing embedding model: {} ({}D, downloaded on first use if not cached)",
            model_name,
            dimension
        );

        let init_options = InitOptions::new(embedding_model).with_show_download_progress(true);

        let model = TextEmbedding::try_new(init_options)
            .map_err(|e| EmbeddingError::Initialization(e.to_string()))?;

        Ok(Self {
            model: Arc::new(model),
            model_name: model_name.to_string(),
            dimension,
        })
    }

    /// Create provider with the default multilingual model
    pub fn with_default_model() -> Result<Self, EmbeddingError> {
        Self::new("paraphrase-multilingual-MiniLM-L12-v2")
    }
}

impl EmbeddingProvider for FastEmbedProvider {
    fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let embeddings = self
            .model
            .embed(texts.to_vec(), None)
            .map_err(|e| EmbeddingError::Generation(e.to_string()))?;

        if embeddings.len() != texts.len() {
            return Err(EmbeddingError::Generation(format!(
                "Embedding count mismatch: expected {}, got {}",
                texts.len(),
                embeddings.len()
            )));
        }

        for embedding in &embeddings {
            if embedding.len() != self.dimension {
                return Err(EmbeddingError::DimensionMismatch {
                    expected: self.dimension,
                    actual: embedding.len(),
                });
            }
        }

        Ok(embeddings)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_model_rejected() {
        let provider = FastEmbedProvider::new("definitely-not-a-model");
        assert!(provider.is_err());
    }

    #[test]
    #[ignore] // Requires model download - run with: cargo test -- --ignored
    fn test_provider_creation() {
        let provider = FastEmbedProvider::with_default_model().unwrap();
        assert_eq!(provider.dimension(), 384);
        assert_eq!(
            provider.model_name(),
            "paraphrase-multilingual-MiniLM-L12-v2"
        );
    }

    #[test]
    #[ignore] // Requires model download - run with: cargo test -- --ignored
    fn test_encode_preserves_order_and_length() {
        let provider = FastEmbedProvider::with_default_model().unwrap();
        let texts = vec![
            "Como tirar segunda via da certidão de nascimento?".to_string(),
            "Prazo para contestar multa de trânsito.".to_string(),
        ];

        let embeddings = provider.encode(&texts).unwrap();
        assert_eq!(embeddings.len(), 2);
        for embedding in &embeddings {
            assert_eq!(embedding.len(), 384);
        }
    }

    #[test]
    #[ignore] // Requires model download - run with: cargo test -- --ignored
    fn test_encode_deterministic() {
        let provider = FastEmbedProvider::with_default_model().unwrap();
        let texts = vec!["procuração pública".to_string()];

        let first = provider.encode(&texts).unwrap();
        let second = provider.encode(&texts).unwrap();
        assert_eq!(first, second);
    }
}
