use crate::config::Config;
use crate::error::{AcervoError, Result, ValidationError};

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration
    pub fn validate(config: &Config) -> Result<()> {
        let mut errors = Vec::new();

        Self::validate_knowledge(config, &mut errors);
        Self::validate_chunking(config, &mut errors);
        Self::validate_embedding(config, &mut errors);
        Self::validate_retrieval(config, &mut errors);
        Self::validate_search(config, &mut errors);
        Self::validate_session(config, &mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(AcervoError::ConfigValidation { errors })
        }
    }

    fn validate_knowledge(config: &Config, errors: &mut Vec<ValidationError>) {
        // Directory existence is not checked here: an absent directory is a
        // legal runtime state (it yields a not-ready knowledge base).
        if config.knowledge.directory.as_os_str().is_empty() {
            errors.push(ValidationError::new(
                "knowledge.directory",
                "Knowledge base directory cannot be empty",
            ));
        }

        if config.knowledge.extension.is_empty() {
            errors.push(ValidationError::new(
                "knowledge.extension",
                "Extension filter cannot be empty",
            ));
        }
    }

    fn validate_chunking(config: &Config, errors: &mut Vec<ValidationError>) {
        if config.chunking.chunk_size == 0 {
            errors.push(ValidationError::new(
                "chunking.chunk_size",
                "Chunk size must be greater than 0",
            ));
        }

        if config.chunking.chunk_overlap >= config.chunking.chunk_size {
            errors.push(ValidationError::new(
                "chunking.chunk_overlap",
                format!(
                    "Overlap ({}) must be smaller than chunk size ({})",
                    config.chunking.chunk_overlap, config.chunking.chunk_size
                ),
            ));
        }
    }

    fn validate_embedding(config: &Config, errors: &mut Vec<ValidationError>) {
        if config.embedding.model.is_empty() {
            errors.push(ValidationError::new(
                "embedding.model",
                "Model name cannot be empty",
            ));
        }

        if config.embedding.batch_size == 0 {
            errors.push(ValidationError::new(
                "embedding.batch_size",
                "Batch size must be greater than 0",
            ));
        }
    }

    fn validate_retrieval(config: &Config, errors: &mut Vec<ValidationError>) {
        if config.retrieval.per_query_k == 0 {
            errors.push(ValidationError::new(
                "retrieval.per_query_k",
                "Per-query k must be greater than 0",
            ));
        }

        if config.retrieval.combined_k == 0 {
            errors.push(ValidationError::new(
                "retrieval.combined_k",
                "Combined k must be greater than 0",
            ));
        }
    }

    fn validate_search(config: &Config, errors: &mut Vec<ValidationError>) {
        if config.search.snippet_radius == 0 {
            errors.push(ValidationError::new(
                "search.snippet_radius",
                "Snippet radius must be greater than 0",
            ));
        }
    }

    fn validate_session(config: &Config, errors: &mut Vec<ValidationError>) {
        if config.session.file_text_cap == 0 {
            errors.push(ValidationError::new(
                "session.file_text_cap",
                "Retained file text cap must be greater than 0",
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_config() {
        let config = Config::default();
        assert!(ConfigValidator::validate(&config).is_ok());
    }

    #[test]
    fn test_overlap_not_smaller_than_size() {
        let mut config = Config::default();
        config.chunking.chunk_size = 100;
        config.chunking.chunk_overlap = 100;
        assert!(ConfigValidator::validate(&config).is_err());
    }

    #[test]
    fn test_zero_combined_k() {
        let mut config = Config::default();
        config.retrieval.combined_k = 0;
        assert!(ConfigValidator::validate(&config).is_err());
    }

    #[test]
    fn test_errors_accumulate() {
        let mut config = Config::default();
        config.embedding.model = String::new();
        config.retrieval.per_query_k = 0;

        match ConfigValidator::validate(&config) {
            Err(AcervoError::ConfigValidation { errors }) => {
                assert_eq!(errors.len(), 2);
            }
            other => panic!("Expected validation failure, got {:?}", other.is_ok()),
        }
    }
}
