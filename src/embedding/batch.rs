/// Batched embedding generation
use super::provider::{EmbeddingError, EmbeddingProvider};
use tracing::debug;

/// Encode `texts` in fixed-size batches, preserving input order
///
/// Batching only bounds the size of each model call; the returned vectors
/// are the same the provider would produce encoding one text at a time.
pub fn embed_in_batches(
    provider: &dyn EmbeddingProvider,
    texts: &[String],
    batch_size: usize,
) -> Result<Vec<Vec<f32>>, EmbeddingError> {
    if texts.is_empty() {
        return Ok(Vec::new());
    }

    let batch_size = batch_size.max(1);
    let mut embeddings = Vec::with_capacity(texts.len());

    for batch in texts.chunks(batch_size) {
        let batch_embeddings = provider.encode(batch)?;
        debug!("Encoded batch of {} texts", batch_embeddings.len());
        embeddings.extend(batch_embeddings);
    }

    if embeddings.len() != texts.len() {
        return Err(EmbeddingError::Generation(format!(
            "Embedding count mismatch: expected {}, got {}",
            texts.len(),
            embeddings.len()
        )));
    }

    Ok(embeddings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::HashedProvider;

    #[test]
    fn test_batching_matches_single_pass() {
        let provider = HashedProvider::new(32);
        let texts: Vec<String> = (0..7).map(|i| format!("documento número {}", i)).collect();

        let batched = embed_in_batches(&provider, &texts, 3).unwrap();
        let single = provider.encode(&texts).unwrap();

        assert_eq!(batched, single);
    }

    #[test]
    fn test_empty_input() {
        let provider = HashedProvider::new(32);
        let embeddings = embed_in_batches(&provider, &[], 8).unwrap();
        assert!(embeddings.is_empty());
    }

    #[test]
    fn test_zero_batch_size_still_progresses() {
        let provider = HashedProvider::new(32);
        let texts = vec!["um".to_string(), "dois".to_string()];

        let embeddings = embed_in_batches(&provider, &texts, 0).unwrap();
        assert_eq!(embeddings.len(), 2);
    }
}
