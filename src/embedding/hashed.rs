//! Deterministic hash-bucket embedding provider
//!
//! Folds word and character-trigram hashes of the input into a fixed number
//! of buckets and normalizes the result to a unit vector. Shared vocabulary
//! between two texts lands in shared buckets, so inner product still orders
//! lexically similar texts above unrelated ones. Nowhere near a neural
//! sentence encoder in quality, but it needs no download and always returns
//! the same vector for the same text.

use super::provider::{EmbeddingError, EmbeddingProvider};

/// Model-free embedding provider for tests and offline deployments
#[derive(Debug)]
pub struct HashedProvider {
    dimension: usize,
}

impl HashedProvider {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut embedding = vec![0.0f32; self.dimension];

        let lower = text.to_lowercase();
        for word in lower.split_whitespace() {
            let word_bucket = fold_hash(word.as_bytes(), 31) as usize % self.dimension;
            embedding[word_bucket] += 1.0;

            let chars: Vec<char> = word.chars().collect();
            for trigram in chars.windows(3) {
                let key: String = trigram.iter().collect();
                let bucket = fold_hash(key.as_bytes(), 37) as usize % self.dimension;
                embedding[bucket] += 0.5;
            }
        }

        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut embedding {
                *v /= norm;
            }
        }

        embedding
    }
}

// Fixed multiplier fold, not a seeded hasher: vectors must be identical
// across provider instances and across processes.
fn fold_hash(bytes: &[u8], multiplier: u64) -> u64 {
    bytes
        .iter()
        .fold(0u64, |acc, b| acc.wrapping_mul(multiplier).wrapping_add(*b as u64))
}

impl EmbeddingProvider for HashedProvider {
    fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Ok(texts.iter().map(|text| self.embed_text(text)).collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        "hashed-ngram-v1"
    }
}
