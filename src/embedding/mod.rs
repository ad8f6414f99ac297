//! Embedding generation and exact vector search
//!
//! Architecture:
//! - EmbeddingProvider trait for abstraction over backends
//! - FastEmbedProvider for local neural embeddings (multilingual, 384-dim)
//! - HashedProvider for deterministic model-free operation
//! - Flat exact inner-product VectorIndex
//! - Fixed-size batching for throughput

mod batch;
mod hashed;
mod provider;
mod vector_index;

pub use batch::embed_in_batches;
pub use hashed::HashedProvider;
pub use provider::{EmbeddingError, EmbeddingProvider, FastEmbedProvider};
pub use vector_index::{VectorIndex, VectorIndexError, SENTINEL_ID};
