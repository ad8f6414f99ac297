//! Knowledge base construction and lookup
//!
//! Handles the one-shot ingestion pipeline: enumerate source documents,
//! extract their text, chunk the concatenated corpus, embed every chunk
//! and load a vector index keyed by chunk id. Built once at startup;
//! read-only afterwards, so an `Arc<KnowledgeBase>` can be shared across
//! request threads without locking.

mod chunker;
mod extract;

pub use chunker::chunk_text;
pub use extract::{ExtractError, PdftotextExtractor, PlainTextExtractor, TextExtractor};

use crate::config::Config;
use crate::embedding::{embed_in_batches, EmbeddingProvider, VectorIndex};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Marker concatenated after each document's text so a chunk spanning two
/// sources is visible as such downstream. Chunking does not treat it
/// specially.
pub const DOCUMENT_BOUNDARY: &str = "\n\n--- FIM DO DOCUMENTO ---\n\n";

/// A retrievable piece of the ingested corpus
///
/// Ids are dense, 0-based and assigned in ingestion order; they double as
/// the vector index ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub id: i64,
    pub text: String,
}

/// The fixed corpus available for retrieval
///
/// Every failure during construction degrades to a permanently not-ready
/// instance instead of an error: the surrounding assistant keeps answering
/// from general knowledge, just without document context. A restart is the
/// only way to re-ingest.
pub struct KnowledgeBase {
    chunks: Vec<String>,
    document_count: usize,
    index: Option<VectorIndex>,
    embedder: Option<Arc<dyn EmbeddingProvider>>,
}

impl KnowledgeBase {
    /// Build the knowledge base from the configured document directory
    ///
    /// Runs synchronously and exactly once per process. Per-document
    /// extraction failures are logged and skipped; everything else that
    /// goes wrong (no documents, no text, no embedder, embedding or
    /// indexing failure) leaves the instance not-ready.
    pub fn build(
        config: &Config,
        extractor: &dyn TextExtractor,
        embedder: Option<Arc<dyn EmbeddingProvider>>,
    ) -> Self {
        let mut kb = Self {
            chunks: Vec::new(),
            document_count: 0,
            index: None,
            embedder: None,
        };

        info!(
            "Building knowledge base from {:?} (*.{})",
            config.knowledge.directory, config.knowledge.extension
        );

        let files = list_documents(&config.knowledge.directory, &config.knowledge.extension);
        if files.is_empty() {
            warn!(
                "No *.{} documents in {:?}; knowledge base stays not-ready",
                config.knowledge.extension, config.knowledge.directory
            );
            return kb;
        }

        let mut combined = String::new();
        for file in &files {
            match extractor.extract(file) {
                Ok(text) => {
                    combined.push_str(&text);
                    combined.push_str(DOCUMENT_BOUNDARY);
                    kb.document_count += 1;
                }
                Err(e) => {
                    warn!("Skipping {:?}: {}", file, e);
                }
            }
        }

        if combined.trim().is_empty() {
            warn!("No text extracted from any document; knowledge base stays not-ready");
            return kb;
        }

        let chunks = chunk_text(
            &combined,
            config.chunking.chunk_size,
            config.chunking.chunk_overlap,
        );
        if chunks.is_empty() {
            warn!("Chunking produced no output; knowledge base stays not-ready");
            return kb;
        }
        info!(
            "Extracted {} documents into {} chunks",
            kb.document_count,
            chunks.len()
        );

        let Some(embedder) = embedder else {
            warn!("Embedding model unavailable; knowledge base stays not-ready");
            return kb;
        };

        let embeddings =
            match embed_in_batches(embedder.as_ref(), &chunks, config.embedding.batch_size) {
                Ok(embeddings) => embeddings,
                Err(e) => {
                    warn!("Chunk embedding failed: {}; knowledge base stays not-ready", e);
                    return kb;
                }
            };

        // Index dimension is fixed by the first encoded batch
        let dimension = embeddings[0].len();
        let mut index = VectorIndex::new(dimension);
        let ids: Vec<i64> = (0..chunks.len() as i64).collect();
        if let Err(e) = index.add(&ids, &embeddings) {
            warn!("Index load failed: {}; knowledge base stays not-ready", e);
            return kb;
        }

        info!("Indexed {} vectors ({}D); knowledge base ready", index.len(), dimension);

        kb.chunks = chunks;
        kb.index = Some(index);
        kb.embedder = Some(embedder);
        kb
    }

    /// True iff retrieval against this knowledge base can succeed
    pub fn is_ready(&self) -> bool {
        self.embedder.is_some()
            && !self.chunks.is_empty()
            && self
                .index
                .as_ref()
                .is_some_and(|index| index.len() == self.chunks.len())
    }

    /// Resolve chunk ids back to text, dropping ids outside the corpus
    /// (including the search sentinel)
    pub fn chunks_by_ids(&self, ids: &[i64]) -> Vec<Chunk> {
        ids.iter()
            .copied()
            .filter(|id| *id >= 0 && (*id as usize) < self.chunks.len())
            .map(|id| Chunk {
                id,
                text: self.chunks[id as usize].clone(),
            })
            .collect()
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn document_count(&self) -> usize {
        self.document_count
    }

    pub fn embedder(&self) -> Option<&Arc<dyn EmbeddingProvider>> {
        self.embedder.as_ref()
    }

    pub fn index(&self) -> Option<&VectorIndex> {
        self.index.as_ref()
    }
}

/// Non-recursive, extension-filtered directory listing, sorted so chunk
/// ids are reproducible across runs
fn list_documents(directory: &Path, extension: &str) -> Vec<PathBuf> {
    let entries = match std::fs::read_dir(directory) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Cannot read {:?}: {}", directory, e);
            return Vec::new();
        }
    };

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| {
            path.extension()
                .map(|ext| ext.eq_ignore_ascii_case(extension))
                .unwrap_or(false)
        })
        .collect();
    files.sort();
    files
}
