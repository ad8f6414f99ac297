//! Query-time retrieval against the knowledge base
//!
//! Embeds one or more query texts (the user's question, and/or the text of
//! a file attached in the current turn), searches the vector index per
//! query, fuses the id sets and resolves them back to chunk text. The
//! retained text of a *previous* attachment never flows through here; that
//! is the direct snippet search's job.

mod fusion;

pub use fusion::fuse_ids;

use crate::config::RetrievalConfig;
use crate::knowledge::{Chunk, KnowledgeBase};
use tracing::{debug, warn};

/// Stateless retrieval front-end over a built [`KnowledgeBase`]
///
/// Every internal failure is logged and degrades to fewer (or zero)
/// results; `retrieve` never errors and never panics. Callers surface
/// "knowledge base unavailable" themselves when they care.
pub struct RetrievalEngine {
    per_query_k: usize,
    combined_k: usize,
}

impl RetrievalEngine {
    pub fn new(config: &RetrievalConfig) -> Self {
        Self {
            per_query_k: config.per_query_k,
            combined_k: config.combined_k,
        }
    }

    /// Retrieve the chunks most relevant to any of `query_texts`
    pub fn retrieve(&self, query_texts: &[String], kb: &KnowledgeBase) -> Vec<Chunk> {
        if !kb.is_ready() {
            debug!("Knowledge base not ready; skipping retrieval");
            return Vec::new();
        }

        let queries: Vec<String> = query_texts
            .iter()
            .filter(|text| !text.trim().is_empty())
            .cloned()
            .collect();
        if queries.is_empty() {
            return Vec::new();
        }

        // is_ready() already guarantees both are present
        let Some(embedder) = kb.embedder() else {
            return Vec::new();
        };
        let Some(index) = kb.index() else {
            return Vec::new();
        };

        let embeddings = match embedder.encode(&queries) {
            Ok(embeddings) => embeddings,
            Err(e) => {
                warn!("Query embedding failed: {}; returning no context", e);
                return Vec::new();
            }
        };

        let mut id_lists: Vec<Vec<i64>> = Vec::with_capacity(embeddings.len());
        for embedding in &embeddings {
            match index.search(embedding, self.per_query_k) {
                Ok((ids, _scores)) => id_lists.push(ids),
                Err(e) => {
                    warn!("Index search failed for one query: {}", e);
                }
            }
        }

        let fused = fuse_ids(id_lists, self.combined_k);
        debug!(
            "Retrieval fused {} queries into {} chunk ids",
            queries.len(),
            fused.len()
        );

        kb.chunks_by_ids(&fused)
    }
}
