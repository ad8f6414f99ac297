//! Acervo - retrieval core for a document-grounded QA assistant
//!
//! Ingests a small knowledge base of PDF documents into an in-memory
//! semantic index at startup and serves two kinds of lookup at query time:
//! embedding-based retrieval over the knowledge base, and literal snippet
//! search over the text of a session's retained attachment. Prompt
//! assembly, the LLM call and the web layer live elsewhere and consume
//! these results.

pub mod cli;
pub mod config;
pub mod embedding;
pub mod error;
pub mod knowledge;
pub mod retrieval;
pub mod search;
pub mod session;

pub use error::{AcervoError, Result};
