//! Document text extraction boundary
//!
//! The retrieval core never parses document bytes itself; it consumes a
//! `TextExtractor`. Two adapters are provided: poppler's `pdftotext` for
//! the PDF corpora this crate targets, and a plain-text reader for text
//! corpora and tests.

use std::path::Path;
use std::process::Command;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Failed to run {tool}: {message}")]
    Tool { tool: String, message: String },

    #[error("File {0} contains no readable text")]
    NoText(String),

    #[error("Failed to read {path}: {message}")]
    Read { path: String, message: String },
}

/// Extracts plain text from a document on disk
///
/// Implementations report unreadable or text-free documents as errors with
/// a human-readable message; for attachments processed inside a request
/// that message is surfaced to the model context verbatim.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, path: &Path) -> Result<String, ExtractError>;
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// PDF extraction via the poppler `pdftotext` binary
pub struct PdftotextExtractor;

impl TextExtractor for PdftotextExtractor {
    fn extract(&self, path: &Path) -> Result<String, ExtractError> {
        let output = Command::new("pdftotext")
            .arg("-layout")
            .arg("-enc")
            .arg("UTF-8")
            .arg(path)
            .arg("-")
            .output()
            .map_err(|e| ExtractError::Tool {
                tool: "pdftotext".to_string(),
                message: format!("{} (is poppler installed?)", e),
            })?;

        if !output.status.success() {
            return Err(ExtractError::Tool {
                tool: "pdftotext".to_string(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        if text.trim().is_empty() {
            return Err(ExtractError::NoText(display_name(path)));
        }

        tracing::debug!(
            "Extracted {} characters from {}",
            text.chars().count(),
            display_name(path)
        );
        Ok(text)
    }
}

/// Reads documents that are already plain text
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, path: &Path) -> Result<String, ExtractError> {
        let text = std::fs::read_to_string(path).map_err(|e| ExtractError::Read {
            path: display_name(path),
            message: e.to_string(),
        })?;

        if text.trim().is_empty() {
            return Err(ExtractError::NoText(display_name(path)));
        }

        Ok(text)
    }
}
