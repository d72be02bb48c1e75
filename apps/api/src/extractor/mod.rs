//! Text extraction for uploaded résumé documents.
//!
//! `AppState` carries an `Arc<dyn TextExtractor>`; production uses
//! `PdfTextExtractor`, tests swap in fakes.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("PDF text extraction failed: {0}")]
    Pdf(String),

    #[error("document contains no extractable text")]
    Empty,

    #[error("extraction worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Converts a whole in-memory document into plain text.
    async fn extract(&self, document: Bytes) -> Result<String, ExtractionError>;
}

/// In-memory PDF extractor backed by `pdf-extract`.
///
/// Parsing is CPU-bound and runs on the blocking pool. A panic inside the
/// parser on a hostile file surfaces as `ExtractionError::Worker`.
pub struct PdfTextExtractor;

#[async_trait]
impl TextExtractor for PdfTextExtractor {
    async fn extract(&self, document: Bytes) -> Result<String, ExtractionError> {
        let text = tokio::task::spawn_blocking(move || {
            pdf_extract::extract_text_from_mem(&document)
                .map_err(|e| ExtractionError::Pdf(e.to_string()))
        })
        .await??;

        if text.trim().is_empty() {
            return Err(ExtractionError::Empty);
        }
        Ok(text)
    }
}
