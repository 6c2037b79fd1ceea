//! Text Extractor: plain text from an uploaded PDF.
//!
//! The extractor is built once at startup and injected through `AppState` as an
//! `Arc<dyn TextExtractor>`. Parsing is CPU-bound: callers run it inside
//! `tokio::task::spawn_blocking`.

use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};

/// Pages read from the start of the document by default.
pub const DEFAULT_PAGE_LIMIT: usize = 5;

const PDF_MAGIC: &[u8] = b"%PDF";

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("file is not a PDF document")]
    NotAPdf,

    #[error("PDF could not be read: {0}")]
    Unreadable(String),

    #[error("No text extracted from PDF. It may be image-based or encrypted.")]
    NoText,

    #[error("text extraction timed out after {0:?}")]
    Timeout(Duration),

    #[error("text extraction aborted: {0}")]
    Aborted(String),
}

/// Turns PDF bytes into plain text.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, pdf: &[u8]) -> Result<String, ExtractionError>;
}

/// `pdf-extract` backed extractor reading at most `page_limit` pages.
#[derive(Debug, Clone)]
pub struct PdfTextExtractor {
    page_limit: usize,
}

impl PdfTextExtractor {
    pub fn new(page_limit: usize) -> Self {
        Self {
            page_limit: page_limit.max(1),
        }
    }
}

impl Default for PdfTextExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_LIMIT)
    }
}

impl TextExtractor for PdfTextExtractor {
    fn extract(&self, pdf: &[u8]) -> Result<String, ExtractionError> {
        if !pdf.starts_with(PDF_MAGIC) {
            return Err(ExtractionError::NotAPdf);
        }

        let pages = pdf_extract::extract_text_from_mem_by_pages(pdf)
            .map_err(|e| ExtractionError::Unreadable(e.to_string()))?;

        debug!(
            "PDF has {} pages, reading up to {}",
            pages.len(),
            self.page_limit
        );

        assemble_pages(&pages, self.page_limit)
    }
}

/// Joins the first `limit` pages into one text, one cleaned page per line block.
///
/// Fails with `NoText` when nothing but whitespace remains.
pub fn assemble_pages(pages: &[String], limit: usize) -> Result<String, ExtractionError> {
    let mut text = String::new();

    for (i, page) in pages.iter().take(limit).enumerate() {
        let cleaned = clean_page_text(page);
        debug!("Page {} text length: {}", i + 1, cleaned.len());
        if cleaned.is_empty() {
            continue;
        }
        if !text.is_empty() {
            text.push('\n');
        }
        text.push_str(&cleaned);
    }

    if text.is_empty() {
        warn!("No text extracted, possibly image-based or encrypted PDF");
        return Err(ExtractionError::NoText);
    }

    Ok(text)
}

/// Collapses whitespace runs, drops blank lines and stray NUL/BOM characters.
fn clean_page_text(page: &str) -> String {
    page.lines()
        .map(|line| {
            line.split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
                .replace(['\u{0}', '\u{FEFF}'], "")
        })
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
