//! Page extraction: raw file bytes to page-numbered text.

use crate::types::Page;
use clauseiq_core::{AppError, AppResult};
use std::path::Path;

/// Turns a document's bytes into pages of plain text.
///
/// Errors carry only the reason; the engine attaches the document name.
pub trait PageExtractor: Send + Sync {
    fn name(&self) -> &'static str;

    fn extract(&self, bytes: &[u8]) -> AppResult<Vec<Page>>;
}

/// Plain UTF-8 text; form feeds separate pages.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextExtractor;

impl PageExtractor for PlainTextExtractor {
    fn name(&self) -> &'static str {
        "text"
    }

    fn extract(&self, bytes: &[u8]) -> AppResult<Vec<Page>> {
        if bytes.contains(&0) {
            return Err(reason("input looks binary, not text"));
        }

        let text = String::from_utf8_lossy(bytes);
        let pages = text
            .split('\x0c')
            .enumerate()
            .map(|(i, page)| Page::new(i as u32 + 1, page))
            .filter(|page| !page.text.trim().is_empty())
            .collect();

        Ok(pages)
    }
}

/// PDF text via `lopdf`, one page at a time.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfExtractor;

impl PageExtractor for PdfExtractor {
    fn name(&self) -> &'static str {
        "pdf"
    }

    fn extract(&self, bytes: &[u8]) -> AppResult<Vec<Page>> {
        let document = lopdf::Document::load_mem(bytes)
            .map_err(|e| reason(&format!("unreadable PDF: {}", e)))?;

        if document.is_encrypted() {
            return Err(reason("PDF is encrypted"));
        }

        let mut pages = Vec::new();
        for number in document.get_pages().keys() {
            let text = document
                .extract_text(&[*number])
                .map_err(|e| reason(&format!("failed to read page {}: {}", number, e)))?;
            pages.push(Page::new(*number, text));
        }

        if pages.iter().all(|page| page.text.trim().is_empty()) {
            return Err(reason("PDF has no extractable text"));
        }

        tracing::debug!("Extracted {} pages from PDF", pages.len());
        Ok(pages)
    }
}

/// Pick an extractor from the file extension.
pub fn extractor_for_path(path: &Path) -> &'static dyn PageExtractor {
    let is_pdf = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));

    if is_pdf {
        &PdfExtractor
    } else {
        &PlainTextExtractor
    }
}

/// An extraction error whose document is filled in by the caller.
fn reason(message: &str) -> AppError {
    AppError::extraction("", message)
}
