// src/document/pdf.rs
use lopdf::Document;

use crate::document::{grid, PageContent};
use crate::utils::error::DocumentError;

/// Opens the document with one credential candidate and extracts every
/// page. Load and decrypt failures are reported to the caller, which treats
/// them as "try the next candidate". A page whose text cannot be extracted
/// contributes an empty page rather than failing the whole attempt.
pub fn open_pages(bytes: &[u8], password: &str) -> Result<Vec<PageContent>, DocumentError> {
    let mut doc =
        Document::load_mem(bytes).map_err(|err| DocumentError::Load(err.to_string()))?;

    if doc.is_encrypted() {
        doc.decrypt(password)
            .map_err(|_| DocumentError::BadPassword)?;
    }

    let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
    let mut pages = Vec::with_capacity(page_numbers.len());

    for page_no in page_numbers {
        let text = match doc.extract_text(&[page_no]) {
            Ok(text) => text,
            Err(err) => {
                tracing::debug!("page {}: text extraction failed: {}", page_no, err);
                String::new()
            }
        };
        let tables = grid::tables_from_text(&text);
        tracing::trace!(
            "page {}: {} table grid(s), {} text bytes",
            page_no,
            tables.len(),
            text.len()
        );
        pages.push(PageContent { tables, text });
    }

    Ok(pages)
}
