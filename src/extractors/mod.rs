// src/extractors/mod.rs
pub mod normalize;
pub mod registry;
pub mod table;
pub mod text;
pub mod tier;

// Re-export key extraction types for convenience
pub use registry::{RateCard, SchemeRegistry};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::RunConfig;
use crate::document::{self, PageContent};

// A rate value: leading digits, a mandatory period, one or two fractional
// digits, optionally a percent sign.
pub(crate) static RATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d*\.\d{1,2}%?").expect("rate pattern must compile"));

// Markers of repeated headers and summary rows; rows and lines carrying
// them are never fund names.
const FOOTER_MARKERS: [&str; 3] = ["scheme name", "total", "aggregate"];

pub(crate) fn is_footer_text(normalized: &str) -> bool {
    FOOTER_MARKERS
        .iter()
        .any(|marker| normalized.contains(marker))
}

/// Parses one rate token matched by `RATE_RE`. Decimal commas are mapped to
/// periods and a trailing percent sign is ignored.
pub(crate) fn parse_rate(token: &str) -> Option<f64> {
    token
        .replace(',', ".")
        .trim_end_matches('%')
        .parse::<f64>()
        .ok()
}

/// Runs the decode-attempt loop: each credential candidate is tried in
/// order, and the first attempt that opens the document AND yields at least
/// one scheme wins. Correction overrides are applied to the winning
/// registry. Exhausting all candidates is not an error; it produces an
/// empty registry and downstream resolution simply finds no matches.
pub fn extract_scheme_data(pdf_bytes: &[u8], cfg: &RunConfig) -> SchemeRegistry {
    for (attempt, password) in cfg.passwords.iter().enumerate() {
        let pages = match document::pdf::open_pages(pdf_bytes, password) {
            Ok(pages) => pages,
            Err(err) => {
                tracing::debug!("decode attempt {} failed: {}", attempt + 1, err);
                continue;
            }
        };

        let mut registry = extract_from_pages(&pages, cfg);
        if !registry.is_empty() {
            registry.apply_corrections(&cfg.corrections);
            tracing::info!(
                "decode attempt {} extracted {} schemes from {} pages",
                attempt + 1,
                registry.len(),
                pages.len()
            );
            return registry;
        }
        tracing::debug!(
            "decode attempt {} opened the document but yielded no schemes",
            attempt + 1
        );
    }

    tracing::warn!("no decode attempt produced scheme data, continuing with an empty registry");
    SchemeRegistry::new()
}

/// Sweeps the pages of one successfully decoded document. Tables are
/// preferred; the text fallback runs for a page when no table has been seen
/// yet or when the tables processed so far produced nothing.
pub fn extract_from_pages(pages: &[PageContent], cfg: &RunConfig) -> SchemeRegistry {
    let mut registry = SchemeRegistry::new();
    let mut tables_seen = false;

    for (page_idx, page) in pages.iter().enumerate() {
        for grid in &page.tables {
            // A usable table needs a header row and at least one data row.
            if grid.len() < 2 {
                continue;
            }
            tables_seen = true;
            table::extract_table(grid, cfg, &mut registry);
        }

        if !tables_seen || registry.is_empty() {
            tracing::debug!("page {}: falling back to line scanning", page_idx + 1);
            text::extract_text_block(&page.text, cfg, &mut registry);
        }
    }

    registry
}
