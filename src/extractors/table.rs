// src/extractors/table.rs
use crate::config::RunConfig;
use crate::document::TableGrid;
use crate::extractors::normalize::normalize;
use crate::extractors::registry::{RateCard, SchemeRegistry};
use crate::extractors::tier::{match_tiers, CanonicalTier};
use crate::extractors::{is_footer_text, parse_rate, RATE_RE};

// Header keywords that identify the fund-name column.
const SCHEME_COLUMN_KEYWORDS: [&str; 3] = ["scheme", "fund", "name"];

/// Column assignments discovered from a table's header row. Per tier the
/// last claiming column wins, as does the last scheme-like column.
struct ColumnMap {
    scheme_col: usize,
    tier_cols: [Option<usize>; CanonicalTier::COUNT],
}

fn map_columns(header: &[String]) -> Option<ColumnMap> {
    let mut scheme_col = None;
    let mut tier_cols = [None; CanonicalTier::COUNT];

    for (idx, cell) in header.iter().enumerate() {
        let header_text = normalize(cell);
        // Fund-name detection takes precedence over tier classification.
        if SCHEME_COLUMN_KEYWORDS
            .iter()
            .any(|keyword| header_text.contains(keyword))
        {
            scheme_col = Some(idx);
            continue;
        }
        for tier in match_tiers(&header_text) {
            tier_cols[tier.index()] = Some(idx);
        }
    }

    scheme_col.map(|scheme_col| ColumnMap {
        scheme_col,
        tier_cols,
    })
}

/// Extracts scheme rate records from one tabular region. The grid must carry
/// a header row plus at least one data row; the caller guarantees that.
pub fn extract_table(table: &TableGrid, cfg: &RunConfig, registry: &mut SchemeRegistry) {
    let Some(columns) = map_columns(&table[0]) else {
        tracing::debug!("table without a fund-name column, skipping");
        return;
    };

    for row in &table[1..] {
        if row.len() <= columns.scheme_col {
            continue;
        }
        let scheme_name = normalize(&row[columns.scheme_col]);
        // Footer filtering guards against repeated headers and summary rows.
        if scheme_name.is_empty() || is_footer_text(&scheme_name) {
            continue;
        }

        let mut card = RateCard::default();
        for (tier_idx, tier_col) in columns.tier_cols.iter().enumerate() {
            let Some(col) = tier_col else { continue };
            let Some(cell) = row.get(*col) else { continue };
            let Some(found) = RATE_RE.find(cell.trim()) else {
                continue;
            };
            let Some(rate) = parse_rate(found.as_str()) else {
                continue;
            };
            if rate > cfg.max_reasonable_rate {
                tracing::trace!(
                    "discarding implausible rate {} for {:?}",
                    rate,
                    scheme_name
                );
                continue;
            }
            card.set(CanonicalTier::ALL[tier_idx], rate);
        }

        card.fill_longterm_from_fourth();
        registry.insert(scheme_name, card);
    }
}
