// src/extractors/text.rs
use once_cell::sync::Lazy;

use crate::config::RunConfig;
use crate::extractors::normalize::normalize;
use crate::extractors::registry::{RateCard, SchemeRegistry};
use crate::extractors::tier::{match_tiers, CanonicalTier};
use crate::extractors::{is_footer_text, parse_rate, RATE_RE};

// Lowercased tier labels, used to tell a fund-name line from a data line.
static TIER_LABELS_LOWER: Lazy<Vec<String>> = Lazy::new(|| {
    CanonicalTier::ALL
        .iter()
        .map(|tier| tier.label().to_lowercase())
        .collect()
});

fn contains_tier_label(text: &str) -> bool {
    TIER_LABELS_LOWER
        .iter()
        .any(|label| text.contains(label.as_str()))
}

/// Line-by-line fallback for pages without usable tables. A candidate
/// fund-name line carries at least one rate and a non-empty, non-footer,
/// non-tier remainder once the rates are stripped out. The next lines (one
/// window per tier) are then scanned: tier-tagged lines assign their first
/// rates to the tagged tiers, untagged rates fill the remaining tiers in
/// canonical order.
pub fn extract_text_block(text: &str, cfg: &RunConfig, registry: &mut SchemeRegistry) {
    let lines: Vec<String> = text.lines().map(|raw| normalize(raw.trim())).collect();

    for (idx, line) in lines.iter().enumerate() {
        if line.is_empty() || is_footer_text(line) {
            continue;
        }
        if !RATE_RE.is_match(line) {
            continue;
        }
        let residue = RATE_RE.replace_all(line, "");
        let scheme_name = normalize(residue.trim());
        if scheme_name.is_empty() || contains_tier_label(&scheme_name) {
            continue;
        }

        let mut card = RateCard::default();
        let mut cursor = 0usize;
        let window_end = (idx + CanonicalTier::COUNT).min(lines.len());
        for subline in &lines[idx..window_end] {
            let tagged = match_tiers(subline);
            for found in RATE_RE.find_iter(subline) {
                let Some(rate) = parse_rate(found.as_str()) else {
                    continue;
                };
                if rate > cfg.max_reasonable_rate {
                    tracing::trace!("discarding implausible rate {} near {:?}", rate, scheme_name);
                    continue;
                }
                if !tagged.is_empty() && cursor < tagged.len() {
                    for tier in tagged {
                        card.set(*tier, rate);
                    }
                    cursor += tagged.len();
                } else if cursor < CanonicalTier::COUNT {
                    card.set(CanonicalTier::ALL[cursor], rate);
                    cursor += 1;
                }
            }
        }

        card.fill_longterm_from_fourth();
        registry.insert(scheme_name, card);
    }
}
