// src/resolver/mod.rs
use std::collections::HashMap;

use crate::config::RunConfig;
use crate::extractors::normalize::normalize;
use crate::extractors::registry::{RateCard, SchemeRegistry};
use crate::extractors::tier::CanonicalTier;

/// Counters for one resolution pass, logged at the end of a run and used in
/// tests to prove that exact hits never consult the fuzzy path.
#[derive(Debug, Default, Clone, Copy)]
pub struct ResolutionStats {
    pub exact_hits: u64,
    pub fuzzy_attempts: u64,
    pub fuzzy_hits: u64,
    pub misses: u64,
}

/// Resolves (fund name, tier label) pairs against a finished registry.
/// Lookup is exact first, fuzzy second; unrecognized tier labels and
/// below-cutoff matches yield "no rate", never a guess.
pub struct RateResolver<'a> {
    registry: &'a SchemeRegistry,
    aliases: HashMap<String, Vec<CanonicalTier>>,
    score_cutoff: f64,
    stats: ResolutionStats,
}

impl<'a> RateResolver<'a> {
    pub fn new(registry: &'a SchemeRegistry, cfg: &RunConfig) -> Self {
        let aliases = cfg
            .tier_aliases
            .iter()
            .map(|alias| (alias.label.trim().to_uppercase(), alias.tiers.clone()))
            .collect();
        Self {
            registry,
            aliases,
            score_cutoff: cfg.fuzzy_score_cutoff,
            stats: ResolutionStats::default(),
        }
    }

    pub fn stats(&self) -> ResolutionStats {
        self.stats
    }

    /// Resolves one spreadsheet row to a rate, or None when the fund or the
    /// tier label cannot be matched confidently.
    pub fn resolve(&mut self, fund_name: &str, tier_label: &str) -> Option<f64> {
        let resolved = self.lookup(fund_name, tier_label);
        if resolved.is_none() {
            self.stats.misses += 1;
        }
        resolved
    }

    fn lookup(&mut self, fund_name: &str, tier_label: &str) -> Option<f64> {
        let scheme = normalize(fund_name);
        if scheme.is_empty() {
            return None;
        }

        let label = tier_label.trim().to_uppercase();
        let Some(tiers) = self.aliases.get(&label).cloned() else {
            tracing::debug!("unrecognized tier label {:?}", tier_label);
            return None;
        };

        // An exact key hit is final: it never falls through to fuzzy
        // matching, even when the requested tier carries no rate. A hit
        // only counts towards the tally when it yields a rate, so each
        // row lands in exactly one summary bucket.
        if let Some(card) = self.registry.get(&scheme) {
            let rate = first_rate(card, &tiers);
            if rate.is_some() {
                self.stats.exact_hits += 1;
            }
            return rate;
        }

        self.stats.fuzzy_attempts += 1;
        let (best_key, score) = self.best_match(&scheme)?;
        if score < self.score_cutoff {
            tracing::debug!(
                "best candidate {:?} for {:?} scored {:.1}, below cutoff {:.0}",
                best_key,
                scheme,
                score,
                self.score_cutoff
            );
            return None;
        }
        tracing::debug!("fuzzy-matched {:?} -> {:?} ({:.1})", scheme, best_key, score);
        let rate = first_rate(self.registry.get(&best_key)?, &tiers);
        if rate.is_some() {
            self.stats.fuzzy_hits += 1;
        }
        rate
    }

    /// Best Jaro-Winkler candidate among the registry keys, on a 0-100
    /// scale.
    fn best_match(&self, scheme: &str) -> Option<(String, f64)> {
        self.registry
            .keys()
            .map(|key| (key.clone(), strsim::jaro_winkler(scheme, key) * 100.0))
            .max_by(|a, b| a.1.total_cmp(&b.1))
    }
}

fn first_rate(card: &RateCard, tiers: &[CanonicalTier]) -> Option<f64> {
    tiers.iter().find_map(|tier| card.get(*tier))
}
