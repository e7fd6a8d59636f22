// src/extractors/registry.rs
use std::collections::HashMap;

use crate::config::SchemeCorrection;
use crate::extractors::tier::CanonicalTier;

/// Per-scheme commission rates, one optional value per canonical tier.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RateCard {
    rates: [Option<f64>; CanonicalTier::COUNT],
}

impl RateCard {
    pub fn get(&self, tier: CanonicalTier) -> Option<f64> {
        self.rates[tier.index()]
    }

    pub fn set(&mut self, tier: CanonicalTier, rate: f64) {
        self.rates[tier.index()] = Some(rate);
    }

    /// Business rule: the long-term trail defaults to the fourth-year trail
    /// when it is not separately disclosed.
    pub fn fill_longterm_from_fourth(&mut self) {
        if let Some(fourth) = self.get(CanonicalTier::FourthYear) {
            if self.get(CanonicalTier::LongTerm).is_none() {
                self.set(CanonicalTier::LongTerm, fourth);
            }
        }
    }

    pub fn has_any_rate(&self) -> bool {
        self.rates.iter().any(|rate| rate.is_some())
    }
}

/// Normalized fund name -> rate card, accumulated across the pages of one
/// decode attempt. Never merged across attempts; immutable once handed to
/// the resolver.
#[derive(Debug, Default)]
pub struct SchemeRegistry {
    schemes: HashMap<String, RateCard>,
}

impl SchemeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.schemes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemes.is_empty()
    }

    pub fn get(&self, normalized_name: &str) -> Option<&RateCard> {
        self.schemes.get(normalized_name)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.schemes.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &RateCard)> {
        self.schemes.iter()
    }

    /// Inserts or overwrites the record for a scheme. Cards with no resolved
    /// tier at all are extraction noise and are not retained.
    pub fn insert(&mut self, normalized_name: String, card: RateCard) -> bool {
        if !card.has_any_rate() {
            tracing::trace!("discarding all-empty record for {:?}", normalized_name);
            return false;
        }
        self.schemes.insert(normalized_name, card);
        true
    }

    /// Forces mandated rates for schemes whose PDF layouts are recurrently
    /// misread. Listed tiers win over whatever was extracted, even when the
    /// extracted value looked plausible.
    pub fn apply_corrections(&mut self, corrections: &[SchemeCorrection]) {
        for correction in corrections {
            if let Some(card) = self.schemes.get_mut(&correction.scheme) {
                for mandated in &correction.rates {
                    if card.get(mandated.tier) != Some(mandated.rate) {
                        tracing::debug!(
                            "correcting {:?} {:?}: {:?} -> {}",
                            correction.scheme,
                            mandated.tier,
                            card.get(mandated.tier),
                            mandated.rate
                        );
                        card.set(mandated.tier, mandated.rate);
                    }
                }
            }
        }
    }
}

// --- Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SchemeCorrection, TierRate};
    use CanonicalTier::*;

    #[test]
    fn test_longterm_defaults_to_fourth_year() {
        let mut card = RateCard::default();
        card.set(FourthYear, 1.05);
        card.fill_longterm_from_fourth();
        assert_eq!(card.get(LongTerm), Some(1.05));
    }

    #[test]
    fn test_longterm_not_overwritten_when_disclosed() {
        let mut card = RateCard::default();
        card.set(FourthYear, 1.05);
        card.set(LongTerm, 0.95);
        card.fill_longterm_from_fourth();
        assert_eq!(card.get(LongTerm), Some(0.95));
    }

    #[test]
    fn test_empty_cards_are_not_retained() {
        let mut registry = SchemeRegistry::new();
        assert!(!registry.insert("ghost fund".to_string(), RateCard::default()));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_corrections_always_win() {
        let mut registry = SchemeRegistry::new();
        let mut card = RateCard::default();
        card.set(FourthYear, 0.50);
        registry.insert("hsbc financial services fund".to_string(), card);

        registry.apply_corrections(&[SchemeCorrection {
            scheme: "hsbc financial services fund".to_string(),
            rates: vec![TierRate {
                tier: FourthYear,
                rate: 1.35,
            }],
        }]);

        let card = registry.get("hsbc financial services fund").unwrap();
        assert_eq!(card.get(FourthYear), Some(1.35));
    }

    #[test]
    fn test_corrections_skip_absent_schemes() {
        let mut registry = SchemeRegistry::new();
        registry.apply_corrections(&[SchemeCorrection {
            scheme: "hsbc midcap fund".to_string(),
            rates: vec![TierRate {
                tier: ThirdYear,
                rate: 1.15,
            }],
        }]);
        assert!(registry.is_empty());
    }
}
