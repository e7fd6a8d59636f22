// src/extractors/tier.rs

// --- Imports ---
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// The five commission buckets a trail disclosure can carry. The declaration
/// order is meaningful: when a text block lists values without labels, the
/// Nth untagged value belongs to the Nth tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CanonicalTier {
    FirstYear,
    SecondYear,
    ThirdYear,
    FourthYear,
    LongTerm,
}

impl CanonicalTier {
    /// All tiers in canonical order.
    pub const ALL: [CanonicalTier; 5] = [
        CanonicalTier::FirstYear,
        CanonicalTier::SecondYear,
        CanonicalTier::ThirdYear,
        CanonicalTier::FourthYear,
        CanonicalTier::LongTerm,
    ];

    pub const COUNT: usize = Self::ALL.len();

    /// Position in the canonical order, usable as an array index.
    pub fn index(self) -> usize {
        self as usize
    }

    /// The label upstream brokerage sheets use for this tier.
    pub fn label(self) -> &'static str {
        match self {
            CanonicalTier::FirstYear => "FIRST YEAR TRAIL",
            CanonicalTier::SecondYear => "SECOND YEAR TRAIL",
            CanonicalTier::ThirdYear => "THIRD YEAR TRAIL",
            CanonicalTier::FourthYear => "FOURTH YEAR TRAIL",
            CanonicalTier::LongTerm => "LONGTERM YEAR TRAIL",
        }
    }
}

// --- Header classification rules (Lazy Static) ---
// Ordered by priority; the first matching rule wins, there is no cumulative
// union across rules for the same fragment. Range headers ("1-3 years")
// deliberately sit after the single-year ordinals.
static TIER_HEADER_RULES: Lazy<Vec<(Regex, Vec<CanonicalTier>)>> = Lazy::new(|| {
    use CanonicalTier::*;
    let rule = |pat: &str, tiers: &[CanonicalTier]| {
        (
            Regex::new(pat).expect("tier header pattern must compile"),
            tiers.to_vec(),
        )
    };
    vec![
        rule(
            r"(?i)\b(first|1st)\s*(year|yr)\s*(trail|commission|rate)?\b",
            &[FirstYear],
        ),
        rule(
            r"(?i)\b(second|2nd)\s*(year|yr)\s*(trail|commission|rate)?\b",
            &[SecondYear],
        ),
        rule(
            r"(?i)\b(third|3rd)\s*(year|yr)\s*(trail|commission|rate)?\b",
            &[ThirdYear],
        ),
        rule(
            r"(?i)\b(fourth|4th)\s*(year|yr)\s*(trail|commission|rate)?\b",
            &[FourthYear],
        ),
        rule(
            r"(?i)\b(longterm|long\s*term|5\+?|beyond\s*4)\s*(year|yr)?\s*(trail|commission|rate)?\b",
            &[LongTerm],
        ),
        // The separator is optional because name normalization strips
        // hyphens before classification ("1-3" arrives as "13").
        rule(
            r"(?i)\b(1\s*(?:-|to|through)?\s*3|first\s*3|initial\s*3)\s*(year|years|yr|yrs)\s*(trail|commission|rate)?\b",
            &[FirstYear, SecondYear, ThirdYear],
        ),
        rule(
            r"(?i)\b(trail\s*(?:years?\s*)?|years?\s*)1\s*(?:-|to)?\s*3\b",
            &[FirstYear, SecondYear, ThirdYear],
        ),
    ]
});

/// Classifies a column header or text fragment into the tiers it refers to.
/// Returns an empty slice when no rule fires.
pub fn match_tiers(fragment: &str) -> &'static [CanonicalTier] {
    for (pattern, tiers) in TIER_HEADER_RULES.iter() {
        if pattern.is_match(fragment) {
            return tiers;
        }
    }
    &[]
}

// --- Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use CanonicalTier::*;

    #[test]
    fn test_single_year_headers() {
        assert_eq!(match_tiers("1st Yr Trail"), &[FirstYear]);
        assert_eq!(match_tiers("Second Year Commission"), &[SecondYear]);
        assert_eq!(match_tiers("3rd year rate"), &[ThirdYear]);
        assert_eq!(match_tiers("FOURTH YEAR TRAIL"), &[FourthYear]);
    }

    #[test]
    fn test_longterm_family() {
        assert_eq!(match_tiers("Long Term Trail"), &[LongTerm]);
        assert_eq!(match_tiers("longterm"), &[LongTerm]);
        assert_eq!(match_tiers("beyond 4 years"), &[LongTerm]);
    }

    #[test]
    fn test_range_headers_expand_to_triple() {
        let triple = [FirstYear, SecondYear, ThirdYear];
        assert_eq!(match_tiers("1-3 Years Trail"), &triple);
        assert_eq!(match_tiers("1 to 3 years"), &triple);
        assert_eq!(match_tiers("Trail 1-3"), &triple);
        assert_eq!(match_tiers("first 3 years"), &triple);
        // Hyphen-stripped form produced by name normalization.
        assert_eq!(match_tiers("13 years trail"), &triple);
    }

    #[test]
    fn test_first_matching_rule_wins() {
        // Both the ordinal and the range rule could claim this fragment;
        // the ordinal rule has priority.
        assert_eq!(match_tiers("first year trail 1-3"), &[FirstYear]);
    }

    #[test]
    fn test_unrelated_fragments_match_nothing() {
        assert!(match_tiers("Scheme Name").is_empty());
        assert!(match_tiers("Net Amount").is_empty());
        assert!(match_tiers("").is_empty());
    }

    #[test]
    fn test_canonical_order_is_stable() {
        assert_eq!(CanonicalTier::ALL[0].index(), 0);
        assert_eq!(CanonicalTier::ALL[4], LongTerm);
        assert_eq!(CanonicalTier::COUNT, 5);
    }
}
