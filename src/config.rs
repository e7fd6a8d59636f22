// src/config.rs
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::extractors::tier::CanonicalTier;
use crate::utils::error::AppError;

/// One mandated tier rate inside a correction entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierRate {
    pub tier: CanonicalTier,
    pub rate: f64,
}

/// Forces known-good rates for a fund whose PDF layout is recurrently
/// misread. Listed tiers always win over extracted values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemeCorrection {
    /// Normalized fund name.
    pub scheme: String,
    pub rates: Vec<TierRate>,
}

/// Maps one raw spreadsheet tier label onto canonical tiers. Multi-tier
/// aliases ("1 TO 3 YEARS") resolve to the first tier with a rate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierAlias {
    pub label: String,
    pub tiers: Vec<CanonicalTier>,
}

/// Externally supplied run constants. The defaults carry the production
/// values; a JSON config file replaces them wholesale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Credential candidates tried in order; an empty string means "open
    /// without a password".
    pub passwords: Vec<String>,
    /// Rates above this are treated as extraction noise and dropped.
    pub max_reasonable_rate: f64,
    /// Minimum 0-100 similarity for a fuzzy name match to be accepted.
    pub fuzzy_score_cutoff: f64,
    pub corrections: Vec<SchemeCorrection>,
    pub tier_aliases: Vec<TierAlias>,
}

impl RunConfig {
    /// Loads a config file, replacing the built-in defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, AppError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let cfg: RunConfig = serde_json::from_str(&raw)
            .map_err(|err| AppError::Config(format!("invalid config file: {err}")))?;
        tracing::info!("Loaded run config from {}", path.as_ref().display());
        Ok(cfg)
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        use CanonicalTier::*;

        let correction = |scheme: &str, rates: &[(CanonicalTier, f64)]| SchemeCorrection {
            scheme: scheme.to_string(),
            rates: rates
                .iter()
                .map(|&(tier, rate)| TierRate { tier, rate })
                .collect(),
        };
        let alias = |label: &str, tiers: &[CanonicalTier]| TierAlias {
            label: label.to_string(),
            tiers: tiers.to_vec(),
        };
        let first_three: &[CanonicalTier] = &[FirstYear, SecondYear, ThirdYear];

        Self {
            passwords: vec![
                "ARN100481".to_string(),
                "AAHCP7661C".to_string(),
                String::new(),
            ],
            max_reasonable_rate: 10.0,
            fuzzy_score_cutoff: 90.0,
            corrections: vec![
                correction("hsbc financial services fund", &[(FourthYear, 1.35)]),
                correction(
                    "hsbc india export opportunities fund",
                    &[(ThirdYear, 1.45), (FourthYear, 1.35)],
                ),
                correction(
                    "hsbc midcap fund",
                    &[(ThirdYear, 1.15), (FourthYear, 1.05), (LongTerm, 1.05)],
                ),
            ],
            tier_aliases: vec![
                alias("FIRST YEAR TRAIL", &[FirstYear]),
                alias("SECOND YEAR TRAIL", &[SecondYear]),
                alias("THIRD YEAR TRAIL", &[ThirdYear]),
                alias("FOURTH YEAR TRAIL", &[FourthYear]),
                alias("LONGTERM YEAR TRAIL", &[LongTerm]),
                alias("FOURTH YEAR", &[FourthYear]),
                alias("4TH YEAR TRAIL", &[FourthYear]),
                alias("4TH YEAR", &[FourthYear]),
                alias("LONG TERM TRAIL", &[LongTerm]),
                alias("LONG TERM", &[LongTerm]),
                alias("1 TO 3 YEARS TRAIL", first_three),
                alias("1-3 YEARS TRAIL", first_three),
                alias("1 TO 3 YEARS", first_three),
                alias("1-3 YEARS", first_three),
                alias("TRAIL 1-3", first_three),
                alias("TRAIL YEARS 1-3", first_three),
            ],
        }
    }
}
