// src/extractors/normalize.rs
use once_cell::sync::Lazy;
use regex::Regex;

// Everything that is not alphanumeric, whitespace or a period is dropped
// before comparison.
static SPECIAL_CHARS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\w\s.]").expect("special-char pattern must compile"));

// One trailing plan qualifier is stripped so that e.g. "X Fund - Regular Plan"
// and "X Fund" compare equal. Alternatives are tried left to right.
static PLAN_SUFFIX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\s*(regular plan|reg|institutional plan|ex institutional plan|retail plan|long term plan)\s*$",
    )
    .expect("plan-suffix pattern must compile")
});

/// Canonicalizes a fund name for storage and lookup: case, punctuation and
/// surrounding whitespace are ignored, and a trailing plan qualifier is
/// dropped. Idempotent except when a plan phrase legitimately occurs twice
/// at the end of the name.
pub fn normalize(text: &str) -> String {
    let stripped = SPECIAL_CHARS_RE.replace_all(text, "");
    let lowered = stripped.trim().to_lowercase();
    PLAN_SUFFIX_RE.replace(&lowered, "").trim().to_string()
}

// --- Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_punctuation_whitespace() {
        assert_eq!(normalize("  ABC Fund  "), "abc fund");
        assert_eq!(normalize("ABC Fund (Growth)"), "abc fund growth");
        assert_eq!(normalize("A&B-Fund, Ltd."), "abfund ltd.");
    }

    #[test]
    fn test_plan_suffix_stripped() {
        assert_eq!(normalize("ABC Fund Regular Plan"), "abc fund");
        assert_eq!(normalize("ABC Fund - Institutional Plan"), "abc fund");
        assert_eq!(normalize("ABC Fund Retail Plan"), "abc fund");
        assert_eq!(normalize("ABC Fund reg"), "abc fund");
        // The qualifier is only dropped at the end of the name.
        assert_eq!(normalize("Regular Plan Fund"), "regular plan fund");
    }

    #[test]
    fn test_idempotent() {
        for input in ["ABC Fund Regular Plan", "  HSBC MidCap Fund ", "x.y.z"] {
            let once = normalize(input);
            assert_eq!(normalize(&once), once);
        }
    }

    #[test]
    fn test_periods_survive() {
        assert_eq!(normalize("Fund 0.50"), "fund 0.50");
    }
}
