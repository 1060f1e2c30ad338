//! Text heuristics usable on their own, independent of the audit flow.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::{Regex, RegexSet};

/// Percentages, currency, durations, headcounts, project/client counts and
/// verbs of change followed by a number.
static QUANTIFIABLE_PATTERNS: Lazy<RegexSet> = Lazy::new(|| {
    RegexSet::new([
        r"(?i)\d+%",
        r"(?i)\$\d+",
        r"(?i)\d+\s*(years?|months?|weeks?)",
        r"(?i)\d+\s*(people|team members|employees)",
        r"(?i)\d+\s*(projects?|clients?|customers?)",
        r"(?i)increased?\s+by\s+\d+",
        r"(?i)reduced?\s+by\s+\d+",
        r"(?i)saved\s+\d+",
        r"(?i)improved\s+.*\d+",
    ])
    .expect("quantifiable patterns are valid")
});

static WORD_SPLIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("valid regex"));

static NUMERAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("valid regex"));

/// One or more consecutive capitalised words.
static PROPER_NOUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Z][a-z]+(?:\s+[A-Z][a-z]+)*\b").expect("valid regex"));

const NEW_WORD_WEIGHT: f64 = 0.5;
const NEW_NUMERAL_PENALTY: f64 = 0.3;
const NEW_PROPER_NOUN_PENALTY: f64 = 0.2;

/// True if `text` contains a measurable claim.
pub fn contains_quantifiable_claim(text: &str) -> bool {
    !text.is_empty() && QUANTIFIABLE_PATTERNS.is_match(text)
}

/// Estimates, in [0, 1], how much of `generated` is unsupported by `original`.
///
/// risk = |new significant words| / |generated significant words| * 0.5
///      + 0.3 if a numeral appears that the original lacks
///      + 0.2 if a proper-noun sequence appears that the original lacks
/// clamped to 1.0.
pub fn hallucination_risk(original: &str, generated: &str) -> f64 {
    let original_words = significant_words(original);
    let generated_words = significant_words(generated);

    let mut risk = if generated_words.is_empty() {
        0.0
    } else {
        let new_words = generated_words.difference(&original_words).count();
        new_words as f64 / generated_words.len() as f64 * NEW_WORD_WEIGHT
    };

    if contains_new_numerals(original, generated) {
        risk += NEW_NUMERAL_PENALTY;
    }

    if contains_new_proper_nouns(original, generated) {
        risk += NEW_PROPER_NOUN_PENALTY;
    }

    risk.min(1.0)
}

/// Lowercase alphanumeric tokens longer than three characters.
fn significant_words(text: &str) -> HashSet<String> {
    WORD_SPLIT
        .split(&text.to_lowercase())
        .filter(|token| token.len() > 3)
        .map(str::to_string)
        .collect()
}

fn contains_new_numerals(original: &str, generated: &str) -> bool {
    let known: HashSet<&str> = NUMERAL.find_iter(original).map(|m| m.as_str()).collect();
    NUMERAL
        .find_iter(generated)
        .any(|m| !known.contains(m.as_str()))
}

fn contains_new_proper_nouns(original: &str, generated: &str) -> bool {
    let known: HashSet<String> = PROPER_NOUN
        .find_iter(original)
        .map(|m| m.as_str().to_lowercase())
        .collect();
    PROPER_NOUN
        .find_iter(generated)
        .any(|m| !known.contains(&m.as_str().to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_text_has_zero_risk() {
        let text = "The team improved sales.";
        assert_eq!(hallucination_risk(text, text), 0.0);
    }

    #[test]
    fn test_invented_numbers_and_names_raise_risk() {
        let risk = hallucination_risk(
            "We improved sales.",
            "Acme Corp increased sales by 500 clients in Paris.",
        );
        assert!(risk > 0.5, "expected > 0.5, got {risk}");
        assert!(risk <= 1.0);
    }

    #[test]
    fn test_new_numeral_alone_adds_point_three() {
        let risk = hallucination_risk("shipped the release", "shipped the release 3");
        assert!((risk - 0.3).abs() < 1e-9, "got {risk}");
    }

    #[test]
    fn test_empty_generated_text_is_zero() {
        assert_eq!(hallucination_risk("anything at all", ""), 0.0);
    }

    #[test]
    fn test_proper_noun_sequences_compare_lowercased() {
        let risk = hallucination_risk("Shipped for Acme Corp", "acme corp Shipped");
        // "Shipped" is known; "acme corp" is not capitalised so it is not a proper noun.
        assert_eq!(risk, 0.0);
    }

    #[test]
    fn test_risk_is_clamped_to_one() {
        let risk = hallucination_risk(
            "a",
            "Globex Industries hired 4000 engineers across Berlin offices yesterday",
        );
        assert!(risk <= 1.0);
        assert!(risk >= 0.99);
    }

    #[test]
    fn test_quantifiable_percentages_and_currency() {
        assert!(contains_quantifiable_claim("Cut churn 15%"));
        assert!(contains_quantifiable_claim("Closed $250 deals"));
    }

    #[test]
    fn test_quantifiable_durations_and_counts() {
        assert!(contains_quantifiable_claim("Delivered in 6 weeks"));
        assert!(contains_quantifiable_claim("Managed 12 people"));
        assert!(contains_quantifiable_claim("Onboarded 30 clients"));
    }

    #[test]
    fn test_quantifiable_verbs_of_change() {
        assert!(contains_quantifiable_claim("Increased by 40 points"));
        assert!(contains_quantifiable_claim("reduced by 3 hours"));
        assert!(contains_quantifiable_claim("Saved 200 hours per quarter"));
        assert!(contains_quantifiable_claim("Improved build times from 45 to 8"));
    }

    #[test]
    fn test_vague_claims_are_not_quantifiable() {
        assert!(!contains_quantifiable_claim("Improved the user experience"));
        assert!(!contains_quantifiable_claim("Led various projects"));
        assert!(!contains_quantifiable_claim(""));
    }
}
