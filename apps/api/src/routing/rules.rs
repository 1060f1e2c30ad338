//! Rule-based fast path. Case-insensitive substring matching against constant
//! keyword sets; the first matching rule wins.

use crate::capabilities::DEFAULT_CAPABILITY;

const CONTENT_STRENGTH_KEYWORDS: &[&str] = &[
    "skill",
    "strength",
    "phrasing",
    "achievement",
    "evidence",
    "improve my resume",
];

const INTERVIEW_KEYWORDS: &[&str] = &["interview", "mock", "behavioral", "practice"];

const JOB_ALIGNMENT_KEYWORDS: &[&str] = &["job", "alignment", "match", "gap"];

const CRITIQUE_KEYWORDS: &[&str] = &["analyze", "critique", "review", "feedback"];

/// Which rule produced a route, for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    EmptyInput,
    ContentStrength,
    Interview,
    JobAlignment,
    CritiqueFirstTurn,
    Critique,
}

/// Applies the rules in priority order. `None` means no rule matched.
pub fn match_rules(input: &str, history_is_empty: bool) -> Option<(Rule, Vec<&'static str>)> {
    if input.trim().is_empty() {
        return Some((Rule::EmptyInput, vec![DEFAULT_CAPABILITY]));
    }

    let lowered = input.to_lowercase();
    let mentions = |keywords: &[&str]| keywords.iter().any(|k| lowered.contains(k));

    if mentions(CONTENT_STRENGTH_KEYWORDS) {
        return Some((Rule::ContentStrength, vec!["ContentStrengthAgent"]));
    }
    if mentions(INTERVIEW_KEYWORDS) {
        return Some((Rule::Interview, vec!["InterviewCoachAgent"]));
    }
    if mentions(JOB_ALIGNMENT_KEYWORDS) {
        return Some((Rule::JobAlignment, vec!["JobAlignmentAgent"]));
    }
    if mentions(CRITIQUE_KEYWORDS) {
        return Some(if history_is_empty {
            (
                Rule::CritiqueFirstTurn,
                vec![DEFAULT_CAPABILITY, "ContentStrengthAgent"],
            )
        } else {
            (Rule::Critique, vec![DEFAULT_CAPABILITY])
        });
    }

    None
}
