//! Governance audit: stamps pass/fail verdicts and risk metrics on every
//! capability response before it reaches the caller.
//!
//! Always-run checks: confidence floor and hallucination ceiling.
//! Content-analysis capabilities additionally get their JSON payload parsed and
//! inspected (suggestion faithfulness, quantified achievements, skill evidence).
//! A flagged response is still returned; acting on the flags is the caller's job.

pub mod handlers;
pub mod heuristics;

use std::collections::HashSet;

use chrono::Utc;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::llm_client::extract::extract_json_object;
use crate::models::{AuditMetadata, Response};

use self::heuristics::{contains_quantifiable_claim, hallucination_risk};

/// Inclusive lower bound for `confidence_score`.
pub const CONFIDENCE_THRESHOLD: f64 = 0.3;
/// Exclusive upper bound for `hallucinationRisk`.
pub const HALLUCINATION_RISK_THRESHOLD: f64 = 0.7;

pub const STATUS_PASSED: &str = "passed";
pub const STATUS_FLAGGED: &str = "flagged";

pub const FLAG_HALLUCINATION_RISK: &str = "hallucination_risk";
pub const FLAG_LOW_CONFIDENCE: &str = "low_confidence";
pub const FLAG_UNFAITHFUL_SUGGESTIONS: &str = "unfaithful_suggestions";
pub const FLAG_REQUIRES_HUMAN_REVIEW: &str = "requires_human_review";

/// Capabilities whose content carries the structured analysis payload.
pub const DEFAULT_DEEP_VALIDATED: &[&str] = &["ContentStrengthAgent"];

#[derive(Debug, Clone)]
pub struct GovernanceAuditor {
    deep_validated: HashSet<String>,
}

impl Default for GovernanceAuditor {
    fn default() -> Self {
        Self::new(DEFAULT_DEEP_VALIDATED.iter().copied())
    }
}

/// Result of inspecting a structured payload.
#[derive(Debug, Default)]
struct DeepFindings {
    hallucination_passed: Option<bool>,
    unfaithful_suggestions: u64,
}

impl GovernanceAuditor {
    pub fn new<I, S>(deep_validated: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            deep_validated: deep_validated.into_iter().map(Into::into).collect(),
        }
    }

    /// Audits `response`, overwriting its verdict metadata. `original_input` is
    /// the comparison baseline; without one the hallucination check passes.
    pub fn audit(&self, mut response: Response, original_input: Option<&str>) -> Response {
        let mut metadata = std::mem::take(&mut response.audit_metadata);

        metadata.insert(
            "audit_timestamp".to_string(),
            json!(Utc::now().timestamp_millis()),
        );

        let confidence_passed = response.confidence_score >= CONFIDENCE_THRESHOLD;
        metadata.insert("confidence_check_passed".to_string(), json!(confidence_passed));

        let mut hallucination_passed = check_hallucination(&metadata, original_input);

        let mut findings = DeepFindings::default();
        if self.deep_validated.contains(&response.capability_name) {
            findings = validate_content(&response.content, original_input, &mut metadata);
            if let Some(passed) = findings.hallucination_passed {
                hallucination_passed = passed;
            }
        }
        metadata.insert(
            "hallucination_check_passed".to_string(),
            json!(hallucination_passed),
        );

        let mut flags = Vec::new();
        if !hallucination_passed {
            flags.push(FLAG_HALLUCINATION_RISK);
        }
        if !confidence_passed {
            flags.push(FLAG_LOW_CONFIDENCE);
        }

        if findings.unfaithful_suggestions > 0 {
            flags = vec![FLAG_UNFAITHFUL_SUGGESTIONS, FLAG_REQUIRES_HUMAN_REVIEW];
        }

        let status = if flags.is_empty() {
            STATUS_PASSED
        } else {
            STATUS_FLAGGED
        };
        metadata.insert("governance_audit".to_string(), json!(status));
        metadata.insert("audit_flags".to_string(), json!(flags));

        info!(
            capability = %response.capability_name,
            status,
            ?flags,
            "Governance audit complete"
        );

        response.audit_metadata = metadata;
        response
    }
}

/// Provisional check against a self-reported `hallucinationRisk`, if any.
fn check_hallucination(metadata: &AuditMetadata, original_input: Option<&str>) -> bool {
    match original_input {
        None => true,
        Some(input) if input.is_empty() => true,
        Some(_) => metadata
            .get("hallucinationRisk")
            .and_then(Value::as_f64)
            .map(|risk| risk < HALLUCINATION_RISK_THRESHOLD)
            .unwrap_or(true),
    }
}

/// Parses the payload embedded in `content` and records what it finds. A parse
/// failure is recorded and ends this sub-check only.
fn validate_content(
    content: &str,
    original_input: Option<&str>,
    metadata: &mut AuditMetadata,
) -> DeepFindings {
    let Some(payload) = extract_json_object(content) else {
        debug!("Content payload could not be parsed");
        metadata.insert("content_parse_error".to_string(), json!(true));
        return DeepFindings::default();
    };

    let risk = payload
        .get("hallucinationRisk")
        .and_then(Value::as_f64)
        .unwrap_or(0.0);
    metadata.insert("hallucinationRisk".to_string(), json!(risk));

    let mut findings = DeepFindings {
        hallucination_passed: Some(risk < HALLUCINATION_RISK_THRESHOLD),
        ..DeepFindings::default()
    };

    if let Some(suggestions) = payload.get("suggestions").and_then(Value::as_array) {
        findings.unfaithful_suggestions = suggestions
            .iter()
            .filter(|s| s.get("faithful").and_then(Value::as_bool) == Some(false))
            .count() as u64;
        metadata.insert(
            "unfaithful_suggestions".to_string(),
            json!(findings.unfaithful_suggestions),
        );
        metadata.insert("total_suggestions".to_string(), json!(suggestions.len()));

        let suggested: Vec<&str> = suggestions
            .iter()
            .filter(|s| s.get("faithful").and_then(Value::as_bool) != Some(false))
            .filter_map(|s| s.get("suggested").and_then(Value::as_str))
            .collect();
        let quantified = suggested
            .iter()
            .filter(|text| contains_quantifiable_claim(text))
            .count();
        metadata.insert("quantified_suggestions".to_string(), json!(quantified));

        if let Some(original) = original_input.filter(|o| !o.is_empty()) {
            if !suggested.is_empty() {
                let estimate = hallucination_risk(original, &suggested.join("\n"));
                metadata.insert("estimated_hallucination_risk".to_string(), json!(estimate));
            }
        }
    }

    if let Some(achievements) = payload.get("achievements").and_then(Value::as_array) {
        let has_quantified = achievements
            .iter()
            .any(|a| a.get("quantifiable").and_then(Value::as_bool) == Some(true));
        metadata.insert(
            "has_quantified_achievements".to_string(),
            json!(has_quantified),
        );
    }

    if let Some(skills) = payload.get("skills").and_then(Value::as_array) {
        let high_evidence = skills
            .iter()
            .filter(|s| {
                s.get("evidenceStrength")
                    .and_then(Value::as_str)
                    .is_some_and(|e| e.eq_ignore_ascii_case("HIGH"))
            })
            .count();
        metadata.insert(
            "high_evidence_skills_count".to_string(),
            json!(high_evidence),
        );
    }

    findings
}
