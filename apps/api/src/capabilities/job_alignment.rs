//! Job alignment: fit scoring of a resume against a job description.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use super::prompts::JOB_ALIGNMENT_SYSTEM;
use super::{Capability, CapabilityError, PromptedAgent};
use crate::llm_client::extract::extract_json_object;
use crate::llm_client::TextGenerator;
use crate::models::{AuditMetadata, Response, SessionContext};

/// Shared-memory key a client can set to pin the target job description.
pub const JOB_DESCRIPTION_KEY: &str = "job_description";

const DEFAULT_FIT_SCORE: u32 = 50;
const MISSING_SKILL_PENALTY: f64 = 0.02;
const MIN_CONFIDENCE: f64 = 0.3;
const MAX_CONFIDENCE: f64 = 0.95;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AlignmentReport {
    #[serde(default)]
    skills_match: Vec<String>,
    #[serde(default)]
    missing_skills: Vec<String>,
    #[serde(default)]
    experience_match: Option<String>,
    #[serde(default)]
    fit_score: Option<f64>,
    #[serde(default)]
    reasoning: Option<String>,
}

pub struct JobAlignmentAgent {
    agent: PromptedAgent,
}

impl JobAlignmentAgent {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            agent: PromptedAgent::new("JobAlignmentAgent", JOB_ALIGNMENT_SYSTEM, generator),
        }
    }
}

#[async_trait]
impl Capability for JobAlignmentAgent {
    fn name(&self) -> &str {
        self.agent.name()
    }

    async fn process(
        &self,
        input: &str,
        context: &mut SessionContext,
    ) -> Result<Response, CapabilityError> {
        let prompt = match context
            .shared_memory
            .get(JOB_DESCRIPTION_KEY)
            .and_then(|v| v.as_str())
        {
            Some(jd) => format!("Job description:\n{jd}\n\n{input}"),
            None => input.to_string(),
        };

        let raw = self.agent.call(&prompt).await?;

        let report = extract_json_object(&raw)
            .and_then(|value| serde_json::from_value::<AlignmentReport>(value).ok());

        let Some(report) = report else {
            warn!("Job alignment output was not structured; returning raw text");
            return Ok(Response::new(
                self.name(),
                raw,
                "Evaluated alignment between resume and job description.",
                confidence(DEFAULT_FIT_SCORE, 0),
                Vec::new(),
                AuditMetadata::new(),
            ));
        };

        let fit_score = report
            .fit_score
            .map(|s| s.round().clamp(0.0, 100.0) as u32)
            .unwrap_or(DEFAULT_FIT_SCORE);

        let mut metadata = AuditMetadata::new();
        metadata.insert("fitScore".to_string(), json!(fit_score));
        metadata.insert("skillsMatch".to_string(), json!(report.skills_match));
        metadata.insert("missingSkills".to_string(), json!(report.missing_skills));

        Ok(Response::new(
            self.name(),
            render_summary(fit_score, &report),
            report
                .reasoning
                .clone()
                .unwrap_or_else(|| "No reasoning provided.".to_string()),
            confidence(fit_score, report.missing_skills.len()),
            Vec::new(),
            metadata,
        ))
    }

    async fn system_prompt(&self) -> String {
        self.agent.system_prompt().await
    }

    async fn update_system_prompt(&self, prompt: String) {
        self.agent.update_system_prompt(prompt).await;
    }
}

/// fit/100 minus a small penalty per missing skill, kept within [0.3, 0.95].
fn confidence(fit_score: u32, missing_skills: usize) -> f64 {
    let base = fit_score as f64 / 100.0;
    (base - missing_skills as f64 * MISSING_SKILL_PENALTY).clamp(MIN_CONFIDENCE, MAX_CONFIDENCE)
}

fn render_summary(fit_score: u32, report: &AlignmentReport) -> String {
    let mut summary = format!(
        "Job Alignment Summary\n\
         ---------------------\n\
         Fit Score: {fit_score}/100\n\n\
         Matched Skills:\n{}\n\n\
         Missing Skills:\n{}",
        report.skills_match.join(", "),
        report.missing_skills.join(", "),
    );
    if let Some(experience) = &report.experience_match {
        summary.push_str(&format!("\n\nExperience:\n{experience}"));
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::testing::ScriptedGenerator;

    #[test]
    fn test_confidence_is_clamped() {
        assert_eq!(confidence(100, 0), MAX_CONFIDENCE);
        assert_eq!(confidence(10, 5), MIN_CONFIDENCE);
        assert!((confidence(78, 2) - 0.74).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_structured_output_becomes_summary_and_metadata() {
        let raw = r#"{
            "skillsMatch": ["Rust", "Postgres"],
            "missingSkills": ["AWS", "Kubernetes"],
            "experienceMatch": "Strong backend experience",
            "fitScore": 78,
            "reasoning": "Good backend alignment but missing cloud exposure."
        }"#;
        let agent = JobAlignmentAgent::new(Arc::new(ScriptedGenerator::replying(raw)));
        let mut ctx = SessionContext::new("s", "u");

        let response = agent.process("resume + jd", &mut ctx).await.unwrap();

        assert!(response.content.contains("Fit Score: 78/100"));
        assert!(response.content.contains("AWS, Kubernetes"));
        assert_eq!(response.audit_metadata["fitScore"], 78);
        assert_eq!(response.reasoning, "Good backend alignment but missing cloud exposure.");
        assert!((response.confidence_score - 0.74).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_prose_output_degrades_to_raw_text() {
        let agent = JobAlignmentAgent::new(Arc::new(ScriptedGenerator::replying("Looks like a decent match.")));
        let mut ctx = SessionContext::new("s", "u");

        let response = agent.process("resume", &mut ctx).await.unwrap();

        assert_eq!(response.content, "Looks like a decent match.");
        assert_eq!(response.confidence_score, 0.5);
    }

    #[tokio::test]
    async fn test_pinned_job_description_is_prepended() {
        let generator = Arc::new(ScriptedGenerator::replying("{}"));
        let agent = JobAlignmentAgent::new(generator.clone());
        let mut ctx = SessionContext::new("s", "u");
        ctx.shared_memory
            .insert(JOB_DESCRIPTION_KEY.to_string(), json!("Senior Rust Engineer"));

        agent.process("my resume", &mut ctx).await.unwrap();

        assert!(generator.calls()[0].1.starts_with("Job description:\nSenior Rust Engineer"));
    }
}
