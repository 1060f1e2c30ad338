//! Content strength analysis: skills, achievements and faithful rephrasing.
//!
//! The raw model text is returned as `content` so the governance auditor can
//! re-parse the payload independently; the self-reported risk is only a seed.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use super::prompts::CONTENT_STRENGTH_SYSTEM;
use super::{Capability, CapabilityError, PromptedAgent};
use crate::llm_client::extract::extract_json_object;
use crate::llm_client::TextGenerator;
use crate::models::{AuditMetadata, Response, SessionContext};

const SECTIONS: [&str; 3] = ["skills", "achievements", "suggestions"];

pub struct ContentStrengthAgent {
    agent: PromptedAgent,
}

impl ContentStrengthAgent {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            agent: PromptedAgent::new("ContentStrengthAgent", CONTENT_STRENGTH_SYSTEM, generator),
        }
    }
}

#[async_trait]
impl Capability for ContentStrengthAgent {
    fn name(&self) -> &str {
        self.agent.name()
    }

    async fn process(
        &self,
        input: &str,
        _context: &mut SessionContext,
    ) -> Result<Response, CapabilityError> {
        let raw = self.agent.call(input).await?;
        let payload = extract_json_object(&raw).unwrap_or_else(|| json!({}));

        let overall_confidence = overall_confidence(&payload);
        let hallucination_risk = payload
            .get("hallucinationRisk")
            .and_then(Value::as_f64)
            .unwrap_or(0.0);
        let summary = payload
            .get("summary")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        debug!(
            skills = section_len(&payload, "skills"),
            achievements = section_len(&payload, "achievements"),
            suggestions = section_len(&payload, "suggestions"),
            hallucination_risk,
            "Content strength analysis parsed"
        );

        let mut metadata = AuditMetadata::new();
        metadata.insert("hallucinationRisk".to_string(), json!(hallucination_risk));
        metadata.insert("overallConfidence".to_string(), json!(overall_confidence));

        Ok(Response::new(
            self.name(),
            raw,
            summary,
            overall_confidence,
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

/// Mean of the per-section average `confidenceScore`, over non-empty sections.
fn overall_confidence(payload: &Value) -> f64 {
    let averages: Vec<f64> = SECTIONS
        .iter()
        .filter(|section| section_len(payload, section) > 0)
        .map(|section| section_average(payload, section))
        .collect();

    if averages.is_empty() {
        0.0
    } else {
        averages.iter().sum::<f64>() / averages.len() as f64
    }
}

fn section_average(payload: &Value, section: &str) -> f64 {
    let scores: Vec<f64> = payload
        .get(section)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.get("confidenceScore").and_then(Value::as_f64))
                .collect()
        })
        .unwrap_or_default();

    if scores.is_empty() {
        0.0
    } else {
        scores.iter().sum::<f64>() / scores.len() as f64
    }
}

fn section_len(payload: &Value, section: &str) -> usize {
    payload
        .get(section)
        .and_then(Value::as_array)
        .map(Vec::len)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::testing::ScriptedGenerator;

    const PAYLOAD: &str = r#"Here you go:
    {
      "skills": [{"name": "Rust", "confidenceScore": 0.9}, {"name": "SQL", "confidenceScore": 0.7}],
      "achievements": [{"description": "Cut latency", "confidenceScore": 0.6}],
      "suggestions": [],
      "hallucinationRisk": 0.25,
      "summary": "Solid backend profile."
    }"#;

    #[test]
    fn test_overall_confidence_ignores_empty_sections() {
        let payload = extract_json_object(PAYLOAD).unwrap();
        // skills avg 0.8, achievements 0.6, suggestions empty → (0.8 + 0.6) / 2
        assert!((overall_confidence(&payload) - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_overall_confidence_of_empty_payload_is_zero() {
        assert_eq!(overall_confidence(&json!({})), 0.0);
    }

    #[tokio::test]
    async fn test_process_seeds_risk_and_keeps_raw_content() {
        let agent = ContentStrengthAgent::new(Arc::new(ScriptedGenerator::replying(PAYLOAD)));
        let mut ctx = SessionContext::new("s", "u");

        let response = agent.process("resume text", &mut ctx).await.unwrap();

        assert_eq!(response.content, PAYLOAD);
        assert_eq!(response.reasoning, "Solid backend profile.");
        assert_eq!(response.metadata_f64("hallucinationRisk"), Some(0.25));
        assert!((response.confidence_score - 0.7).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_unparseable_output_yields_zero_confidence() {
        let agent = ContentStrengthAgent::new(Arc::new(ScriptedGenerator::replying("no json")));
        let mut ctx = SessionContext::new("s", "u");

        let response = agent.process("resume text", &mut ctx).await.unwrap();

        assert_eq!(response.confidence_score, 0.0);
        assert_eq!(response.content, "no json");
    }
}
