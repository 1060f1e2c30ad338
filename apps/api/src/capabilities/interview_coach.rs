use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use super::prompts::INTERVIEW_COACH_SYSTEM;
use super::{Capability, CapabilityError, PromptedAgent};
use crate::llm_client::TextGenerator;
use crate::models::{AuditMetadata, Response, SessionContext};

const CONFIDENCE: f64 = 0.85;
const TURNS_KEY: &str = "interview_turns";

/// Mock-interview coaching. Counts coaching turns in shared memory so later
/// turns can be framed as a continuing session.
pub struct InterviewCoachAgent {
    agent: PromptedAgent,
}

impl InterviewCoachAgent {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            agent: PromptedAgent::new("InterviewCoachAgent", INTERVIEW_COACH_SYSTEM, generator),
        }
    }
}

#[async_trait]
impl Capability for InterviewCoachAgent {
    fn name(&self) -> &str {
        self.agent.name()
    }

    async fn process(
        &self,
        input: &str,
        context: &mut SessionContext,
    ) -> Result<Response, CapabilityError> {
        let previous_turns = context
            .shared_memory
            .get(TURNS_KEY)
            .and_then(|v| v.as_u64())
            .unwrap_or(0);

        let prompt = if previous_turns > 0 {
            format!("(Coaching turn {} of an ongoing session.)\n\n{input}", previous_turns + 1)
        } else {
            input.to_string()
        };

        let feedback = self.agent.call(&prompt).await?;
        context
            .shared_memory
            .insert(TURNS_KEY.to_string(), json!(previous_turns + 1));

        Ok(Response::new(
            self.name(),
            feedback,
            "Generated interview coaching feedback.",
            CONFIDENCE,
            Vec::new(),
            AuditMetadata::new(),
        ))
    }

    async fn system_prompt(&self) -> String {
        self.agent.system_prompt().await
    }

    async fn update_system_prompt(&self, prompt: String) {
        self.agent.update_system_prompt(prompt).await;
    }
}
