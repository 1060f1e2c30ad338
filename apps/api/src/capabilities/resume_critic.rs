use std::sync::Arc;

use async_trait::async_trait;

use super::prompts::RESUME_CRITIC_SYSTEM;
use super::{Capability, CapabilityError, PromptedAgent};
use crate::llm_client::prompts::FAITHFULNESS_INSTRUCTION;
use crate::llm_client::TextGenerator;
use crate::models::{AuditMetadata, Response, SessionContext};

const CONFIDENCE: f64 = 0.9;

/// Structural and ATS critique. Free-text output.
pub struct ResumeCriticAgent {
    agent: PromptedAgent,
}

impl ResumeCriticAgent {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        let prompt = format!("{RESUME_CRITIC_SYSTEM}\n\n{FAITHFULNESS_INSTRUCTION}");
        Self {
            agent: PromptedAgent::new("ResumeCriticAgent", &prompt, generator),
        }
    }
}

#[async_trait]
impl Capability for ResumeCriticAgent {
    fn name(&self) -> &str {
        self.agent.name()
    }

    async fn process(
        &self,
        input: &str,
        _context: &mut SessionContext,
    ) -> Result<Response, CapabilityError> {
        let critique = self.agent.call(input).await?;
        Ok(Response::new(
            self.name(),
            critique,
            "Analyzed resume structure and content impact.",
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
