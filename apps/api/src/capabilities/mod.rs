//! Capabilities: pluggable text-analysis units invoked by name.
//!
//! The orchestrator only sees `dyn Capability` handles resolved through the
//! `CapabilityRegistry`; adding or removing a capability means rebuilding the
//! registry, never type checks.

pub mod content_strength;
pub mod handlers;
pub mod interview_coach;
pub mod job_alignment;
pub mod prompts;
pub mod resume_critic;

#[cfg(test)]
pub mod testing;

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::llm_client::{LlmError, TextGenerator};
use crate::models::{Response, SessionContext};

pub use content_strength::ContentStrengthAgent;
pub use interview_coach::InterviewCoachAgent;
pub use job_alignment::JobAlignmentAgent;
pub use resume_critic::ResumeCriticAgent;

/// Used whenever routing produces nothing usable.
pub const DEFAULT_CAPABILITY: &str = "ResumeCriticAgent";

#[derive(Debug, Error)]
pub enum CapabilityError {
    #[error("language model call failed: {0}")]
    Llm(#[from] LlmError),
}

#[async_trait]
pub trait Capability: Send + Sync {
    /// Stable registry key; lookups are case-sensitive.
    fn name(&self) -> &str;

    async fn process(
        &self,
        input: &str,
        context: &mut SessionContext,
    ) -> Result<Response, CapabilityError>;

    async fn system_prompt(&self) -> String;

    async fn update_system_prompt(&self, prompt: String);
}

/// Name → handle. Built once, read-only afterwards.
#[derive(Clone, Default)]
pub struct CapabilityRegistry {
    capabilities: BTreeMap<String, Arc<dyn Capability>>,
}

impl CapabilityRegistry {
    pub fn new(capabilities: Vec<Arc<dyn Capability>>) -> Self {
        let capabilities = capabilities
            .into_iter()
            .map(|c| (c.name().to_string(), c))
            .collect();
        Self { capabilities }
    }

    /// The four LLM-backed capabilities sharing one generator.
    pub fn with_defaults(generator: Arc<dyn TextGenerator>) -> Self {
        Self::new(vec![
            Arc::new(ResumeCriticAgent::new(generator.clone())),
            Arc::new(ContentStrengthAgent::new(generator.clone())),
            Arc::new(JobAlignmentAgent::new(generator.clone())),
            Arc::new(InterviewCoachAgent::new(generator)),
        ])
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Capability>> {
        self.capabilities.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.capabilities.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<String> {
        self.capabilities.keys().cloned().collect()
    }

    /// Name → current system prompt.
    pub async fn describe(&self) -> BTreeMap<String, String> {
        let mut prompts = BTreeMap::new();
        for (name, capability) in &self.capabilities {
            prompts.insert(name.clone(), capability.system_prompt().await);
        }
        prompts
    }
}

/// Shared plumbing for capabilities backed by a single model call: a name, a
/// replaceable system prompt and the generator.
pub struct PromptedAgent {
    name: &'static str,
    system_prompt: RwLock<String>,
    generator: Arc<dyn TextGenerator>,
}

impl PromptedAgent {
    pub fn new(name: &'static str, system_prompt: &str, generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            name,
            system_prompt: RwLock::new(system_prompt.to_string()),
            generator,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub async fn system_prompt(&self) -> String {
        self.system_prompt.read().await.clone()
    }

    pub async fn update_system_prompt(&self, prompt: String) {
        *self.system_prompt.write().await = prompt;
    }

    /// Runs the model with the current system prompt.
    pub async fn call(&self, input: &str) -> Result<String, CapabilityError> {
        let system = self.system_prompt().await;
        Ok(self.generator.generate(&system, input).await?)
    }
}
