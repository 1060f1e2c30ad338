//! Test doubles for the model client and capabilities.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{Capability, CapabilityError};
use crate::llm_client::{LlmError, TextGenerator};
use crate::models::{AuditMetadata, Response, SessionContext};

/// Replays queued outputs in order and records every `(system, user)` pair.
/// An exhausted script behaves like a failing model.
pub struct ScriptedGenerator {
    outputs: Mutex<VecDeque<Result<String, LlmError>>>,
    calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedGenerator {
    pub fn new(outputs: Vec<Result<String, LlmError>>) -> Self {
        Self {
            outputs: Mutex::new(outputs.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn replying(text: &str) -> Self {
        Self::new(vec![Ok(text.to_string())])
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, system: &str, user: &str) -> Result<String, LlmError> {
        self.calls
            .lock()
            .unwrap()
            .push((system.to_string(), user.to_string()));
        self.outputs
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(LlmError::EmptyContent))
    }
}

/// Echoes a fixed response and records the inputs it was given.
pub struct ScriptedCapability {
    name: String,
    confidence: f64,
    content: Option<String>,
    fail: bool,
    delay: Option<Duration>,
    prompt: RwLock<String>,
    inputs: Arc<Mutex<Vec<String>>>,
}

impl ScriptedCapability {
    pub fn new(name: &str, confidence: f64) -> Self {
        Self {
            name: name.to_string(),
            confidence,
            content: None,
            fail: false,
            delay: None,
            prompt: RwLock::new(format!("prompt for {name}")),
            inputs: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_content(mut self, content: &str) -> Self {
        self.content = Some(content.to_string());
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Shared view of every input this capability received.
    pub fn inputs(&self) -> Arc<Mutex<Vec<String>>> {
        self.inputs.clone()
    }
}

#[async_trait]
impl Capability for ScriptedCapability {
    fn name(&self) -> &str {
        &self.name
    }

    async fn process(
        &self,
        input: &str,
        _context: &mut SessionContext,
    ) -> Result<Response, CapabilityError> {
        self.inputs.lock().unwrap().push(input.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err(CapabilityError::Llm(LlmError::Api {
                status: 500,
                message: format!("{} failed", self.name),
            }));
        }
        let content = self
            .content
            .clone()
            .unwrap_or_else(|| format!("{} output", self.name));
        Ok(Response::new(
            self.name.clone(),
            content,
            "scripted",
            self.confidence,
            vec![],
            AuditMetadata::new(),
        ))
    }

    async fn system_prompt(&self) -> String {
        self.prompt.read().await.clone()
    }

    async fn update_system_prompt(&self, prompt: String) {
        *self.prompt.write().await = prompt;
    }
}
