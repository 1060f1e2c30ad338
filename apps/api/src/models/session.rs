use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::response::Response;

/// Per-conversation state. Mutated only by the orchestrator (through capability
/// execution and audit) while it holds the session's lock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionContext {
    pub session_id: String,
    /// Bound at creation, never reassigned.
    owner_id: String,
    /// Open key-value store capabilities use for cross-turn state.
    pub shared_memory: Map<String, Value>,
    history: Vec<Response>,
    /// Mirrors the last response's cumulative trace.
    pub decision_trace: Vec<String>,
}

impl SessionContext {
    pub fn new(session_id: impl Into<String>, owner_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            owner_id: owner_id.into(),
            shared_memory: Map::new(),
            history: Vec::new(),
            decision_trace: Vec::new(),
        }
    }

    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    pub fn history(&self) -> &[Response] {
        &self.history
    }

    /// Appends to history. There is no way to remove entries.
    pub fn add_to_history(&mut self, response: Response) {
        self.history.push(response);
    }
}
