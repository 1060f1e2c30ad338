//! Intent routing: maps free-text input plus conversation context to an
//! ordered sequence of capability names.
//!
//! Hybrid strategy: keyword rules first; when none match, the language model
//! classifies the request. Model output is validated against the live registry
//! and any failure falls back to the default capability. Routing never errors.

pub mod prompts;
pub mod rules;

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::capabilities::{CapabilityRegistry, DEFAULT_CAPABILITY};
use crate::llm_client::extract::extract_json_array;
use crate::llm_client::TextGenerator;
use crate::models::SessionContext;

use self::prompts::{intent_system, INTENT_PROMPT_TEMPLATE};
use self::rules::{match_rules, Rule};

/// Where a routing decision came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteSource {
    Rule(Rule),
    Model,
    Default,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDecision {
    pub capabilities: Vec<String>,
    pub source: RouteSource,
}

pub struct IntentRouter {
    generator: Arc<dyn TextGenerator>,
    registry: Arc<CapabilityRegistry>,
}

impl IntentRouter {
    pub fn new(generator: Arc<dyn TextGenerator>, registry: Arc<CapabilityRegistry>) -> Self {
        Self {
            generator,
            registry,
        }
    }

    /// Ordered capability names for `input`.
    pub async fn classify(&self, input: &str, context: &SessionContext) -> Vec<String> {
        self.decide(input, context).await.capabilities
    }

    pub async fn decide(&self, input: &str, context: &SessionContext) -> RouteDecision {
        if let Some((rule, names)) = match_rules(input, context.history().is_empty()) {
            debug!(?rule, ?names, "Routed by keyword rule");
            return RouteDecision {
                capabilities: names.into_iter().map(str::to_string).collect(),
                source: RouteSource::Rule(rule),
            };
        }

        let classified = self.classify_with_model(input, context).await;
        if classified.is_empty() {
            info!("Model-assisted routing produced nothing usable; using {DEFAULT_CAPABILITY}");
            return RouteDecision {
                capabilities: vec![DEFAULT_CAPABILITY.to_string()],
                source: RouteSource::Default,
            };
        }

        info!(capabilities = ?classified, "Routed by model-assisted classification");
        RouteDecision {
            capabilities: classified,
            source: RouteSource::Model,
        }
    }

    /// Asks the model for a JSON array of names and keeps those registered.
    /// Any failure yields an empty list.
    async fn classify_with_model(&self, input: &str, context: &SessionContext) -> Vec<String> {
        let prompt = INTENT_PROMPT_TEMPLATE
            .replace("{capabilities}", &self.registry.names().join(", "))
            .replace("{history}", &history_summary(context))
            .replace("{input}", input);

        let raw = match self.generator.generate(&intent_system(), &prompt).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Intent classification call failed: {e}");
                return Vec::new();
            }
        };

        let Some(names) = extract_json_array::<Vec<String>>(&raw) else {
            warn!("Intent classification returned no parseable array");
            return Vec::new();
        };

        names
            .into_iter()
            .filter(|name| {
                let known = self.registry.contains(name);
                if !known {
                    debug!("Dropping unregistered capability '{name}' from model routing");
                }
                known
            })
            .collect()
    }
}

fn history_summary(context: &SessionContext) -> String {
    match context.history().len() {
        0 => "no prior responses".to_string(),
        1 => "1 prior response".to_string(),
        n => format!("{n} prior responses"),
    }
}
