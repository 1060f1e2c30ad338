//! Orchestration engine: the single request entry point.
//!
//! Flow per call: classify intent → resolve every routed capability → for each
//! step: process → append trace line → governance audit → record in session →
//! chain output into the next step's input. Steps run strictly in sequence and
//! nothing here retries.

pub mod handlers;
pub mod session_store;

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{info, warn};

use crate::capabilities::{Capability, CapabilityError, CapabilityRegistry, DEFAULT_CAPABILITY};
use crate::governance::{GovernanceAuditor, STATUS_FLAGGED};
use crate::llm_client::TextGenerator;
use crate::models::{Response, SessionContext};
use crate::routing::IntentRouter;

#[derive(Debug, Error)]
pub enum OrchestrationError {
    #[error("no capability registered as '{name}' (registry: [{}])", .registered.join(", "))]
    UnknownCapability {
        name: String,
        registered: Vec<String>,
    },

    #[error("capability '{name}' failed: {source}")]
    Capability {
        name: String,
        #[source]
        source: CapabilityError,
    },

    #[error("orchestration timed out after {0:?}")]
    Timeout(Duration),

    #[error("routing produced no capabilities")]
    EmptyRoute,
}

pub struct Orchestrator {
    registry: Arc<CapabilityRegistry>,
    router: IntentRouter,
    auditor: GovernanceAuditor,
}

impl Orchestrator {
    pub fn new(
        registry: Arc<CapabilityRegistry>,
        generator: Arc<dyn TextGenerator>,
        auditor: GovernanceAuditor,
    ) -> Self {
        Self {
            router: IntentRouter::new(generator, registry.clone()),
            registry,
            auditor,
        }
    }

    pub fn registry(&self) -> &CapabilityRegistry {
        &self.registry
    }

    /// Runs the routed chain and returns the last audited response.
    ///
    /// Every routed name is resolved before any capability runs, so an unknown
    /// name aborts with the session untouched. A capability failure aborts the
    /// chain; steps already completed stay recorded.
    pub async fn orchestrate(
        &self,
        input: &str,
        context: &mut SessionContext,
    ) -> Result<Response, OrchestrationError> {
        self.orchestrate_routed(input, input, context).await
    }

    /// Like `orchestrate`, but intent is classified from `route_input` alone
    /// while every step still receives `input`.
    pub async fn orchestrate_routed(
        &self,
        route_input: &str,
        input: &str,
        context: &mut SessionContext,
    ) -> Result<Response, OrchestrationError> {
        let mut names = self.router.classify(route_input, context).await;
        if names.is_empty() {
            names.push(DEFAULT_CAPABILITY.to_string());
        }

        let steps = self.resolve(&names)?;
        let step_count = steps.len();
        let mut current_input = input.to_string();
        let mut final_response = None;

        for (index, (name, capability)) in steps.into_iter().enumerate() {
            info!(
                session_id = %context.session_id,
                step = index + 1,
                of = step_count,
                capability = %name,
                "Invoking capability"
            );

            let mut response = capability
                .process(&current_input, context)
                .await
                .map_err(|source| OrchestrationError::Capability {
                    name: name.clone(),
                    source,
                })?;

            let mut trace = context.decision_trace.clone();
            trace.push(format!(
                "Orchestrator: Routed to {name} based on intent analysis."
            ));
            response.decision_trace = trace.clone();

            let audited = self.auditor.audit(response, Some(&current_input));
            if audited.audit_status() == Some(STATUS_FLAGGED) {
                warn!(
                    session_id = %context.session_id,
                    capability = %name,
                    flags = ?audited.audit_flags(),
                    hallucination_risk = ?audited.metadata_f64("hallucinationRisk"),
                    "Response flagged for human review"
                );
            }

            context.add_to_history(audited.clone());
            context.decision_trace = trace;

            if index + 1 < step_count {
                current_input = chain_input(input, &name, &audited.content);
            }
            final_response = Some(audited);
        }

        final_response.ok_or(OrchestrationError::EmptyRoute)
    }

    /// `orchestrate` bounded by a caller-level timeout. A timeout is fatal and
    /// returns no partial result.
    pub async fn orchestrate_with_timeout(
        &self,
        input: &str,
        context: &mut SessionContext,
        timeout: Duration,
    ) -> Result<Response, OrchestrationError> {
        self.orchestrate_routed_with_timeout(input, input, context, timeout)
            .await
    }

    /// `orchestrate_routed` bounded by a caller-level timeout.
    pub async fn orchestrate_routed_with_timeout(
        &self,
        route_input: &str,
        input: &str,
        context: &mut SessionContext,
        timeout: Duration,
    ) -> Result<Response, OrchestrationError> {
        tokio::time::timeout(timeout, self.orchestrate_routed(route_input, input, context))
            .await
            .map_err(|_| OrchestrationError::Timeout(timeout))?
    }

    fn resolve(
        &self,
        names: &[String],
    ) -> Result<Vec<(String, Arc<dyn Capability>)>, OrchestrationError> {
        names
            .iter()
            .map(|name| {
                self.registry
                    .get(name)
                    .map(|capability| (name.clone(), capability))
                    .ok_or_else(|| OrchestrationError::UnknownCapability {
                        name: name.clone(),
                        registered: self.registry.names(),
                    })
            })
            .collect()
    }
}

/// Input for the step after `previous`: the original request, the previous
/// output, and an instruction to continue.
pub fn chain_input(original_input: &str, previous: &str, previous_content: &str) -> String {
    format!(
        "{original_input}\n\n\
         --- Output from {previous} ---\n\
         {previous_content}\n\
         --- End of {previous} output ---\n\n\
         Continue the analysis using the context above."
    )
}
