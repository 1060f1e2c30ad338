use std::collections::BTreeMap;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use tracing::info;

use crate::auth::CallerIdentity;
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct PromptUpdateRequest {
    pub system_prompt: String,
}

/// GET /api/v1/agents
/// Capability name → current system prompt.
pub async fn handle_list_agents(
    State(state): State<AppState>,
    _caller: CallerIdentity,
) -> Json<BTreeMap<String, String>> {
    Json(state.orchestrator.registry().describe().await)
}

/// PUT /api/v1/agents/:name/prompt
pub async fn handle_update_prompt(
    State(state): State<AppState>,
    CallerIdentity(user): CallerIdentity,
    Path(name): Path<String>,
    Json(req): Json<PromptUpdateRequest>,
) -> Result<Json<BTreeMap<String, String>>, AppError> {
    if req.system_prompt.trim().is_empty() {
        return Err(AppError::Validation("system_prompt must not be empty".to_string()));
    }

    let capability = state
        .orchestrator
        .registry()
        .get(&name)
        .ok_or_else(|| AppError::NotFound(format!("agent '{name}'")))?;

    capability.update_system_prompt(req.system_prompt).await;
    info!(agent = %name, user = %user, "System prompt updated");

    Ok(Json(BTreeMap::from([(
        name,
        capability.system_prompt().await,
    )])))
}
