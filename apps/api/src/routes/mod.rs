pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::capabilities::handlers as agents;
use crate::governance::handlers as governance;
use crate::orchestration::handlers as sessions;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Conversations
        .route("/api/v1/sessions", post(sessions::handle_create_session))
        .route("/api/v1/sessions/:id", get(sessions::handle_get_session))
        .route(
            "/api/v1/sessions/:id/memory",
            put(sessions::handle_put_memory),
        )
        .route("/api/v1/chat", post(sessions::handle_chat))
        .route("/api/v1/chat/upload", post(sessions::handle_chat_upload))
        // Capability introspection
        .route("/api/v1/agents", get(agents::handle_list_agents))
        .route(
            "/api/v1/agents/:name/prompt",
            put(agents::handle_update_prompt),
        )
        // Governance heuristics
        .route("/api/v1/governance/risk", post(governance::handle_risk))
        .with_state(state)
}
