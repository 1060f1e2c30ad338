use std::sync::Arc;

use crate::auth::IdentityResolver;
use crate::config::Config;
use crate::orchestration::session_store::SessionStore;
use crate::orchestration::Orchestrator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub orchestrator: Arc<Orchestrator>,
    /// In-memory conversations, one lock per session.
    pub sessions: Arc<SessionStore>,
    pub identities: Arc<IdentityResolver>,
}
