mod auth;
mod capabilities;
mod config;
mod documents;
mod errors;
mod governance;
mod llm_client;
mod models;
mod orchestration;
mod routes;
mod routing;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::IdentityResolver;
use crate::capabilities::CapabilityRegistry;
use crate::config::Config;
use crate::governance::GovernanceAuditor;
use crate::llm_client::{LlmClient, TextGenerator};
use crate::orchestration::session_store::SessionStore;
use crate::orchestration::Orchestrator;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Coach API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let generator: Arc<dyn TextGenerator> =
        Arc::new(LlmClient::new(config.anthropic_api_key.clone())?);
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let registry = Arc::new(CapabilityRegistry::with_defaults(generator.clone()));
    info!("Capabilities registered: {}", registry.names().join(", "));

    let orchestrator = Arc::new(Orchestrator::new(
        registry,
        generator,
        GovernanceAuditor::default(),
    ));

    if config.auth_disabled {
        warn!("AUTH_DISABLED is set; all requests run as {}", auth::LOCAL_DEV_USER);
    } else if config.api_tokens.is_empty() {
        warn!("API_TOKENS is empty; every authenticated route will return 401");
    }

    // Build app state
    let state = AppState {
        identities: Arc::new(IdentityResolver::new(
            config.auth_disabled,
            config.api_tokens.clone(),
        )),
        orchestrator,
        sessions: Arc::new(SessionStore::new()),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
