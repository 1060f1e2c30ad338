use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

use crate::auth::CallerIdentity;
use crate::documents::{extract_text, DocumentKind};
use crate::errors::AppError;
use crate::models::{Response, SessionContext};
use crate::state::AppState;

/// Request text used for an upload sent without a message.
const DEFAULT_UPLOAD_REQUEST: &str = "Please review my resume";

#[derive(Deserialize)]
pub struct SessionQuery {
    pub session_id: String,
}

#[derive(Serialize)]
pub struct SessionCreatedResponse {
    pub session_id: String,
}

#[derive(Serialize)]
pub struct SessionView {
    pub session_id: String,
    pub owner_id: String,
    pub shared_memory: Map<String, Value>,
    pub decision_trace: Vec<String>,
    pub history: Vec<Response>,
}

impl From<SessionContext> for SessionView {
    fn from(context: SessionContext) -> Self {
        Self {
            owner_id: context.owner_id().to_string(),
            history: context.history().to_vec(),
            session_id: context.session_id,
            shared_memory: context.shared_memory,
            decision_trace: context.decision_trace,
        }
    }
}

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
    CallerIdentity(user): CallerIdentity,
) -> (StatusCode, Json<SessionCreatedResponse>) {
    let session_id = state.sessions.create(&user).await;
    let active_sessions = state.sessions.len().await;
    info!(active_sessions, "Session minted");
    (StatusCode::CREATED, Json(SessionCreatedResponse { session_id }))
}

/// POST /api/v1/chat?session_id=
/// A blank body is routed like any other message (to the default capability).
pub async fn handle_chat(
    State(state): State<AppState>,
    CallerIdentity(user): CallerIdentity,
    Query(params): Query<SessionQuery>,
    body: String,
) -> Result<Json<Response>, AppError> {
    run_turn(&state, &params.session_id, &user, &body, &body).await.map(Json)
}

/// POST /api/v1/chat/upload?session_id=
/// Multipart: `file` (PDF or plain text), optional `message`.
pub async fn handle_chat_upload(
    State(state): State<AppState>,
    CallerIdentity(user): CallerIdentity,
    Query(params): Query<SessionQuery>,
    mut multipart: Multipart,
) -> Result<Json<Response>, AppError> {
    let mut message = String::new();
    let mut resume_text = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let kind = DocumentKind::detect(field.file_name(), field.content_type())?;
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("could not read file: {e}")))?;
                resume_text = Some(extract_text(kind, data).await?);
            }
            "message" => {
                message = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("could not read message: {e}")))?;
            }
            _ => {}
        }
    }

    let resume_text =
        resume_text.ok_or_else(|| AppError::Validation("missing 'file' field".to_string()))?;

    // Intent comes from what the user asked, not from the resume body.
    let request = match message.trim() {
        "" => DEFAULT_UPLOAD_REQUEST,
        trimmed => trimmed,
    };
    let input = format!("{request}\n\n{resume_text}");

    run_turn(&state, &params.session_id, &user, request, &input)
        .await
        .map(Json)
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    CallerIdentity(user): CallerIdentity,
    Path(session_id): Path<String>,
) -> Result<Json<SessionView>, AppError> {
    let snapshot = state.sessions.snapshot(&session_id, &user).await?;
    Ok(Json(snapshot.into()))
}

/// PUT /api/v1/sessions/:id/memory
/// Merges the object's keys into shared memory and returns the result.
pub async fn handle_put_memory(
    State(state): State<AppState>,
    CallerIdentity(user): CallerIdentity,
    Path(session_id): Path<String>,
    Json(patch): Json<Value>,
) -> Result<Json<Map<String, Value>>, AppError> {
    let Value::Object(patch) = patch else {
        return Err(AppError::Validation(
            "memory update must be a JSON object".to_string(),
        ));
    };

    let mut session = state.sessions.acquire(&session_id, &user).await?;
    for (key, value) in patch {
        session.shared_memory.insert(key, value);
    }
    Ok(Json(session.shared_memory.clone()))
}

/// Holds the session lock for the whole orchestration. `route_input` is what
/// intent is classified from; `input` is what the capabilities receive.
async fn run_turn(
    state: &AppState,
    session_id: &str,
    user: &str,
    route_input: &str,
    input: &str,
) -> Result<Response, AppError> {
    let mut session = state.sessions.acquire(session_id, user).await?;
    info!(session_id, user, chars = input.len(), "Chat turn received");

    let response = state
        .orchestrator
        .orchestrate_routed_with_timeout(
            route_input,
            input,
            &mut session,
            state.config.orchestration_timeout,
        )
        .await?;
    Ok(response)
}
