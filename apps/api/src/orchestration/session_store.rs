//! Process-wide in-memory session store.
//!
//! Each session sits behind its own async mutex: at most one orchestration per
//! session is in flight, while different sessions proceed in parallel.
//! Ownership is bound when the session is first touched and checked before
//! waiting on the lock.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::SessionContext;

pub type SessionGuard = OwnedMutexGuard<SessionContext>;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session '{session_id}' belongs to a different user")]
    OwnershipViolation { session_id: String },

    #[error("session '{0}' not found")]
    NotFound(String),
}

struct SessionSlot {
    owner_id: String,
    context: Arc<Mutex<SessionContext>>,
}

#[derive(Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<String, SessionSlot>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mints a fresh session bound to `owner_id`.
    pub async fn create(&self, owner_id: &str) -> String {
        let session_id = Uuid::new_v4().to_string();
        self.insert_slot(&session_id, owner_id).await;
        session_id
    }

    /// Returns exclusive access to the session, creating it on first touch.
    /// Waits while another orchestration holds the same session.
    pub async fn acquire(&self, session_id: &str, caller: &str) -> Result<SessionGuard, SessionError> {
        let context = {
            let mut sessions = self.sessions.lock().await;
            let slot = sessions.entry(session_id.to_string()).or_insert_with(|| {
                info!(session_id, owner = caller, "Session created");
                SessionSlot::new(session_id, caller)
            });
            check_owner(slot, session_id, caller)?;
            slot.context.clone()
        };
        Ok(context.lock_owned().await)
    }

    /// Copy of an existing session for read-only inspection.
    pub async fn snapshot(&self, session_id: &str, caller: &str) -> Result<SessionContext, SessionError> {
        let context = {
            let sessions = self.sessions.lock().await;
            let slot = sessions
                .get(session_id)
                .ok_or_else(|| SessionError::NotFound(session_id.to_string()))?;
            check_owner(slot, session_id, caller)?;
            slot.context.clone()
        };
        let snapshot = context.lock().await.clone();
        Ok(snapshot)
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    async fn insert_slot(&self, session_id: &str, owner_id: &str) {
        info!(session_id, owner = owner_id, "Session created");
        self.sessions
            .lock()
            .await
            .insert(session_id.to_string(), SessionSlot::new(session_id, owner_id));
    }
}

impl SessionSlot {
    fn new(session_id: &str, owner_id: &str) -> Self {
        Self {
            owner_id: owner_id.to_string(),
            context: Arc::new(Mutex::new(SessionContext::new(session_id, owner_id))),
        }
    }
}

fn check_owner(slot: &SessionSlot, session_id: &str, caller: &str) -> Result<(), SessionError> {
    if slot.owner_id == caller {
        Ok(())
    } else {
        warn!(session_id, caller, "Rejected access to session owned by another user");
        Err(SessionError::OwnershipViolation {
            session_id: session_id.to_string(),
        })
    }
}
