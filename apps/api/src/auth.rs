//! Caller identity. Credential verification proper belongs to the auth layer in
//! front of this service; here a bearer token is mapped to a user id through a
//! static table, or every caller is `local-dev-user` when auth is disabled.

use std::collections::HashMap;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use tracing::debug;

use crate::errors::AppError;
use crate::state::AppState;

pub const LOCAL_DEV_USER: &str = "local-dev-user";

#[derive(Debug, Clone)]
pub struct IdentityResolver {
    disabled: bool,
    tokens: HashMap<String, String>,
}

impl IdentityResolver {
    pub fn new(disabled: bool, tokens: HashMap<String, String>) -> Self {
        Self { disabled, tokens }
    }

    /// Resolves an `Authorization` header value to a user id.
    pub fn resolve(&self, authorization: Option<&str>) -> Option<String> {
        if self.disabled {
            return Some(LOCAL_DEV_USER.to_string());
        }
        let token = authorization?.strip_prefix("Bearer ")?.trim();
        self.tokens.get(token).cloned()
    }
}

/// The authenticated caller of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity(pub String);

#[async_trait]
impl FromRequestParts<AppState> for CallerIdentity {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok());

        match state.identities.resolve(header) {
            Some(user) => Ok(CallerIdentity(user)),
            None => {
                debug!("Rejected request without a valid bearer token");
                Err(AppError::Unauthorized)
            }
        }
    }
}
