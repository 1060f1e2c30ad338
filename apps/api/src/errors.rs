use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::documents::DocumentError;
use crate::orchestration::session_store::SessionError;
use crate::orchestration::OrchestrationError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,

    #[error("Unknown capability: {0}")]
    UnknownCapability(String),

    #[error("Capability error: {0}")]
    Capability(String),

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<OrchestrationError> for AppError {
    fn from(err: OrchestrationError) -> Self {
        match err {
            OrchestrationError::UnknownCapability { .. } => {
                AppError::UnknownCapability(err.to_string())
            }
            OrchestrationError::Capability { .. } => AppError::Capability(err.to_string()),
            OrchestrationError::Timeout(_) => AppError::Timeout(err.to_string()),
            OrchestrationError::EmptyRoute => AppError::Internal(anyhow::anyhow!(err)),
        }
    }
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::OwnershipViolation { .. } => AppError::Forbidden,
            SessionError::NotFound(_) => AppError::NotFound(err.to_string()),
        }
    }
}

impl From<DocumentError> for AppError {
    fn from(err: DocumentError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Authentication required".to_string(),
            ),
            AppError::Forbidden => (
                StatusCode::FORBIDDEN,
                "FORBIDDEN",
                "Access denied".to_string(),
            ),
            AppError::UnknownCapability(msg) => {
                tracing::error!("Unknown capability: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "UNKNOWN_CAPABILITY",
                    msg.clone(),
                )
            }
            AppError::Capability(msg) => {
                tracing::error!("Capability error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "CAPABILITY_ERROR",
                    "An AI processing error occurred".to_string(),
                )
            }
            AppError::Timeout(msg) => {
                tracing::error!("Orchestration timeout: {msg}");
                (
                    StatusCode::GATEWAY_TIMEOUT,
                    "ORCHESTRATION_TIMEOUT",
                    msg.clone(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ownership_violation_maps_to_forbidden() {
        let err: AppError = SessionError::OwnershipViolation {
            session_id: "s".to_string(),
        }
        .into();
        assert_eq!(err.into_response().status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_unknown_capability_keeps_diagnostics() {
        let err: AppError = OrchestrationError::UnknownCapability {
            name: "SalaryAgent".to_string(),
            registered: vec!["ResumeCriticAgent".to_string()],
        }
        .into();
        let message = err.to_string();
        assert!(message.contains("SalaryAgent"));
        assert!(message.contains("ResumeCriticAgent"));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_timeout_maps_to_gateway_timeout() {
        let err: AppError = OrchestrationError::Timeout(std::time::Duration::from_secs(1)).into();
        assert_eq!(err.into_response().status(), StatusCode::GATEWAY_TIMEOUT);
    }
}
