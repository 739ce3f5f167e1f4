//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps domain errors from nebula-core, nebula-state, nebula-store and
//! nebula-agentic to HTTP status codes with a JSON body. Internal error
//! details are logged, never returned.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use nebula_agentic::TransitionError;
use nebula_core::ValidationError;
use nebula_state::LifecycleError;
use nebula_store::StoreError;

/// Structured JSON error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "NOT_FOUND", "CONFLICT").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Additional details, present only for client errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Application-level error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Request validation failed (422).
    #[error("validation error: {0}")]
    Validation(String),

    /// Request body could not be parsed (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Missing or invalid caller identity (401).
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The caller lacks the role a transition requires (403).
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Conflict with the bounty's current status (409). `details` lists the
    /// legal targets when known.
    #[error("conflict: {message}")]
    Conflict {
        message: String,
        details: Option<serde_json::Value>,
    },

    /// Internal server error (500). Message is logged but not returned.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
            details: None,
        }
    }

    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            Self::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            Self::Conflict { .. } => (StatusCode::CONFLICT, "CONFLICT"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        if matches!(&self, Self::Internal(_)) {
            tracing::error!(error = %self, "internal server error");
        }

        let message = match &self {
            Self::Internal(_) => "An internal error occurred".to_string(),
            other => other.to_string(),
        };
        let details = match self {
            Self::Conflict { details, .. } => details,
            _ => None,
        };

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                details,
            },
        };
        (status, Json(body)).into_response()
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => Self::NotFound(format!("bounty {id} not found")),
            StoreError::StatusChanged { .. } | StoreError::WorkerOnOpenBounty(_) => {
                Self::conflict(err.to_string())
            }
            StoreError::EmptyMessage | StoreError::InvalidRecord(_) => {
                Self::Validation(err.to_string())
            }
            StoreError::Unavailable(_) => Self::Internal(err.to_string()),
        }
    }
}

impl From<LifecycleError> for AppError {
    fn from(err: LifecycleError) -> Self {
        match &err {
            LifecycleError::InvalidTransition { from, .. } => {
                let legal: Vec<&str> = from
                    .valid_transitions()
                    .iter()
                    .map(|s| s.as_str())
                    .collect();
                Self::Conflict {
                    message: err.to_string(),
                    details: Some(serde_json::json!({ "valid_transitions": legal })),
                }
            }
            LifecycleError::GuardRejected { .. } => Self::Forbidden(err.to_string()),
        }
    }
}

impl From<TransitionError> for AppError {
    fn from(err: TransitionError) -> Self {
        match err {
            TransitionError::NotFound(id) => Self::NotFound(format!("bounty {id} not found")),
            TransitionError::Rejected(err) => err.into(),
            TransitionError::Stale { .. } => Self::conflict(err.to_string()),
            TransitionError::Store(err) => err.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nebula_core::{ActorId, BountyId};
    use nebula_state::{BountyStatus, Guard};

    #[test]
    fn status_codes() {
        let cases = [
            (AppError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (AppError::Validation("x".into()), StatusCode::UNPROCESSABLE_ENTITY),
            (AppError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
            (AppError::Unauthorized("x".into()), StatusCode::UNAUTHORIZED),
            (AppError::Forbidden("x".into()), StatusCode::FORBIDDEN),
            (AppError::conflict("x"), StatusCode::CONFLICT),
            (AppError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn invalid_transition_is_conflict_with_legal_targets() {
        let err: AppError = LifecycleError::InvalidTransition {
            from: BountyStatus::Open,
            to: BountyStatus::Completed,
        }
        .into();
        match err {
            AppError::Conflict { details: Some(details), .. } => {
                assert_eq!(details["valid_transitions"], serde_json::json!(["in-progress"]));
            }
            other => panic!("expected conflict, got {other:?}"),
        }
    }

    #[test]
    fn guard_rejection_is_forbidden() {
        let err: AppError = LifecycleError::GuardRejected {
            from: BountyStatus::PendingReview,
            to: BountyStatus::Completed,
            actor: ActorId::new("user1").unwrap(),
            guard: Guard::Creator,
        }
        .into();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[test]
    fn store_outage_is_internal() {
        let err: AppError = StoreError::Unavailable("db down".into()).into();
        assert!(matches!(err, AppError::Internal(_)));
        let err: AppError = StoreError::NotFound(BountyId::sequential(9)).into();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
