use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;
use uuid::Uuid;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Business-rule violation on the pipeline graph. Never retried;
    /// the message is surfaced verbatim for user-facing copy.
    #[error("Invalid transition: cannot {attempted} while {from}")]
    InvalidTransition {
        from: String,
        attempted: &'static str,
    },

    #[error("Candidate {candidate_id} has already applied to job {job_id}")]
    DuplicateApplication { job_id: Uuid, candidate_id: Uuid },

    #[error("Actor {actor} may not access {resource}")]
    Forbidden { actor: Uuid, resource: String },

    #[error("{resource} {id} not found")]
    NotFound { resource: &'static str, id: String },

    /// Transient infrastructure failure. The only category callers may
    /// retry with backoff.
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn not_found(resource: &'static str, id: impl std::fmt::Display) -> Self {
        Error::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    pub fn invalid_transition(from: impl std::fmt::Display, attempted: &'static str) -> Self {
        Error::InvalidTransition {
            from: from.to_string(),
            attempted,
        }
    }

    pub fn forbidden(actor: Uuid, resource: impl Into<String>) -> Self {
        Error::Forbidden {
            actor,
            resource: resource.into(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let (status, error_message) = match &self {
            Error::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Error::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            Error::InvalidTransition { .. } => (StatusCode::CONFLICT, self.to_string()),
            Error::DuplicateApplication { .. } => (StatusCode::CONFLICT, self.to_string()),
            Error::Forbidden { .. } => {
                // audit trail: every gate refusal is logged
                tracing::warn!(error = %self, "forbidden access");
                (StatusCode::FORBIDDEN, self.to_string())
            }
            Error::NotFound { .. } => (StatusCode::NOT_FOUND, self.to_string()),
            Error::StoreUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg.clone()),
            Error::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            Error::Json(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            Error::Anyhow(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            Error::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            Error::Config(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An unexpected error occurred".to_string(),
            ),
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Error::not_found("Resource", "unknown"),
            other => Error::StoreUnavailable(other.to_string()),
        }
    }
}
