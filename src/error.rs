//! `AppError`/`PublicError`/`PrivateError` (SPEC_FULL.md §A.2). `controllers`
//! and `middleware.rs` return/match on these; the engine itself never
//! constructs one, it only ever returns `engine::error::EngineError`, which
//! converts into an `AppError` at the task-shell boundary.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

use crate::engine::error::EngineError;

/// Leaked to the HTTP client verbatim, along with an appropriate status.
#[derive(Debug)]
pub enum PublicError {
    Validation(String),
    BadRequest(String),
    Conflict(String),
    NotFound(String),
    Unauthorized,
    ExternalService(String),
}

impl PublicError {
    fn status(&self) -> StatusCode {
        match self {
            PublicError::Validation(_) | PublicError::BadRequest(_) => StatusCode::BAD_REQUEST,
            PublicError::Conflict(_) => StatusCode::CONFLICT,
            PublicError::NotFound(_) => StatusCode::NOT_FOUND,
            PublicError::Unauthorized => StatusCode::UNAUTHORIZED,
            PublicError::ExternalService(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn message(&self) -> String {
        match self {
            PublicError::Validation(m)
            | PublicError::BadRequest(m)
            | PublicError::Conflict(m)
            | PublicError::NotFound(m)
            | PublicError::ExternalService(m) => m.clone(),
            PublicError::Unauthorized => "unauthorized".to_string(),
        }
    }
}

/// Never serialized to the client; only logged. Collapses to a generic 500.
#[derive(Debug)]
pub enum PrivateError {
    Db(sqlx::Error),
    PasswordHash(argon2::password_hash::Error),
    Configuration(String),
    Internal(String),
}

#[derive(Debug)]
pub enum AppError {
    Public(PublicError),
    Private(PrivateError),
}

impl From<PublicError> for AppError {
    fn from(e: PublicError) -> Self {
        AppError::Public(e)
    }
}

impl From<PrivateError> for AppError {
    fn from(e: PrivateError) -> Self {
        AppError::Private(e)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::Private(PrivateError::Db(e))
    }
}

/// `EngineError` is the only error type the engine proper can raise; both of
/// its variants are caller mistakes or deployment misconfiguration, not
/// something to hide from the client (per spec.md §7's taxonomy).
impl From<EngineError> for AppError {
    fn from(e: EngineError) -> Self {
        match e {
            EngineError::InvalidInput(msg) => AppError::Public(PublicError::BadRequest(msg)),
            EngineError::ConfigurationError(msg) => AppError::Private(PrivateError::Configuration(msg)),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Public(public) => {
                (public.status(), Json(json!({ "error": public.message() }))).into_response()
            }
            AppError::Private(private) => {
                error!("internal error: {private:?}");
                (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": "internal server error" }))).into_response()
            }
        }
    }
}

pub type ApiResult<T> = std::result::Result<T, AppError>;
