use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use agora_auth::AuthError;
use agora_protocol::DispatchError;
use agora_storage::StorageError;

/// Every handler error, already classified into the status code it maps to.
/// Unlike a bare `StorageError`, this type knows how to render itself as the
/// `{"error": message}` body every route returns on failure.
pub enum AppError {
    NotFound(String),
    Unauthorized(String),
    BadRequest(String),
    Conflict(String),
    TooBusy,
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::TooBusy => (StatusCode::TOO_MANY_REQUESTS, "storage backend is too busy".to_string()),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        let body = serde_json::json!({ "error": message });
        (status, Json(body)).into_response()
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "not found: {msg}"),
            AppError::Unauthorized(msg) => write!(f, "unauthorized: {msg}"),
            AppError::BadRequest(msg) => write!(f, "bad request: {msg}"),
            AppError::Conflict(msg) => write!(f, "conflict: {msg}"),
            AppError::TooBusy => write!(f, "too busy"),
            AppError::Internal(msg) => write!(f, "internal error: {msg}"),
        }
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        <Self as std::fmt::Display>::fmt(self, f)
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::TooBusy => AppError::TooBusy,
            StorageError::DuplicateId(id) => AppError::Conflict(format!("id already exists: {id}")),
            StorageError::NotFound(id) => AppError::NotFound(id),
            StorageError::Other(err) => AppError::Internal(err.to_string()),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AllocationExhausted(base_id) => {
                AppError::Conflict(format!("could not allocate an id for base '{base_id}'"))
            }
            AuthError::Storage(err) => AppError::from(err),
        }
    }
}

impl From<DispatchError> for AppError {
    fn from(err: DispatchError) -> Self {
        match err {
            DispatchError::UnknownAction(name) => AppError::BadRequest(format!("unknown action: {name}")),
            DispatchError::Storage(err) => AppError::from(err),
        }
    }
}
