use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::collections::BTreeMap;
use std::fmt;

use super::ApiResponse;

#[derive(Debug)]
pub enum ApiError {
    /// Malformed or duplicate input; carries per-field messages.
    Validation(BTreeMap<String, String>),

    /// Deliberately opaque: never reveals whether the code existed,
    /// expired or was already used.
    InvalidOrExpiredCode,

    NotFound(String),

    PermissionDenied(String),

    AuthenticationRequired,

    DatabaseError(String),

    MailError(String),

    InternalError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Validation(fields) => {
                write!(f, "Validation failed: ")?;
                for (i, (field, message)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{field}: {message}")?;
                }
                Ok(())
            }
            ApiError::InvalidOrExpiredCode => write!(f, "Invalid or expired code"),
            ApiError::NotFound(msg) => write!(f, "Not found: {msg}"),
            ApiError::PermissionDenied(msg) => write!(f, "Permission denied: {msg}"),
            ApiError::AuthenticationRequired => write!(f, "Authentication required"),
            ApiError::DatabaseError(msg) => write!(f, "Database error: {msg}"),
            ApiError::MailError(msg) => write!(f, "Mail error: {msg}"),
            ApiError::InternalError(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Validation(fields) => (
                StatusCode::BAD_REQUEST,
                ApiResponse::<()>::validation_error(fields),
            ),
            ApiError::InvalidOrExpiredCode => (
                StatusCode::BAD_REQUEST,
                ApiResponse::<()>::error("Invalid or expired code"),
            ),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, ApiResponse::<()>::error(msg)),
            ApiError::PermissionDenied(msg) => {
                (StatusCode::FORBIDDEN, ApiResponse::<()>::error(msg))
            }
            ApiError::AuthenticationRequired => (
                StatusCode::UNAUTHORIZED,
                ApiResponse::<()>::error("Authentication required"),
            ),
            ApiError::DatabaseError(msg) => {
                tracing::error!("Database error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiResponse::<()>::error("A database error occurred"),
                )
            }
            ApiError::MailError(msg) => {
                tracing::warn!("Mail dispatch failed: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    ApiResponse::<()>::error("Mail service is unavailable"),
                )
            }
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiResponse::<()>::error("An internal error occurred"),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::DatabaseError(format!("{err:#}"))
    }
}

impl ApiError {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert(field.to_string(), message.into());
        ApiError::Validation(fields)
    }

    pub fn not_found(resource: &str, id: impl fmt::Display) -> Self {
        ApiError::NotFound(format!("{resource} {id} not found"))
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        ApiError::PermissionDenied(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        ApiError::InternalError(msg.into())
    }
}
