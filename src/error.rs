//! Domain Error Taxonomy
//! Mission: Typed errors from components, translated to HTTP only here

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::warn;

/// Authentication failure kinds.
///
/// All four surface to clients as the same 401 outcome; the kind is kept so
/// internal logs can say why a token was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorKind {
    InvalidCredentials,
    Expired,
    Malformed,
    BadSignature,
}

impl AuthErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthErrorKind::InvalidCredentials => "invalid_credentials",
            AuthErrorKind::Expired => "expired",
            AuthErrorKind::Malformed => "malformed",
            AuthErrorKind::BadSignature => "bad_signature",
        }
    }
}

/// Errors raised by the auth core and the prediction surface.
///
/// Components return these; nothing below the HTTP layer is allowed to turn
/// them into status codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Malformed input or policy violation, with field-level detail.
    Validation { field: &'static str, message: String },
    /// Username or email uniqueness violation.
    Conflict(String),
    /// Authentication failure; kind retained for diagnostics only.
    Auth(AuthErrorKind),
    /// Authenticated but the role does not permit the action.
    Forbidden,
    /// Missing resource by id.
    NotFound(&'static str),
    /// Admin targeting its own account for deletion.
    SelfDelete,
    /// Unexpected internal failure (e.g. hashing backend error).
    Internal(String),
}

impl ApiError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        ApiError::Validation {
            field,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Validation { field, message } => write!(f, "{field}: {message}"),
            ApiError::Conflict(msg) => write!(f, "{msg}"),
            ApiError::Auth(kind) => write!(f, "authentication failed ({})", kind.as_str()),
            ApiError::Forbidden => write!(f, "insufficient permissions"),
            ApiError::NotFound(what) => write!(f, "{what} not found"),
            ApiError::SelfDelete => write!(f, "cannot delete your own account"),
            ApiError::Internal(msg) => write!(f, "internal error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::Validation { field, message } => (
                StatusCode::BAD_REQUEST,
                json!({ "error": message, "field": field }),
            ),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, json!({ "error": msg })),
            ApiError::Auth(kind) => {
                // Kind stays server-side; the client sees one uniform message.
                warn!(kind = kind.as_str(), "🔒 Authentication rejected");
                (
                    StatusCode::UNAUTHORIZED,
                    json!({ "error": "Invalid authentication credentials" }),
                )
            }
            ApiError::Forbidden => (
                StatusCode::FORBIDDEN,
                json!({ "error": "Insufficient permissions" }),
            ),
            ApiError::NotFound(what) => (
                StatusCode::NOT_FOUND,
                json!({ "error": format!("{what} not found") }),
            ),
            ApiError::SelfDelete => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Cannot delete your own account" }),
            ),
            ApiError::Internal(msg) => {
                warn!(detail = %msg, "Internal error surfaced to client");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal server error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
