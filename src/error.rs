// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use serde_json::{json, Value};

use crate::auth::{CredentialError, OwnershipError, PasswordError};
use crate::database::DatabaseError;
use crate::embedded::MutationError;
use crate::services::github::GithubError;

pub const MSG_NO_TOKEN: &str = "No token, authorization denied";
pub const MSG_INVALID_TOKEN: &str = "Token is not valid";
pub const MSG_NOT_AUTHORIZED: &str = "User not authorized";
pub const MSG_SERVER_ERROR: &str = "Server Error";

/// One failed input check, shaped like express-validator output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub msg: String,
    pub param: String,
    pub location: &'static str,
}

impl FieldError {
    pub fn body(param: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            msg: msg.into(),
            param: param.into(),
            location: "body",
        }
    }
}

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug)]
pub enum ApiError {
    // 401 Unauthorized: no credential presented
    AuthMissing,

    // 401 Unauthorized: credential malformed, forged or expired
    AuthInvalid,

    // 401 Unauthorized: acting identity does not own the resource
    Forbidden(String),

    // 404 Not Found
    NotFound(String),

    // 400 Bad Request
    BadRequest(String),

    // 400 Bad Request, per-field detail
    ValidationFailed(Vec<FieldError>),

    // 500 Internal Server Error; the detail is logged, never returned
    InternalError(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::AuthMissing | ApiError::AuthInvalid | ApiError::Forbidden(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) | ApiError::ValidationFailed(_) => StatusCode::BAD_REQUEST,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::AuthMissing => MSG_NO_TOKEN,
            ApiError::AuthInvalid => MSG_INVALID_TOKEN,
            ApiError::Forbidden(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::BadRequest(msg) => msg,
            ApiError::ValidationFailed(_) => "Validation failed",
            ApiError::InternalError(_) => MSG_SERVER_ERROR,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            ApiError::ValidationFailed(errors) => json!({ "errors": errors }),
            _ => json!({ "msg": self.message() }),
        }
    }
}

impl ApiError {
    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    /// Single-message failure in the validation shape (`{errors: [{msg}]}`)
    pub fn rejected(message: impl Into<String>) -> Self {
        ApiError::ValidationFailed(vec![FieldError::body("", message)])
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        ApiError::InternalError(detail.into())
    }
}

impl From<CredentialError> for ApiError {
    fn from(err: CredentialError) -> Self {
        if err.is_rejection() {
            ApiError::AuthInvalid
        } else {
            ApiError::internal(err.to_string())
        }
    }
}

impl From<OwnershipError> for ApiError {
    fn from(_: OwnershipError) -> Self {
        ApiError::forbidden(MSG_NOT_AUTHORIZED)
    }
}

impl From<MutationError> for ApiError {
    fn from(err: MutationError) -> Self {
        match err {
            MutationError::AlreadyLiked => ApiError::bad_request("Post already liked"),
            MutationError::NotLiked => ApiError::bad_request("Post has not yet been liked"),
            MutationError::NotFound(_) => ApiError::not_found("Item not found"),
            MutationError::Forbidden(e) => e.into(),
        }
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        ApiError::internal(format!("database: {}", err))
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::internal(format!("password: {}", err))
    }
}

impl From<GithubError> for ApiError {
    fn from(err: GithubError) -> Self {
        match err {
            GithubError::NoProfile(_) => ApiError::not_found("No Github profile found"),
            other => ApiError::internal(format!("github: {}", other)),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::InternalError(detail) => write!(f, "internal error: {}", detail),
            _ => write!(f, "{}", self.message()),
        }
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        if let ApiError::InternalError(detail) = &self {
            tracing::error!("{}", detail);
        }
        (self.status_code(), Json(self.to_json())).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
