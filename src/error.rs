use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

#[derive(Debug)]
pub enum AppError {
    NotAuthenticated,
    NotFound(String),
    DuplicateIdentity,
    InvalidCredential,
    TokenInvalidOrExpired,
    InvalidCursor(String),
    BadRequest(String),
    RateLimited(String),
    Upstream(String),
    Internal(String),
    Database(sqlx::Error),
}

impl AppError {
    /// Stable machine-readable code sent alongside the message.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotAuthenticated => "NOT_AUTHENTICATED",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::DuplicateIdentity => "DUPLICATE_IDENTITY",
            AppError::InvalidCredential => "INVALID_CREDENTIAL",
            AppError::TokenInvalidOrExpired => "TOKEN_INVALID_OR_EXPIRED",
            AppError::InvalidCursor(_) => "INVALID_CURSOR",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::RateLimited(_) => "RATE_LIMITED",
            AppError::Upstream(_) | AppError::Database(_) => "UPSTREAM_UNAVAILABLE",
            AppError::Internal(_) => "INTERNAL",
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::NotAuthenticated => write!(f, "Not authenticated"),
            AppError::NotFound(msg) => write!(f, "Not Found: {msg}"),
            AppError::DuplicateIdentity => write!(f, "User already exists"),
            AppError::InvalidCredential => write!(f, "Invalid credentials"),
            AppError::TokenInvalidOrExpired => write!(f, "Token is invalid or has expired"),
            AppError::InvalidCursor(msg) => write!(f, "Invalid cursor: {msg}"),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {msg}"),
            AppError::RateLimited(msg) => write!(f, "Rate Limited: {msg}"),
            AppError::Upstream(msg) => write!(f, "Upstream unavailable: {msg}"),
            AppError::Internal(msg) => write!(f, "Internal Error: {msg}"),
            AppError::Database(err) => write!(f, "Database Error: {err}"),
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotAuthenticated => {
                (StatusCode::UNAUTHORIZED, "Not authenticated".to_string())
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::DuplicateIdentity => {
                (StatusCode::CONFLICT, "User already exists".to_string())
            }
            AppError::InvalidCredential => {
                (StatusCode::UNAUTHORIZED, "Invalid credentials".to_string())
            }
            AppError::TokenInvalidOrExpired => (
                StatusCode::BAD_REQUEST,
                "Token is invalid or has expired".to_string(),
            ),
            AppError::InvalidCursor(msg) => {
                (StatusCode::BAD_REQUEST, format!("Invalid cursor: {msg}"))
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::RateLimited(msg) => (StatusCode::TOO_MANY_REQUESTS, msg.clone()),
            AppError::Upstream(msg) => {
                tracing::error!("Upstream failure: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "Upstream service unavailable".to_string(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::Database(err) => {
                tracing::error!("Database error: {err}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Service temporarily unavailable".to_string(),
                )
            }
        };

        let body = json!({ "error": message, "code": self.code() });
        (status, axum::Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::DuplicateIdentity
            }
            _ => AppError::Database(err),
        }
    }
}
