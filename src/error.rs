use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::db::StoreError;

#[derive(Debug)]
pub enum AppError {
    InvalidCredentials,
    EmailAlreadyRegistered,
    NotFound(String),
    Unauthenticated(String),
    Forbidden(String),
    BadRequest(String),
    RateLimited(String),
    StorageUnavailable(String),
    Internal(String),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::InvalidCredentials => write!(f, "Invalid email or password"),
            AppError::EmailAlreadyRegistered => write!(f, "Email already registered"),
            AppError::NotFound(msg) => write!(f, "Not Found: {msg}"),
            AppError::Unauthenticated(msg) => write!(f, "Unauthenticated: {msg}"),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {msg}"),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {msg}"),
            AppError::RateLimited(msg) => write!(f, "Rate Limited: {msg}"),
            AppError::StorageUnavailable(msg) => write!(f, "Storage Unavailable: {msg}"),
            AppError::Internal(msg) => write!(f, "Internal Error: {msg}"),
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::EmailAlreadyRegistered => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            AppError::StorageUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show to the user. Server-side failures are logged and hidden.
    pub fn public_message(&self) -> String {
        match self {
            AppError::InvalidCredentials => "Invalid email or password.".to_string(),
            AppError::EmailAlreadyRegistered => "That email is already registered.".to_string(),
            AppError::NotFound(msg)
            | AppError::Unauthenticated(msg)
            | AppError::Forbidden(msg)
            | AppError::BadRequest(msg)
            | AppError::RateLimited(msg) => msg.clone(),
            AppError::StorageUnavailable(msg) => {
                tracing::error!("Storage unavailable: {msg}");
                "Storage is temporarily unavailable. Please try again later.".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {msg}");
                "Internal server error".to_string()
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = json!({ "error": self.public_message() });
        (status, axum::Json(body)).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(msg) => AppError::StorageUnavailable(msg),
            StoreError::Corrupt(msg) => AppError::StorageUnavailable(msg),
            StoreError::EmailTaken => AppError::EmailAlreadyRegistered,
            StoreError::InvalidCredentials => AppError::InvalidCredentials,
            StoreError::NotFound => AppError::NotFound("Not found".to_string()),
            StoreError::Internal(msg) => AppError::Internal(msg),
        }
    }
}
