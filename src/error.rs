use crate::store::StoreError;
use ntex::http::StatusCode;
use ntex::web::{HttpResponse, WebResponseError};
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    Unauthorized(String),
    NotFound(String),
    Conflict(String),
    Store(StoreError),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::Store(e) => write!(f, "Document store error: {}", e),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl WebResponseError for AppError {
    fn error_response(&self, _: &ntex::web::HttpRequest) -> HttpResponse {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.as_str()),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.as_str()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.as_str()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.as_str()),
            AppError::Store(e) => {
                tracing::error!(error = %e, "document store failure");
                (StatusCode::INTERNAL_SERVER_ERROR, "Document store error")
            }
            AppError::Internal(msg) => {
                tracing::error!(detail = %msg, "internal failure");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
            }
        };
        HttpResponse::build(status).json(&serde_json::json!({ "error": message }))
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Conflict { path } => AppError::Conflict(format!(
                "{} was updated by someone else, please resubmit",
                path
            )),
            other => AppError::Store(other),
        }
    }
}
