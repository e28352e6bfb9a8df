use axum::{http::StatusCode, response::IntoResponse, Json};
use common::ErrorBody;
use serde_json::json;
use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("validation error: {0}")]
    Validation(Box<str>),
    #[error("username exists")]
    UsernameExists,
    #[error("service unavailable: {0}")]
    Unavailable(Box<str>),
}

impl From<StoreError> for ServerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateUsername => Self::UsernameExists,
            StoreError::Unavailable(reason) => Self::Unavailable(reason),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        match self {
            Self::Validation(details) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorBody {
                    message: "Validation error".into(),
                    details: Some(details),
                })
            ).into_response(),
            Self::UsernameExists => (
                StatusCode::CONFLICT,
                Json(ErrorBody {
                    message: "Username already exists".into(),
                    details: None,
                })
            ).into_response(),
            Self::Unavailable(reason) => (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "error": "Service temporarily unavailable",
                    "message": "Database connection failed",
                    "details": reason,
                }))
            ).into_response(),
        }
    }
}
