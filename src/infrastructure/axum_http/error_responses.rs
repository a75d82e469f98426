use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::application::errors::UseCaseError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub reason: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    UseCase(#[from] UseCaseError),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, reason, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "validation_failed", msg),
            AppError::UseCase(err @ UseCaseError::Internal(_)) => {
                // Detail stays in the logs.
                error!(error = ?err, "http: internal error");
                (
                    err.status_code(),
                    err.reason(),
                    "Internal server error".to_string(),
                )
            }
            AppError::UseCase(err) => (err.status_code(), err.reason(), err.to_string()),
        };

        let body = Json(ErrorResponse {
            code: status.as_u16(),
            reason,
            message,
        });

        (status, body).into_response()
    }
}
