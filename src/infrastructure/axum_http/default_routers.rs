use axum::{Json, http::StatusCode, response::IntoResponse};
use tracing::info;

use super::error_responses::ErrorResponse;

pub async fn not_found() -> impl IntoResponse {
    info!("router: not_found handler invoked");
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            code: StatusCode::NOT_FOUND.as_u16(),
            reason: "not_found",
            message: "Route not found".to_string(),
        }),
    )
}

pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK").into_response()
}
