use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

// Callable contract: failures travel in the response envelope, not the HTTP
// status line. A distressed user on the chat surface must never see a raw
// transport error.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = match &self {
            AppError::Validation(msg) => json!({
                "success": false,
                "error": msg,
                "step": "validation",
            }),
            AppError::RateLimited => json!({
                "success": false,
                "error": "Too many requests. Please wait a moment and try again.",
                "step": "rate_limit",
            }),
            AppError::Database(e) => {
                tracing::error!(error = %e, "Database error");
                json!({
                    "success": false,
                    "error": "Storage operation failed",
                })
            }
        };

        (StatusCode::OK, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
