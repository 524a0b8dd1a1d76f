use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("HTTP request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Storefront API returned {status} for {path}")]
    Status { path: String, status: u16 },

    #[error("Storefront API rejected the request: {0}")]
    Rejected(String),

    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Request(e) => {
                tracing::error!("HTTP request error: {}", e);
                (StatusCode::BAD_GATEWAY, "Failed to reach the storefront API")
            }
            AppError::Status { path, status } => {
                tracing::error!("Storefront API returned {} for {}", status, path);
                (StatusCode::BAD_GATEWAY, "Storefront API request failed")
            }
            AppError::Rejected(e) => {
                tracing::warn!("Storefront API rejected the request: {}", e);
                (StatusCode::BAD_GATEWAY, "Storefront API rejected the request")
            }
            AppError::JsonParse(e) => {
                tracing::error!("JSON parsing error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to parse storefront data",
                )
            }
            AppError::InvalidDate(_) => {
                (StatusCode::BAD_REQUEST, "Invalid date format")
            }
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "Validation failed"),
            AppError::Config(e) => {
                tracing::error!("Configuration error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Configuration error")
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        let body = Json(json!({
            "error": message,
            "message": self.to_string()
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
