use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("unauthorized access")]
    Unauthorized,

    #[error("forbidden access")]
    Forbidden,

    #[error("payment not verified: {reason}")]
    PaymentUnverified { reason: String },

    #[error("upstream error: {0}")]
    Upstream(String),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, code, msg) = match &self {
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "authentication_error",
                "unauthorized",
                "unauthorized access".to_string(),
            ),
            AppError::Forbidden => (
                StatusCode::FORBIDDEN,
                "permission_error",
                "forbidden",
                "forbidden access".to_string(),
            ),
            AppError::PaymentUnverified { reason } => (
                StatusCode::CONFLICT,
                "payment_error",
                "payment_unverified",
                format!("payment not verified: {}", reason),
            ),
            AppError::Upstream(e) => (
                StatusCode::BAD_GATEWAY,
                "upstream_error",
                "upstream_failed",
                e.clone(),
            ),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "internal_server_error",
                    "internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "message": msg,
                "type": error_type,
                "code": code,
            }
        }));

        (status, body).into_response()
    }
}
