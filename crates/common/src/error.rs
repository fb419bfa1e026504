//! Application error type and its HTTP rendering
//!
//! Every handler returns [`Result`]; the error renders as
//! `{"error": {"code": ..., "message": ...}}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unexpected error: {0}")]
    Unexpected(#[from] anyhow::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Authentication error: {0}")]
    Authentication(String),

    /// The reason is logged, never returned
    #[error("Authorization error: {0}")]
    Authorization(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// The gateway refused a payment operation
    #[error("Payment failed: {0}")]
    PaymentFailed(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// HTTP status and machine-readable code
    pub fn classify(&self) -> (StatusCode, &'static str) {
        match self {
            Error::Authentication(_) => (StatusCode::UNAUTHORIZED, "AUTHENTICATION_ERROR"),
            Error::Authorization(_) => (StatusCode::FORBIDDEN, "UNAUTHORIZED"),
            Error::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            Error::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Error::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            Error::PaymentFailed(_) => (StatusCode::UNPROCESSABLE_ENTITY, "PAYMENT_FAILED"),
            Error::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR"),
            Error::Unexpected(_) | Error::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        }
    }

    pub fn status_code(&self) -> StatusCode {
        self.classify().0
    }

    /// Message shown to the client
    pub fn public_message(&self) -> String {
        match self {
            Error::Authentication(msg)
            | Error::Validation(msg)
            | Error::NotFound(msg)
            | Error::Conflict(msg)
            | Error::PaymentFailed(msg) => msg.clone(),
            Error::Authorization(_) => "Unauthorized".to_string(),
            Error::Unexpected(_) | Error::Database(_) | Error::Internal(_) => {
                "Internal server error".to_string()
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, code) = self.classify();

        match &self {
            Error::Authorization(reason) => tracing::debug!(%reason, "Access denied"),
            _ if status.is_server_error() => tracing::error!(error = %self, "Request failed"),
            _ => {}
        }

        let body = json!({
            "error": {
                "code": code,
                "message": self.public_message(),
            }
        });
        (status, Json(body)).into_response()
    }
}
