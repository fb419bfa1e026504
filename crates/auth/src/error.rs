//! Authentication errors

use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde_json::json;

use crate::session::login_location;

/// Authentication error
#[derive(Debug)]
pub enum AuthError {
    /// No valid session; the browser is sent to the login form
    LoginRequired { return_to: String },
    InvalidCredentials,
    /// Authenticated but not permitted
    Unauthorized,
    SessionLoadError,
    SessionCreateFailed,
    UserLoadError,
    EnterprisesLoadError,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AuthError::LoginRequired { return_to } => {
                return Redirect::to(&login_location(&return_to)).into_response();
            }
            AuthError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "INVALID_CREDENTIALS",
                "Invalid email or password",
            ),
            AuthError::Unauthorized => (StatusCode::FORBIDDEN, "UNAUTHORIZED", "Unauthorized"),
            AuthError::SessionLoadError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "SESSION_LOAD_ERROR",
                "Failed to load session",
            ),
            AuthError::SessionCreateFailed => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "SESSION_CREATE_ERROR",
                "Failed to create session",
            ),
            AuthError::UserLoadError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "USER_LOAD_ERROR",
                "Failed to load user",
            ),
            AuthError::EnterprisesLoadError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "ENTERPRISES_LOAD_ERROR",
                "Failed to load user enterprises",
            ),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}
