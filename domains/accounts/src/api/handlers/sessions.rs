//! Login and logout handlers
//!
//! The login form accepts JSON or `application/x-www-form-urlencoded`
//! bodies. Successful logins answer `303 See Other` to the requested
//! `return_to` path with the session cookie set.

use axum::{
    extract::{FromRequest, Query, Request, State},
    http::header::{CONTENT_TYPE, SET_COOKIE},
    response::{IntoResponse, Redirect, Response},
    Form, Json,
};
use foodhub_auth::{
    clear_session_cookie, safe_return_to, session_cookie, session_token, AuthError,
};
use foodhub_common::Error;
use serde::{Deserialize, Serialize};

use crate::api::middleware::AccountsState;

/// Credentials posted to `/login`
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub return_to: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReturnToQuery {
    pub return_to: Option<String>,
}

/// What the login page needs to render its form
#[derive(Debug, Serialize)]
pub struct LoginPage {
    pub return_to: String,
}

/// Login body in either JSON or urlencoded form.
#[derive(Debug)]
pub struct LoginBody(pub LoginRequest);

impl<S> FromRequest<S> for LoginBody
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));

        let request = if is_form {
            Form::<LoginRequest>::from_request(req, state)
                .await
                .map(|Form(body)| body)
                .map_err(|e| Error::Validation(e.body_text()).into_response())?
        } else {
            Json::<LoginRequest>::from_request(req, state)
                .await
                .map(|Json(body)| body)
                .map_err(|e| Error::Validation(e.body_text()).into_response())?
        };
        Ok(LoginBody(request))
    }
}

/// **GET /login**
pub async fn login_page(Query(query): Query<ReturnToQuery>) -> Json<LoginPage> {
    Json(LoginPage {
        return_to: safe_return_to(query.return_to.as_deref()),
    })
}

/// **POST /login**
///
/// `return_to` may come from the form body or the query string; the body
/// wins. Unsafe destinations fall back to the dashboard.
pub async fn login(
    State(state): State<AccountsState>,
    Query(query): Query<ReturnToQuery>,
    LoginBody(request): LoginBody,
) -> Result<Response, AuthError> {
    let issued = state.auth.login(&request.email, &request.password).await?;

    let destination = safe_return_to(request.return_to.or(query.return_to).as_deref());
    let cookie = session_cookie(&issued.token, state.auth.config());

    Ok(([(SET_COOKIE, cookie)], Redirect::to(&destination)).into_response())
}

/// **POST /logout**
///
/// Deletes the session row before answering so the old cookie is dead
/// immediately.
pub async fn logout(
    State(state): State<AccountsState>,
    headers: axum::http::HeaderMap,
) -> Result<Response, AuthError> {
    if let Some(token) = session_token(&headers) {
        state.auth.destroy_session(&token).await?;
    }

    let cookie = clear_session_cookie(state.auth.config());
    Ok(([(SET_COOKIE, cookie)], Redirect::to("/login")).into_response())
}
