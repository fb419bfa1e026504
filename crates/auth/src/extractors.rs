//! Axum extractors for authentication
//!
//! Generic over any state `S` where `AuthBackend: FromRef<S>`.
//! This is axum's idiomatic nested-state pattern.

use axum::{
    extract::{FromRef, FromRequestParts, OriginalUri},
    http::request::Parts,
};

use crate::backend::AuthBackend;
use crate::context::AuthContext;
use crate::error::AuthError;
use crate::session::session_token;

/// Authenticated session subject.
///
/// Requests without a valid session are redirected to the login form with
/// the original path and query as `return_to`.
#[derive(Debug)]
pub struct AuthUser(pub AuthContext);

impl<S> FromRequestParts<S> for AuthUser
where
    AuthBackend: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        // The locale middleware may already have resolved the session
        if let Some(ctx) = parts.extensions.get::<AuthContext>() {
            return Ok(AuthUser(ctx.clone()));
        }

        let backend = AuthBackend::from_ref(state);
        let login_required = || AuthError::LoginRequired {
            return_to: requested_path(parts),
        };

        let token = session_token(&parts.headers).ok_or_else(login_required)?;
        let ctx = backend
            .authenticate_session(&token)
            .await?
            .ok_or_else(login_required)?;

        Ok(AuthUser(ctx))
    }
}

/// Admin-only extractor.
///
/// Like `AuthUser` but rejects non-admins with 403 "Unauthorized",
/// whatever enterprises they own.
#[derive(Debug)]
pub struct SuperAdmin(pub AuthContext);

impl<S> FromRequestParts<S> for SuperAdmin
where
    AuthBackend: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let AuthUser(ctx) = AuthUser::from_request_parts(parts, state).await?;

        if !ctx.is_admin() {
            tracing::debug!(user_id = %ctx.user.id, path = %parts.uri.path(), "Admin role required");
            return Err(AuthError::Unauthorized);
        }

        Ok(SuperAdmin(ctx))
    }
}

/// Locale chosen for this request by the locale middleware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveLocale(pub String);

impl<S> FromRequestParts<S> for EffectiveLocale
where
    AuthBackend: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        if let Some(locale) = parts.extensions.get::<EffectiveLocale>() {
            return Ok(locale.clone());
        }
        let backend = AuthBackend::from_ref(state);
        Ok(EffectiveLocale(
            backend.config().locale.default_locale().to_string(),
        ))
    }
}

/// Path and query of the request as the client sent it.
fn requested_path(parts: &Parts) -> String {
    let uri = parts
        .extensions
        .get::<OriginalUri>()
        .map(|original| &original.0)
        .unwrap_or(&parts.uri);

    uri.path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string())
}
