//! Per-request locale resolution middleware
//!
//! Picks the effective locale from `?locale=`, the session user's persisted
//! locale, then `Accept-Language`, and echoes it as `Content-Language`.
//! The query parameter never persists anything.

use axum::{
    extract::{Query, Request, State},
    http::{
        header::{ACCEPT_LANGUAGE, CONTENT_LANGUAGE},
        HeaderValue,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::backend::AuthBackend;
use crate::extractors::EffectiveLocale;
use crate::session::session_token;

#[derive(Debug, Deserialize)]
struct LocaleQuery {
    locale: Option<String>,
}

/// Middleware resolving the effective locale.
///
/// Also stashes the resolved `AuthContext` so `AuthUser` does not hit the
/// session table twice.
pub async fn resolve_locale(
    State(backend): State<AuthBackend>,
    mut request: Request,
    next: Next,
) -> Response {
    let requested = Query::<LocaleQuery>::try_from_uri(request.uri())
        .ok()
        .and_then(|Query(q)| q.locale);

    let ctx = match session_token(request.headers()) {
        Some(token) => match backend.authenticate_session(&token).await {
            Ok(ctx) => ctx,
            Err(e) => return e.into_response(),
        },
        None => None,
    };

    let locale = {
        let accept_language = request
            .headers()
            .get(ACCEPT_LANGUAGE)
            .and_then(|v| v.to_str().ok());
        backend.config().locale.resolve(
            requested.as_deref(),
            ctx.as_ref().and_then(|c| c.user.locale.as_deref()),
            accept_language,
        )
    };

    if let Some(ctx) = ctx {
        request.extensions_mut().insert(ctx);
    }
    request
        .extensions_mut()
        .insert(EffectiveLocale(locale.clone()));

    let mut response = next.run(request).await;
    // a handler that switched the locale has already set the header
    if !response.headers().contains_key(CONTENT_LANGUAGE) {
        if let Ok(value) = HeaderValue::from_str(&content_language(&locale)) {
            response.headers_mut().insert(CONTENT_LANGUAGE, value);
        }
    }
    response
}

/// `Content-Language` spelling of a locale (`pt_BR` → `pt-BR`).
pub fn content_language(locale: &str) -> String {
    locale.replace('_', "-")
}
