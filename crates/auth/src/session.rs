//! Session cookie and login redirect helpers

use axum::http::{header::COOKIE, HeaderMap};
use cookie::{time::Duration as CookieDuration, Cookie, SameSite};

use crate::config::{AuthConfig, SESSION_COOKIE};

/// Where a successful login lands when no usable `return_to` was given
pub const DEFAULT_LANDING: &str = "/admin";

/// Read the session token from the request's `Cookie` headers.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|c| c.name() == SESSION_COOKIE && !c.value().is_empty())
        .map(|c| c.value().to_string())
}

/// `Set-Cookie` value issuing a session token.
pub fn session_cookie(token: &str, config: &AuthConfig) -> String {
    Cookie::build((SESSION_COOKIE, token.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.cookie_secure)
        .max_age(CookieDuration::seconds(config.session_ttl.num_seconds()))
        .build()
        .to_string()
}

/// `Set-Cookie` value that removes the session cookie.
pub fn clear_session_cookie(config: &AuthConfig) -> String {
    let mut cookie = Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.cookie_secure)
        .build();
    cookie.make_removal();
    cookie.to_string()
}

/// Login form location carrying the originally requested path.
pub fn login_location(return_to: &str) -> String {
    match serde_urlencoded::to_string([("return_to", return_to)]) {
        Ok(query) => format!("/login?{}", query),
        Err(_) => "/login".to_string(),
    }
}

/// Accept only local absolute paths as a post-login destination.
///
/// Anything else (absolute URLs, protocol-relative `//host`, backslash
/// tricks) falls back to the dashboard.
pub fn safe_return_to(return_to: Option<&str>) -> String {
    match return_to {
        Some(path)
            if path.starts_with('/')
                && !path.starts_with("//")
                && !path.contains('\\')
                && !path.chars().any(char::is_control) =>
        {
            path.to_string()
        }
        _ => DEFAULT_LANDING.to_string(),
    }
}
