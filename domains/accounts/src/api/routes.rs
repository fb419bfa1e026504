//! Route definitions for Accounts domain API

use axum::{
    routing::{get, post, put},
    Router,
};

use super::handlers::{account, sessions, users};
use super::middleware::AccountsState;

/// Create login/logout routes
fn session_routes() -> Router<AccountsState> {
    Router::new()
        .route("/login", get(sessions::login_page).post(sessions::login))
        .route("/logout", post(sessions::logout))
}

/// Create own-account routes
fn account_routes() -> Router<AccountsState> {
    Router::new()
        .route("/admin", get(account::dashboard))
        .route("/admin/account", get(account::get_account))
        .route("/admin/account/locale", put(account::update_locale))
        .route(
            "/admin/account/terms_of_service/accept",
            post(account::accept_terms_of_service),
        )
}

/// Create user administration routes
fn user_routes() -> Router<AccountsState> {
    Router::new()
        .route("/admin/users", get(users::list_users).post(users::create_user))
        .route(
            "/admin/users/{id}",
            get(users::get_user).patch(users::update_user),
        )
}

/// Create all Accounts domain API routes
pub fn routes() -> Router<AccountsState> {
    Router::new()
        .merge(session_routes())
        .merge(account_routes())
        .merge(user_routes())
}
