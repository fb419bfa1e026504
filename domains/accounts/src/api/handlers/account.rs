//! Dashboard and own-account handlers

use axum::{
    extract::State,
    http::header::CONTENT_LANGUAGE,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use foodhub_auth::{content_language, AuthContext, AuthUser, EffectiveLocale};
use foodhub_common::{Error, Result};
use foodhub_settings::banner_required;
use serde::{Deserialize, Serialize};

use crate::api::middleware::AccountsState;
use crate::{User, UserRole};

/// Landing page data for an authenticated user
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub email: String,
    pub role: UserRole,
    pub locale: String,
    pub owned_enterprises: usize,
    pub managed_enterprises: usize,
    pub terms_of_service_banner: bool,
}

impl DashboardResponse {
    fn new(ctx: &AuthContext, locale: String, terms_of_service_banner: bool) -> Self {
        let owned = ctx.owned_enterprise_count();
        Self {
            email: ctx.user.email.clone(),
            role: if ctx.is_admin() {
                UserRole::Admin
            } else {
                UserRole::User
            },
            locale,
            owned_enterprises: owned,
            managed_enterprises: ctx.enterprises.len() - owned,
            terms_of_service_banner,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateLocaleRequest {
    pub locale: String,
}

/// **GET /admin**
pub async fn dashboard(
    AuthUser(ctx): AuthUser,
    EffectiveLocale(locale): EffectiveLocale,
    State(state): State<AccountsState>,
) -> Result<Json<DashboardResponse>> {
    let current = state.terms.current().await?;
    let banner = banner_required(current.as_ref(), ctx.user.terms_of_service_accepted_at);

    Ok(Json(DashboardResponse::new(&ctx, locale, banner)))
}

/// **GET /admin/account**
pub async fn get_account(
    AuthUser(ctx): AuthUser,
    State(state): State<AccountsState>,
) -> Result<Json<User>> {
    load_user(&state, &ctx).await.map(Json)
}

/// **PUT /admin/account/locale**
///
/// Persists the locale only when it is one of the available locales; an
/// unsupported locale leaves the account untouched.
pub async fn update_locale(
    AuthUser(ctx): AuthUser,
    State(state): State<AccountsState>,
    Json(request): Json<UpdateLocaleRequest>,
) -> Result<Response> {
    let locales = &state.auth.config().locale;
    if !locales.is_available(&request.locale) {
        return Err(Error::Validation(format!(
            "Locale '{}' is not available",
            request.locale
        )));
    }
    let canonical = locales.resolve(Some(&request.locale), None, None);

    let user = state
        .repos
        .users
        .set_locale(ctx.user.id, &canonical)
        .await?
        .ok_or_else(|| Error::NotFound("User not found".to_string()))?;

    tracing::info!(user_id = %user.id, locale = %canonical, "Locale switched");
    Ok((
        [(CONTENT_LANGUAGE, content_language(&canonical))],
        Json(user),
    )
        .into_response())
}

/// **POST /admin/account/terms_of_service/accept**
pub async fn accept_terms_of_service(
    AuthUser(ctx): AuthUser,
    State(state): State<AccountsState>,
) -> Result<Json<User>> {
    let user = state
        .repos
        .users
        .accept_terms_of_service(ctx.user.id, Utc::now())
        .await?
        .ok_or_else(|| Error::NotFound("User not found".to_string()))?;

    tracing::info!(user_id = %user.id, "Terms of service accepted");
    Ok(Json(user))
}

async fn load_user(state: &AccountsState, ctx: &AuthContext) -> Result<User> {
    state
        .repos
        .users
        .get_by_id(ctx.user.id)
        .await?
        .ok_or_else(|| Error::NotFound("User not found".to_string()))
}
