//! Enterprise manager handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use foodhub_auth::AuthUser;
use foodhub_common::{Error, Result, ValidatedJson};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use super::enterprises::load_managed;
use crate::api::middleware::EnterprisesState;
use crate::Manager;

#[derive(Debug, Deserialize, Validate)]
pub struct AddManagerRequest {
    #[validate(email(message = "Email is invalid"))]
    pub email: String,
}

/// **GET /admin/enterprises/{id}/managers**
pub async fn list_managers(
    AuthUser(ctx): AuthUser,
    State(state): State<EnterprisesState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Manager>>> {
    let enterprise = load_managed(&state, &ctx, id).await?;
    Ok(Json(
        state.repos.enterprises.list_managers(enterprise.id).await?,
    ))
}

/// **POST /admin/enterprises/{id}/managers**
///
/// Only the owner or an admin may grant management rights.
pub async fn add_manager(
    AuthUser(ctx): AuthUser,
    State(state): State<EnterprisesState>,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<AddManagerRequest>,
) -> Result<(StatusCode, Json<Vec<Manager>>)> {
    let enterprise = load_managed(&state, &ctx, id).await?;
    if !ctx.is_admin() && enterprise.owner_id != ctx.user.id {
        return Err(Error::Authorization(format!(
            "User {} cannot add managers to enterprise {}",
            ctx.user.id, enterprise.id
        )));
    }

    let user_id = state
        .repos
        .enterprises
        .find_user_id_by_email(&request.email)
        .await?
        .ok_or_else(|| Error::NotFound(format!("No user with email {}", request.email)))?;

    state
        .repos
        .enterprises
        .add_manager(enterprise.id, user_id)
        .await?;

    tracing::info!(enterprise_id = %enterprise.id, manager_id = %user_id, "Manager added");
    Ok((
        StatusCode::CREATED,
        Json(state.repos.enterprises.list_managers(enterprise.id).await?),
    ))
}

/// **DELETE /admin/enterprises/{id}/managers/{user_id}**
pub async fn remove_manager(
    AuthUser(ctx): AuthUser,
    State(state): State<EnterprisesState>,
    Path((id, user_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode> {
    let enterprise = load_managed(&state, &ctx, id).await?;
    if !ctx.is_admin() && enterprise.owner_id != ctx.user.id {
        return Err(Error::Authorization(format!(
            "User {} cannot remove managers from enterprise {}",
            ctx.user.id, enterprise.id
        )));
    }

    if !state
        .repos
        .enterprises
        .remove_manager(enterprise.id, user_id)
        .await?
    {
        return Err(Error::NotFound("Manager not found".to_string()));
    }

    tracing::info!(enterprise_id = %enterprise.id, manager_id = %user_id, "Manager removed");
    Ok(StatusCode::NO_CONTENT)
}
