//! Enterprise group handlers
//!
//! Admins see and edit every group. A group owner may read and edit their
//! own groups but not create or delete groups.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use foodhub_auth::{AuthContext, AuthUser, SuperAdmin};
use foodhub_common::{Error, Result};
use serde::Deserialize;
use uuid::Uuid;

use crate::api::middleware::EnterprisesState;
use crate::{dedup_ids, validate_name, EnterpriseGroup, EnterpriseGroupDetail, MoveDirection};

#[derive(Debug, Deserialize)]
pub struct CreateGroupRequest {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub on_front_page: bool,
    /// Defaults to the creating admin
    pub owner_id: Option<Uuid>,
    #[serde(default)]
    pub enterprise_ids: Vec<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateGroupRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub on_front_page: Option<bool>,
    pub owner_id: Option<Uuid>,
    /// Replaces the ordered member list when present
    pub enterprise_ids: Option<Vec<Uuid>>,
}

async fn load_editable(
    state: &EnterprisesState,
    ctx: &AuthContext,
    id: Uuid,
) -> Result<EnterpriseGroup> {
    let group = state
        .repos
        .groups
        .get_by_id(id)
        .await?
        .ok_or_else(|| Error::NotFound("Enterprise group not found".to_string()))?;

    if !ctx.is_admin() && group.owner_id != Some(ctx.user.id) {
        return Err(Error::Authorization(format!(
            "User {} cannot edit enterprise group {}",
            ctx.user.id, group.id
        )));
    }
    Ok(group)
}

/// **GET /admin/enterprise_groups**
pub async fn list_groups(
    AuthUser(ctx): AuthUser,
    State(state): State<EnterprisesState>,
) -> Result<Json<Vec<EnterpriseGroup>>> {
    let owner = (!ctx.is_admin()).then_some(ctx.user.id);
    Ok(Json(state.repos.groups.list(owner).await?))
}

/// **POST /admin/enterprise_groups**
pub async fn create_group(
    SuperAdmin(ctx): SuperAdmin,
    State(state): State<EnterprisesState>,
    Json(request): Json<CreateGroupRequest>,
) -> Result<(StatusCode, Json<EnterpriseGroupDetail>)> {
    let group = EnterpriseGroup::new(
        &request.name,
        request.description,
        request.on_front_page,
        Some(request.owner_id.unwrap_or(ctx.user.id)),
    )?;
    let detail = state
        .repos
        .groups
        .create(&group, &dedup_ids(&request.enterprise_ids))
        .await?;

    tracing::info!(user_id = %ctx.user.id, group_id = %detail.group.id, name = %detail.group.name, "Enterprise group created");
    Ok((StatusCode::CREATED, Json(detail)))
}

/// **GET /admin/enterprise_groups/{id}**
pub async fn get_group(
    AuthUser(ctx): AuthUser,
    State(state): State<EnterprisesState>,
    Path(id): Path<Uuid>,
) -> Result<Json<EnterpriseGroupDetail>> {
    let group = load_editable(&state, &ctx, id).await?;
    let enterprises = state.repos.groups.members(group.id).await?;
    Ok(Json(EnterpriseGroupDetail { group, enterprises }))
}

/// **PATCH /admin/enterprise_groups/{id}**
///
/// Only admins may hand a group to another owner.
pub async fn update_group(
    AuthUser(ctx): AuthUser,
    State(state): State<EnterprisesState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateGroupRequest>,
) -> Result<Json<EnterpriseGroupDetail>> {
    let mut group = load_editable(&state, &ctx, id).await?;

    if let Some(name) = request.name {
        group.name = validate_name(&name)?;
    }
    if let Some(description) = request.description {
        group.description = description;
    }
    if let Some(on_front_page) = request.on_front_page {
        group.on_front_page = on_front_page;
    }
    if let Some(owner_id) = request.owner_id {
        if group.owner_id != Some(owner_id) {
            ctx.require_admin()?;
            group.owner_id = Some(owner_id);
        }
    }

    let enterprise_ids = request.enterprise_ids.as_deref().map(dedup_ids);
    let detail = state
        .repos
        .groups
        .update(&group, enterprise_ids.as_deref())
        .await?;

    tracing::info!(user_id = %ctx.user.id, group_id = %detail.group.id, "Enterprise group updated");
    Ok(Json(detail))
}

/// **DELETE /admin/enterprise_groups/{id}**
pub async fn delete_group(
    SuperAdmin(ctx): SuperAdmin,
    State(state): State<EnterprisesState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    if !state.repos.groups.delete(id).await? {
        return Err(Error::NotFound("Enterprise group not found".to_string()));
    }

    tracing::info!(user_id = %ctx.user.id, group_id = %id, "Enterprise group deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// **POST /admin/enterprise_groups/{id}/move_up**
pub async fn move_up(
    admin: SuperAdmin,
    state: State<EnterprisesState>,
    path: Path<Uuid>,
) -> Result<Json<Vec<EnterpriseGroup>>> {
    move_group(admin, state, path, MoveDirection::Up).await
}

/// **POST /admin/enterprise_groups/{id}/move_down**
pub async fn move_down(
    admin: SuperAdmin,
    state: State<EnterprisesState>,
    path: Path<Uuid>,
) -> Result<Json<Vec<EnterpriseGroup>>> {
    move_group(admin, state, path, MoveDirection::Down).await
}

/// Answers with every group in its new order
async fn move_group(
    SuperAdmin(ctx): SuperAdmin,
    State(state): State<EnterprisesState>,
    Path(id): Path<Uuid>,
    direction: MoveDirection,
) -> Result<Json<Vec<EnterpriseGroup>>> {
    let moved = state.repos.groups.move_group(id, direction).await?;
    tracing::debug!(user_id = %ctx.user.id, group_id = %id, ?direction, moved, "Enterprise group reordered");

    Ok(Json(state.repos.groups.list(None).await?))
}
