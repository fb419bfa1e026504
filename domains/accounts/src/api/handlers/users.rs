//! User administration handlers (admin only)

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use foodhub_auth::SuperAdmin;
use foodhub_common::{Error, Pagination, Result};
use serde::Deserialize;
use uuid::Uuid;

use crate::api::middleware::AccountsState;
use crate::{validate_enterprise_limit, NewUser, User, UserRole};

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: UserRole,
    pub enterprise_limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub role: Option<UserRole>,
    pub enterprise_limit: Option<i64>,
}

/// **GET /admin/users**
pub async fn list_users(
    SuperAdmin(_ctx): SuperAdmin,
    State(state): State<AccountsState>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Vec<User>>> {
    let users = state
        .repos
        .users
        .list(pagination.offset(), pagination.limit())
        .await?;
    Ok(Json(users))
}

/// **POST /admin/users**
///
/// New users get the configured default enterprise limit unless one is
/// given.
pub async fn create_user(
    SuperAdmin(ctx): SuperAdmin,
    State(state): State<AccountsState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>)> {
    let new_user = NewUser::new(
        &request.email,
        &request.password,
        request.role,
        request
            .enterprise_limit
            .unwrap_or(state.default_enterprise_limit),
    )?;
    let user = state.repos.users.create(&new_user).await?;

    tracing::info!(admin_id = %ctx.user.id, user_id = %user.id, role = %user.role, "User created");
    Ok((StatusCode::CREATED, Json(user)))
}

/// **GET /admin/users/{id}**
pub async fn get_user(
    SuperAdmin(_ctx): SuperAdmin,
    State(state): State<AccountsState>,
    Path(id): Path<Uuid>,
) -> Result<Json<User>> {
    state
        .repos
        .users
        .get_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| Error::NotFound("User not found".to_string()))
}

/// **PATCH /admin/users/{id}**
pub async fn update_user(
    SuperAdmin(ctx): SuperAdmin,
    State(state): State<AccountsState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<User>> {
    let existing = state
        .repos
        .users
        .get_by_id(id)
        .await?
        .ok_or_else(|| Error::NotFound("User not found".to_string()))?;

    let role = request.role.unwrap_or(existing.role);
    let enterprise_limit = request.enterprise_limit.unwrap_or(existing.enterprise_limit);
    validate_enterprise_limit(enterprise_limit)?;

    if id == ctx.user.id && role != UserRole::Admin {
        return Err(Error::Validation(
            "You cannot remove your own admin role".to_string(),
        ));
    }

    let user = state
        .repos
        .users
        .update_access(id, role, enterprise_limit)
        .await?
        .ok_or_else(|| Error::NotFound("User not found".to_string()))?;

    tracing::info!(admin_id = %ctx.user.id, user_id = %user.id, role = %user.role, enterprise_limit = user.enterprise_limit, "User updated");
    Ok(Json(user))
}
