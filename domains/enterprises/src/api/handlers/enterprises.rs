//! Enterprise management API handlers
//!
//! Owners, managers and admins may read and edit an enterprise; only the
//! owner or an admin may delete it.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use foodhub_auth::{AuthContext, AuthUser};
use foodhub_common::{Error, Result};
use serde::Deserialize;
use uuid::Uuid;

use crate::api::middleware::EnterprisesState;
use crate::{validate_name, Address, Enterprise, SellsMode, Visibility};

#[derive(Debug, Deserialize)]
pub struct CreateEnterpriseRequest {
    pub name: String,
    /// Admins may create enterprises on behalf of another user
    pub owner_id: Option<Uuid>,
    pub visibility: Option<Visibility>,
    pub sells: Option<SellsMode>,
    #[serde(default)]
    pub is_primary_producer: bool,
    #[serde(default)]
    pub address: Address,
}

#[derive(Debug, Deserialize)]
pub struct UpdateEnterpriseRequest {
    pub name: Option<String>,
    pub visibility: Option<Visibility>,
    pub sells: Option<SellsMode>,
    pub is_primary_producer: Option<bool>,
    pub address: Option<Address>,
}

impl UpdateEnterpriseRequest {
    fn apply(self, mut enterprise: Enterprise) -> Result<Enterprise> {
        if let Some(name) = self.name {
            enterprise.name = validate_name(&name)?;
        }
        if let Some(visibility) = self.visibility {
            enterprise.visibility = visibility;
        }
        if let Some(sells) = self.sells {
            enterprise.sells = sells;
        }
        if let Some(is_primary_producer) = self.is_primary_producer {
            enterprise.is_primary_producer = is_primary_producer;
        }
        if let Some(address) = self.address {
            enterprise.address = address;
        }
        Ok(enterprise)
    }
}

/// Load an enterprise the subject may manage.
///
/// Unknown ids are 404 for everyone; existing enterprises outside the
/// subject's reach are 403.
pub(crate) async fn load_managed(
    state: &EnterprisesState,
    ctx: &AuthContext,
    id: Uuid,
) -> Result<Enterprise> {
    let enterprise = state
        .repos
        .enterprises
        .get_by_id(id)
        .await?
        .ok_or_else(|| Error::NotFound("Enterprise not found".to_string()))?;
    ctx.require_manage_enterprise(enterprise.id)?;
    Ok(enterprise)
}

fn require_owner_or_admin(ctx: &AuthContext, enterprise: &Enterprise) -> Result<()> {
    if ctx.is_admin() || enterprise.owner_id == ctx.user.id {
        Ok(())
    } else {
        Err(Error::Authorization(format!(
            "User {} does not own enterprise {}",
            ctx.user.id, enterprise.id
        )))
    }
}

/// **GET /admin/enterprises**
pub async fn list_enterprises(
    AuthUser(ctx): AuthUser,
    State(state): State<EnterprisesState>,
) -> Result<Json<Vec<Enterprise>>> {
    let enterprises = if ctx.is_admin() {
        state.repos.enterprises.list_all().await?
    } else {
        state.repos.enterprises.list_for_user(ctx.user.id).await?
    };
    Ok(Json(enterprises))
}

/// **POST /admin/enterprises**
///
/// **Business Rules:**
/// - The owner is the current user unless an admin names another one
/// - An owner cannot exceed their enterprise limit
/// - Names are required and unique
pub async fn create_enterprise(
    AuthUser(ctx): AuthUser,
    State(state): State<EnterprisesState>,
    Json(request): Json<CreateEnterpriseRequest>,
) -> Result<(StatusCode, Json<Enterprise>)> {
    let owner_id = match request.owner_id {
        Some(owner_id) if owner_id != ctx.user.id => {
            ctx.require_admin()?;
            owner_id
        }
        _ => ctx.user.id,
    };

    let mut enterprise = Enterprise::new(&request.name, owner_id)?;
    enterprise.visibility = request.visibility.unwrap_or_default();
    enterprise.sells = request.sells.unwrap_or_default();
    enterprise.is_primary_producer = request.is_primary_producer;
    enterprise.address = request.address;

    let created = state.repos.enterprises.create(&enterprise).await?;

    tracing::info!(user_id = %ctx.user.id, enterprise_id = %created.id, owner_id = %created.owner_id, "Enterprise created");
    Ok((StatusCode::CREATED, Json(created)))
}

/// **GET /admin/enterprises/{id}**
pub async fn get_enterprise(
    AuthUser(ctx): AuthUser,
    State(state): State<EnterprisesState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Enterprise>> {
    load_managed(&state, &ctx, id).await.map(Json)
}

/// **PATCH /admin/enterprises/{id}**
pub async fn update_enterprise(
    AuthUser(ctx): AuthUser,
    State(state): State<EnterprisesState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateEnterpriseRequest>,
) -> Result<Json<Enterprise>> {
    let enterprise = load_managed(&state, &ctx, id).await?;
    let enterprise = request.apply(enterprise)?;
    let updated = state.repos.enterprises.update(&enterprise).await?;

    tracing::info!(user_id = %ctx.user.id, enterprise_id = %updated.id, "Enterprise updated");
    Ok(Json(updated))
}

/// **DELETE /admin/enterprises/{id}**
pub async fn delete_enterprise(
    AuthUser(ctx): AuthUser,
    State(state): State<EnterprisesState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    let enterprise = state
        .repos
        .enterprises
        .get_by_id(id)
        .await?
        .ok_or_else(|| Error::NotFound("Enterprise not found".to_string()))?;
    require_owner_or_admin(&ctx, &enterprise)?;

    state.repos.enterprises.delete(id).await?;

    tracing::info!(user_id = %ctx.user.id, enterprise_id = %id, "Enterprise deleted");
    Ok(StatusCode::NO_CONTENT)
}
