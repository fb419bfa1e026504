//! Voucher API handlers
//!
//! Owners, managers and admins of the enterprise may manage its vouchers.
//! A rejected create persists nothing.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use foodhub_auth::AuthUser;
use foodhub_common::{Error, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::middleware::VouchersState;
use crate::{Voucher, VoucherType};

#[derive(Debug, Deserialize)]
pub struct CreateVoucherRequest {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub voucher_type: VoucherType,
    pub amount: Decimal,
}

#[derive(Debug, Serialize)]
pub struct VoucherResponse {
    pub id: Uuid,
    pub enterprise_id: Uuid,
    pub code: String,
    pub voucher_type: VoucherType,
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
}

impl From<Voucher> for VoucherResponse {
    fn from(voucher: Voucher) -> Self {
        Self {
            amount: voucher.amount(),
            id: voucher.id,
            enterprise_id: voucher.enterprise_id,
            code: voucher.code,
            voucher_type: voucher.voucher_type,
            created_at: voucher.created_at,
        }
    }
}

/// **GET /admin/enterprises/{id}/vouchers**
pub async fn list_vouchers(
    AuthUser(ctx): AuthUser,
    State(state): State<VouchersState>,
    Path(enterprise_id): Path<Uuid>,
) -> Result<Json<Vec<VoucherResponse>>> {
    ctx.require_manage_enterprise(enterprise_id)?;

    let vouchers = state.vouchers.list_for_enterprise(enterprise_id).await?;
    Ok(Json(vouchers.into_iter().map(VoucherResponse::from).collect()))
}

/// **POST /admin/enterprises/{id}/vouchers**
pub async fn create_voucher(
    AuthUser(ctx): AuthUser,
    State(state): State<VouchersState>,
    Path(enterprise_id): Path<Uuid>,
    Json(request): Json<CreateVoucherRequest>,
) -> Result<(StatusCode, Json<VoucherResponse>)> {
    ctx.require_manage_enterprise(enterprise_id)?;

    let voucher = Voucher::new(
        enterprise_id,
        &request.code,
        request.voucher_type,
        request.amount,
    )?;
    let created = state.vouchers.create(&voucher).await?;

    tracing::info!(
        user_id = %ctx.user.id,
        enterprise_id = %enterprise_id,
        code = %created.code,
        voucher_type = %created.voucher_type,
        "Voucher created"
    );
    Ok((StatusCode::CREATED, Json(created.into())))
}

/// **GET /admin/enterprises/{id}/vouchers/{code}**
pub async fn get_voucher(
    AuthUser(ctx): AuthUser,
    State(state): State<VouchersState>,
    Path((enterprise_id, code)): Path<(Uuid, String)>,
) -> Result<Json<VoucherResponse>> {
    ctx.require_manage_enterprise(enterprise_id)?;

    state
        .vouchers
        .find_by_code(enterprise_id, &code)
        .await?
        .map(|v| Json(v.into()))
        .ok_or_else(|| Error::NotFound(format!("Voucher {} not found", code)))
}

/// **DELETE /admin/enterprises/{id}/vouchers/{code}**
pub async fn delete_voucher(
    AuthUser(ctx): AuthUser,
    State(state): State<VouchersState>,
    Path((enterprise_id, code)): Path<(Uuid, String)>,
) -> Result<StatusCode> {
    ctx.require_manage_enterprise(enterprise_id)?;

    if !state.vouchers.delete(enterprise_id, &code).await? {
        return Err(Error::NotFound(format!("Voucher {} not found", code)));
    }

    tracing::info!(user_id = %ctx.user.id, enterprise_id = %enterprise_id, code = %code, "Voucher deleted");
    Ok(StatusCode::NO_CONTENT)
}
