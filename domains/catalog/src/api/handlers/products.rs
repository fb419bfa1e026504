//! Product API handlers
//!
//! Products are visible to the owner and managers of their supplier, and
//! to admins.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use foodhub_auth::AuthUser;
use foodhub_common::{CurrencyConfig, Error, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::middleware::CatalogState;
use crate::{NewProduct, Product, VariantUnit};

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub supplier_id: Uuid,
    #[serde(default)]
    pub name: String,
    pub variant_unit: VariantUnit,
    pub variant_unit_scale: Option<f64>,
    pub variant_unit_name: Option<String>,
    pub unit_value: f64,
    pub price: Decimal,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListProductsQuery {
    pub supplier_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub id: Uuid,
    pub supplier_id: Uuid,
    pub name: String,
    pub variant_unit: VariantUnit,
    pub variant_unit_scale: Option<f64>,
    pub variant_unit_name: Option<String>,
    pub unit_value: f64,
    pub price: Decimal,
    pub price_display: String,
    pub unit_price: Option<Decimal>,
    pub unit_price_unit: Option<String>,
    /// e.g. `1.500,00 $ / kg`
    pub unit_price_display: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProductResponse {
    fn new(product: Product, currency: &CurrencyConfig) -> Self {
        let unit_price = product.unit_price();
        Self {
            price: product.price(),
            price_display: currency.format(product.price()),
            unit_price_display: unit_price.as_ref().map(|u| u.display(currency)),
            unit_price: unit_price.as_ref().map(|u| u.amount),
            unit_price_unit: unit_price.map(|u| u.unit),
            id: product.id,
            supplier_id: product.supplier_id,
            name: product.name,
            variant_unit: product.variant_unit,
            variant_unit_scale: product.variant_unit_scale,
            variant_unit_name: product.variant_unit_name,
            unit_value: product.unit_value,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

/// **GET /admin/products**
///
/// Without `supplier_id`, admins see every product and others see the
/// products of the enterprises they manage.
pub async fn list_products(
    AuthUser(ctx): AuthUser,
    State(state): State<CatalogState>,
    Query(query): Query<ListProductsQuery>,
) -> Result<Json<Vec<ProductResponse>>> {
    let products = match query.supplier_id {
        Some(supplier_id) => {
            ctx.require_manage_enterprise(supplier_id)?;
            state.products.list(Some(&[supplier_id])).await?
        }
        None if ctx.is_admin() => state.products.list(None).await?,
        None => {
            let managed = ctx.managed_enterprise_ids();
            state.products.list(Some(&managed)).await?
        }
    };

    Ok(Json(
        products
            .into_iter()
            .map(|p| ProductResponse::new(p, &state.currency))
            .collect(),
    ))
}

/// **POST /admin/products**
pub async fn create_product(
    AuthUser(ctx): AuthUser,
    State(state): State<CatalogState>,
    Json(request): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>)> {
    ctx.require_manage_enterprise(request.supplier_id)?;

    let product = Product::new(NewProduct {
        supplier_id: request.supplier_id,
        name: request.name,
        variant_unit: request.variant_unit,
        variant_unit_scale: request.variant_unit_scale,
        variant_unit_name: request.variant_unit_name,
        unit_value: request.unit_value,
        price: request.price,
    })?;
    let created = state.products.create(&product).await?;

    tracing::info!(
        user_id = %ctx.user.id,
        product_id = %created.id,
        supplier_id = %created.supplier_id,
        "Product created"
    );
    Ok((
        StatusCode::CREATED,
        Json(ProductResponse::new(created, &state.currency)),
    ))
}

/// **GET /admin/products/{id}**
pub async fn get_product(
    AuthUser(ctx): AuthUser,
    State(state): State<CatalogState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProductResponse>> {
    let product = state
        .products
        .get_by_id(id)
        .await?
        .ok_or_else(|| Error::NotFound("Product not found".to_string()))?;
    ctx.require_manage_enterprise(product.supplier_id)?;

    Ok(Json(ProductResponse::new(product, &state.currency)))
}
