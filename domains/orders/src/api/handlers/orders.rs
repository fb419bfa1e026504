//! Order API handlers
//!
//! Orders are visible to admins and to the owners and managers of the
//! distributing enterprise.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use foodhub_auth::{AuthContext, AuthUser};
use foodhub_common::{cents_to_decimal, Error, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::middleware::OrdersState;
use crate::repository::transactions::{
    create_line_item_tx, get_order_tx, line_items_tx, payments_tx, update_order_tx,
};
use crate::{
    LineItem, NewLineItem, Order, OrderEvent, OrderPaymentState, OrderState, OrderStateMachine,
    Payment, PaymentMethod, PaymentState, ShipmentState,
};

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub distributor_id: Uuid,
    pub email: String,
    #[serde(default)]
    pub line_items: Vec<NewLineItem>,
}

#[derive(Debug, Deserialize)]
pub struct ApplyVoucherRequest {
    #[serde(default)]
    pub code: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListOrdersQuery {
    pub state: Option<OrderState>,
}

/// Order response DTO
#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub id: Uuid,
    pub number: String,
    pub distributor_id: Uuid,
    pub email: String,
    pub state: OrderState,
    pub shipment_state: ShipmentState,
    pub payment_state: Option<OrderPaymentState>,
    pub item_total: Decimal,
    pub voucher_code: Option<String>,
    pub voucher_discount: Decimal,
    pub total: Decimal,
    pub completed_at: Option<DateTime<Utc>>,
    pub canceled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Order> for OrderResponse {
    fn from(o: Order) -> Self {
        Self {
            id: o.id,
            number: o.number,
            distributor_id: o.distributor_id,
            email: o.email,
            state: o.state,
            shipment_state: o.shipment_state,
            payment_state: o.payment_state,
            item_total: cents_to_decimal(o.item_total_cents),
            voucher_code: o.voucher_code,
            voucher_discount: cents_to_decimal(o.voucher_discount_cents),
            total: cents_to_decimal(o.total_cents),
            completed_at: o.completed_at,
            canceled_at: o.canceled_at,
            created_at: o.created_at,
            updated_at: o.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LineItemResponse {
    pub id: Uuid,
    pub name: String,
    pub quantity: i64,
    pub price: Decimal,
    pub amount: Decimal,
}

impl From<LineItem> for LineItemResponse {
    fn from(item: LineItem) -> Self {
        Self {
            amount: cents_to_decimal(item.amount_cents()),
            price: cents_to_decimal(item.price_cents),
            id: item.id,
            name: item.name,
            quantity: item.quantity,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PaymentResponse {
    pub id: Uuid,
    pub order_id: Uuid,
    pub payment_method: PaymentMethod,
    pub state: PaymentState,
    pub amount: Decimal,
    pub response_code: Option<String>,
    pub failure_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Payment> for PaymentResponse {
    fn from(p: Payment) -> Self {
        Self {
            id: p.id,
            order_id: p.order_id,
            payment_method: p.payment_method,
            state: p.state,
            amount: cents_to_decimal(p.amount_cents),
            response_code: p.response_code,
            failure_reason: p.failure_reason,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

/// Order with its line items and payments
#[derive(Debug, Serialize)]
pub struct OrderDetailResponse {
    #[serde(flatten)]
    pub order: OrderResponse,
    pub line_items: Vec<LineItemResponse>,
    pub payments: Vec<PaymentResponse>,
}

/// Load an order the subject may see.
///
/// Unknown ids are 404; orders of other distributors are 403.
pub(crate) async fn load_visible(
    state: &OrdersState,
    ctx: &AuthContext,
    id: Uuid,
) -> Result<Order> {
    let order = state
        .repos
        .orders
        .get_by_id(id)
        .await?
        .ok_or_else(|| Error::NotFound("Order not found".to_string()))?;
    ctx.require_manage_enterprise(order.distributor_id)?;
    Ok(order)
}

pub(crate) async fn order_detail(state: &OrdersState, order_id: Uuid) -> Result<OrderDetailResponse> {
    let order = state
        .repos
        .orders
        .get_by_id(order_id)
        .await?
        .ok_or_else(|| Error::NotFound("Order not found".to_string()))?;
    let line_items = state.repos.orders.line_items(order_id).await?;
    let payments = state.repos.payments.list_for_order(order_id).await?;

    Ok(OrderDetailResponse {
        order: order.into(),
        line_items: line_items.into_iter().map(Into::into).collect(),
        payments: payments.into_iter().map(Into::into).collect(),
    })
}

fn require_cart(order: &Order, message: &str) -> Result<()> {
    if order.state == OrderState::Cart {
        Ok(())
    } else {
        Err(Error::Validation(message.to_string()))
    }
}

/// **GET /admin/orders**
pub async fn list_orders(
    AuthUser(ctx): AuthUser,
    State(state): State<OrdersState>,
    Query(query): Query<ListOrdersQuery>,
) -> Result<Json<Vec<OrderResponse>>> {
    let orders = if ctx.is_admin() {
        state.repos.orders.list(None, query.state).await?
    } else {
        let managed = ctx.managed_enterprise_ids();
        state.repos.orders.list(Some(&managed), query.state).await?
    };

    Ok(Json(orders.into_iter().map(Into::into).collect()))
}

/// **POST /admin/orders**
pub async fn create_order(
    AuthUser(ctx): AuthUser,
    State(state): State<OrdersState>,
    Json(request): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderDetailResponse>)> {
    ctx.require_manage_enterprise(request.distributor_id)?;

    let mut order = Order::new(request.distributor_id, Some(ctx.user.id), &request.email, &[])?;
    let line_items = request
        .line_items
        .into_iter()
        .map(|item| item.into_line_item(order.id))
        .collect::<Result<Vec<_>>>()?;
    order.recalculate(&line_items, None)?;

    let order = state.repos.orders.create(&order, &line_items).await?;
    tracing::info!(
        user_id = %ctx.user.id,
        order_id = %order.id,
        number = %order.number,
        distributor_id = %order.distributor_id,
        "Order created"
    );

    Ok((StatusCode::CREATED, Json(order_detail(&state, order.id).await?)))
}

/// **GET /admin/orders/{id}**
pub async fn get_order(
    AuthUser(ctx): AuthUser,
    State(state): State<OrdersState>,
    Path(id): Path<Uuid>,
) -> Result<Json<OrderDetailResponse>> {
    let order = load_visible(&state, &ctx, id).await?;
    Ok(Json(order_detail(&state, order.id).await?))
}

/// **POST /admin/orders/{id}/line_items**
///
/// Carts only. Keeps an applied voucher and recomputes its discount; a
/// voucher deleted since it was applied is dropped from the order.
pub async fn add_line_item(
    AuthUser(ctx): AuthUser,
    State(state): State<OrdersState>,
    Path(id): Path<Uuid>,
    Json(request): Json<NewLineItem>,
) -> Result<(StatusCode, Json<OrderDetailResponse>)> {
    let order = load_visible(&state, &ctx, id).await?;
    require_cart(&order, "Line items can only be changed while the order is a cart")?;

    let item = request.into_line_item(order.id)?;
    let voucher = match order.voucher_code.as_deref() {
        Some(code) => {
            let found = state.vouchers.find_by_code(order.distributor_id, code).await?;
            if found.is_none() {
                tracing::warn!(order_id = %order.id, code = %code, "Applied voucher no longer exists, removing discount");
            }
            found
        }
        None => None,
    };

    let mut tx = state.repos.begin().await?;
    let mut current = get_order_tx(&mut tx, id)
        .await?
        .ok_or_else(|| Error::NotFound("Order not found".to_string()))?;
    require_cart(&current, "Line items can only be changed while the order is a cart")?;
    if current.voucher_code != order.voucher_code {
        return Err(Error::Conflict("Order was changed by another request".to_string()));
    }

    create_line_item_tx(&mut tx, &item).await?;
    let items = line_items_tx(&mut tx, current.id).await?;
    current.recalculate(&items, voucher.as_ref())?;
    update_order_tx(&mut tx, &current).await?;
    tx.commit().await?;

    tracing::info!(order_id = %current.id, line_item_id = %item.id, "Line item added");
    Ok((StatusCode::CREATED, Json(order_detail(&state, current.id).await?)))
}

/// **POST /admin/orders/{id}/voucher**
pub async fn apply_voucher(
    AuthUser(ctx): AuthUser,
    State(state): State<OrdersState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ApplyVoucherRequest>,
) -> Result<Json<OrderDetailResponse>> {
    let order = load_visible(&state, &ctx, id).await?;
    require_cart(&order, "Vouchers can only be applied to cart orders")?;

    let code = request.code.trim();
    let voucher = state
        .vouchers
        .find_by_code(order.distributor_id, code)
        .await?
        .ok_or_else(|| {
            Error::Validation(format!("Voucher code '{}' is not valid for this shop", code))
        })?;

    let mut tx = state.repos.begin().await?;
    let mut order = get_order_tx(&mut tx, id)
        .await?
        .ok_or_else(|| Error::NotFound("Order not found".to_string()))?;
    require_cart(&order, "Vouchers can only be applied to cart orders")?;

    let items = line_items_tx(&mut tx, order.id).await?;
    order.recalculate(&items, Some(&voucher))?;
    update_order_tx(&mut tx, &order).await?;
    tx.commit().await?;

    tracing::info!(
        order_id = %order.id,
        code = %voucher.code,
        discount_cents = order.voucher_discount_cents,
        "Voucher applied"
    );
    Ok(Json(order_detail(&state, order.id).await?))
}

/// **POST /admin/orders/{id}/resume**
pub async fn resume_order(
    AuthUser(ctx): AuthUser,
    State(state): State<OrdersState>,
    Path(id): Path<Uuid>,
) -> Result<Json<OrderDetailResponse>> {
    load_visible(&state, &ctx, id).await?;

    let mut tx = state.repos.begin().await?;
    let mut order = get_order_tx(&mut tx, id)
        .await?
        .ok_or_else(|| Error::NotFound("Order not found".to_string()))?;
    let next = OrderStateMachine::transition(order.state, OrderEvent::Resume, None)?;
    order.apply_state(next);

    let payments = payments_tx(&mut tx, order.id).await?;
    order.refresh_payment_state(&payments);
    update_order_tx(&mut tx, &order).await?;
    tx.commit().await?;

    tracing::info!(user_id = %ctx.user.id, order_id = %order.id, number = %order.number, "Order resumed");
    Ok(Json(order_detail(&state, order.id).await?))
}
