//! Order cancellation handlers
//!
//! Cancelling writes the order state, shipment state and payment voids in
//! one transaction. Gateway releases and customer emails happen after the
//! commit and never fail the request.

use std::collections::HashSet;

use axum::{
    extract::{Path, State},
    Json,
};
use foodhub_auth::{AuthContext, AuthUser};
use foodhub_common::{cents_to_decimal, Error, Result};
use foodhub_email::OrderCancellation;
use serde::{Deserialize, Serialize};
use sqlx::{Sqlite, Transaction};
use uuid::Uuid;

use super::orders::{load_visible, order_detail, OrderDetailResponse};
use crate::api::middleware::OrdersState;
use crate::repository::payments::payment_changed;
use crate::repository::transactions::{
    get_order_tx, payments_tx, update_order_tx, update_payment_tx,
};
use crate::{
    Order, OrderEvent, OrderState, OrderStateMachine, Payment, PaymentEvent, PaymentMethod,
    PaymentState, PaymentStateMachine,
};

#[derive(Debug, Default, Deserialize)]
pub struct CancelOrderRequest {
    #[serde(default)]
    pub send_cancellation_email: bool,
}

#[derive(Debug, Deserialize)]
pub struct BulkCancelRequest {
    #[serde(default)]
    pub order_ids: Vec<Uuid>,
    #[serde(default)]
    pub send_cancellation_email: bool,
}

#[derive(Debug, Serialize)]
pub struct BulkCancelResponse {
    /// Numbers of the orders canceled by this request
    pub canceled: Vec<String>,
    /// Numbers of selected orders that were already canceled
    pub skipped: Vec<String>,
}

/// An order canceled in the current transaction
struct CanceledOrder {
    order: Order,
    /// Gateway authorizations to release once committed
    released: Vec<Payment>,
}

/// Cancel `order` inside `tx`, voiding its open payments.
async fn cancel_in_tx(tx: &mut Transaction<'_, Sqlite>, mut order: Order) -> Result<CanceledOrder> {
    let next = OrderStateMachine::transition(order.state, OrderEvent::Cancel, None)?;
    order.apply_state(next);

    let mut released = Vec::new();
    let mut payments = payments_tx(tx, order.id).await?;
    for payment in payments.iter_mut() {
        if payment.state == PaymentState::Completed
            || !PaymentStateMachine::can_transition(payment.state, &PaymentEvent::Void)
        {
            continue;
        }
        let held_by_gateway = payment.payment_method == PaymentMethod::Gateway
            && payment.response_code.is_some()
            && matches!(
                payment.state,
                PaymentState::Pending | PaymentState::RequiresAuthorization
            );

        let previous = payment.state;
        payment.set_state(PaymentStateMachine::transition(previous, PaymentEvent::Void)?);
        if !update_payment_tx(tx, payment, previous).await? {
            return Err(payment_changed());
        }
        if held_by_gateway {
            released.push(payment.clone());
        }
    }

    order.refresh_payment_state(&payments);
    update_order_tx(tx, &order).await?;
    Ok(CanceledOrder { order, released })
}

/// Release gateway holds and notify the customer. Failures are logged.
async fn after_cancel(state: &OrdersState, canceled: &CanceledOrder, send_email: bool) {
    for payment in &canceled.released {
        if let Some(intent_id) = payment.response_code.as_deref() {
            if let Err(e) = state.gateway.cancel(intent_id).await {
                tracing::warn!(payment_id = %payment.id, error = %e, "Failed to release gateway authorization");
            }
        }
    }

    if send_email {
        send_cancellation_email(state, &canceled.order).await;
    }
}

async fn send_cancellation_email(state: &OrdersState, order: &Order) {
    let distributor_name = match state.repos.orders.distributor_name(order.distributor_id).await {
        Ok(name) => name.unwrap_or_default(),
        Err(e) => {
            tracing::warn!(order_id = %order.id, error = %e, "Failed to load distributor for cancellation email");
            String::new()
        }
    };
    let total = state.currency.format(cents_to_decimal(order.total_cents));

    let result = state
        .email
        .send_order_cancellation(OrderCancellation {
            order_number: &order.number,
            distributor_name: &distributor_name,
            recipient: &order.email,
            total: &total,
        })
        .await;

    match result {
        Ok(receipt) => {
            tracing::info!(order_id = %order.id, message_id = %receipt.message_id, "Cancellation email sent")
        }
        Err(e) => {
            tracing::warn!(order_id = %order.id, error = %e, "Failed to send cancellation email")
        }
    }
}

/// **POST /admin/orders/{id}/cancel**
///
/// Cancelling an already canceled order succeeds without changes.
pub async fn cancel_order(
    AuthUser(ctx): AuthUser,
    State(state): State<OrdersState>,
    Path(id): Path<Uuid>,
    request: Option<Json<CancelOrderRequest>>,
) -> Result<Json<OrderDetailResponse>> {
    let request = request.map(|Json(r)| r).unwrap_or_default();
    load_visible(&state, &ctx, id).await?;

    let mut tx = state.repos.begin().await?;
    let order = get_order_tx(&mut tx, id)
        .await?
        .ok_or_else(|| Error::NotFound("Order not found".to_string()))?;
    if order.state == OrderState::Canceled {
        tx.rollback().await?;
        return Ok(Json(order_detail(&state, id).await?));
    }

    let canceled = cancel_in_tx(&mut tx, order).await?;
    tx.commit().await?;

    tracing::info!(
        user_id = %ctx.user.id,
        order_id = %canceled.order.id,
        number = %canceled.order.number,
        "Order canceled"
    );
    after_cancel(&state, &canceled, request.send_cancellation_email).await;

    Ok(Json(order_detail(&state, id).await?))
}

/// **POST /admin/orders/bulk_cancel**
///
/// All or nothing: an unknown, foreign or unplaced order rejects the
/// whole selection.
pub async fn bulk_cancel(
    AuthUser(ctx): AuthUser,
    State(state): State<OrdersState>,
    Json(request): Json<BulkCancelRequest>,
) -> Result<Json<BulkCancelResponse>> {
    let order_ids = dedup(&request.order_ids);
    if order_ids.is_empty() {
        return Err(Error::Validation("No orders selected".to_string()));
    }

    let mut tx = state.repos.begin().await?;
    let mut selected = Vec::with_capacity(order_ids.len());
    for id in &order_ids {
        let order = get_order_tx(&mut tx, *id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Order {} not found", id)))?;
        check_cancelable(&ctx, &order)?;
        selected.push(order);
    }

    let mut canceled = Vec::new();
    let mut skipped = Vec::new();
    for order in selected {
        if order.state == OrderState::Canceled {
            skipped.push(order.number);
        } else {
            canceled.push(cancel_in_tx(&mut tx, order).await?);
        }
    }
    tx.commit().await?;

    tracing::info!(
        user_id = %ctx.user.id,
        canceled = canceled.len(),
        skipped = skipped.len(),
        "Orders bulk canceled"
    );
    for entry in &canceled {
        after_cancel(&state, entry, request.send_cancellation_email).await;
    }

    Ok(Json(BulkCancelResponse {
        canceled: canceled.into_iter().map(|c| c.order.number).collect(),
        skipped,
    }))
}

fn check_cancelable(ctx: &AuthContext, order: &Order) -> Result<()> {
    ctx.require_manage_enterprise(order.distributor_id)?;
    if order.state != OrderState::Canceled
        && !OrderStateMachine::can_transition(order.state, &OrderEvent::Cancel)
    {
        return Err(Error::Validation(format!(
            "Order {} cannot be canceled from '{}' state",
            order.number, order.state
        )));
    }
    Ok(())
}

/// Drop repeated ids, keeping first-seen order
fn dedup(ids: &[Uuid]) -> Vec<Uuid> {
    let mut seen = HashSet::new();
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}
