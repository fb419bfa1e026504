//! Checkout and new-payment handlers
//!
//! Checkout moves a cart to the payment step and opens a payment for the
//! order total. While an order awaits payment a new payment can be opened
//! for the balance, e.g. after a decline. Gateway payments are authorized
//! after the transaction commits.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use foodhub_auth::AuthUser;
use foodhub_common::{Error, Result};
use foodhub_payments::AuthorizeRequest;
use serde::Deserialize;
use uuid::Uuid;

use super::orders::{load_visible, order_detail, OrderDetailResponse};
use crate::api::middleware::OrdersState;
use crate::repository::payments::payment_changed;
use crate::repository::transactions::{
    create_payment_tx, get_order_tx, line_items_tx, payments_tx, update_order_tx,
    update_payment_tx,
};
use crate::{
    completed_total, OrderEvent, OrderGuardContext, OrderState, OrderStateMachine, Payment,
    PaymentEvent, PaymentMethod, PaymentState, PaymentStateMachine,
};

#[derive(Debug, Deserialize)]
pub struct PaymentMethodRequest {
    pub payment_method: PaymentMethod,
}

/// New payment for `amount_cents`. Offline payments are authorized at once.
fn open_payment(order_id: Uuid, method: PaymentMethod, amount_cents: i64) -> Result<Payment> {
    let mut payment = Payment::new(order_id, method, amount_cents);
    if method == PaymentMethod::Check {
        payment.set_state(PaymentStateMachine::transition(
            payment.state,
            PaymentEvent::Authorize,
        )?);
    }
    Ok(payment)
}

/// **POST /admin/orders/{id}/checkout**
///
/// A gateway decline leaves the order in `payment` with a failed payment
/// and answers 422.
pub async fn checkout(
    AuthUser(ctx): AuthUser,
    State(state): State<OrdersState>,
    Path(id): Path<Uuid>,
    Json(request): Json<PaymentMethodRequest>,
) -> Result<Json<OrderDetailResponse>> {
    load_visible(&state, &ctx, id).await?;

    let mut tx = state.repos.begin().await?;
    let mut order = get_order_tx(&mut tx, id)
        .await?
        .ok_or_else(|| Error::NotFound("Order not found".to_string()))?;

    let guard = OrderGuardContext {
        line_item_count: line_items_tx(&mut tx, order.id).await?.len(),
        is_paid: false,
    };
    let next = OrderStateMachine::transition(order.state, OrderEvent::Checkout, Some(&guard))?;
    order.apply_state(next);

    let payment = open_payment(order.id, request.payment_method, order.total_cents)?;
    create_payment_tx(&mut tx, &payment).await?;

    let payments = payments_tx(&mut tx, order.id).await?;
    order.refresh_payment_state(&payments);
    update_order_tx(&mut tx, &order).await?;
    tx.commit().await?;

    tracing::info!(
        order_id = %order.id,
        number = %order.number,
        payment_id = %payment.id,
        payment_method = %payment.payment_method,
        "Order checked out"
    );

    if payment.payment_method == PaymentMethod::Gateway {
        authorize_with_gateway(&state, &order.number, payment).await?;
    }

    Ok(Json(order_detail(&state, order.id).await?))
}

/// **POST /admin/orders/{id}/payments**
///
/// Opens a payment for the outstanding balance of an order in `payment`
/// state. Rejected while another payment is still open.
pub async fn add_payment(
    AuthUser(ctx): AuthUser,
    State(state): State<OrdersState>,
    Path(id): Path<Uuid>,
    Json(request): Json<PaymentMethodRequest>,
) -> Result<(StatusCode, Json<OrderDetailResponse>)> {
    load_visible(&state, &ctx, id).await?;

    let mut tx = state.repos.begin().await?;
    let mut order = get_order_tx(&mut tx, id)
        .await?
        .ok_or_else(|| Error::NotFound("Order not found".to_string()))?;
    if order.state != OrderState::Payment {
        return Err(Error::Validation(format!(
            "Cannot add a payment from '{}' state",
            order.state
        )));
    }

    let payments = payments_tx(&mut tx, order.id).await?;
    if payments.iter().any(|p| p.state.is_open()) {
        return Err(Error::Validation(
            "Order already has a payment in progress".to_string(),
        ));
    }
    let balance = order.total_cents - completed_total(&payments);
    if balance <= 0 {
        return Err(Error::Validation("Order has no balance due".to_string()));
    }

    let payment = open_payment(order.id, request.payment_method, balance)?;
    create_payment_tx(&mut tx, &payment).await?;

    let payments = payments_tx(&mut tx, order.id).await?;
    order.refresh_payment_state(&payments);
    update_order_tx(&mut tx, &order).await?;
    tx.commit().await?;

    tracing::info!(
        user_id = %ctx.user.id,
        order_id = %order.id,
        payment_id = %payment.id,
        payment_method = %payment.payment_method,
        amount_cents = payment.amount_cents,
        "Payment added"
    );

    if payment.payment_method == PaymentMethod::Gateway {
        authorize_with_gateway(&state, &order.number, payment).await?;
    }

    Ok((StatusCode::CREATED, Json(order_detail(&state, order.id).await?)))
}

/// Ask the gateway to hold the funds, then record the outcome.
async fn authorize_with_gateway(
    state: &OrdersState,
    order_number: &str,
    mut payment: Payment,
) -> Result<()> {
    let result = state
        .gateway
        .authorize(AuthorizeRequest {
            order_number: order_number.to_string(),
            amount_cents: payment.amount_cents,
            currency: state.currency.code.clone(),
        })
        .await;

    let failure = match result {
        Ok(intent) => {
            let event = if intent.status.needs_customer_action() {
                PaymentEvent::RequireAuthorization
            } else {
                PaymentEvent::Authorize
            };
            payment.response_code = Some(intent.id);
            payment.set_state(PaymentStateMachine::transition(payment.state, event)?);
            None
        }
        Err(e) => {
            let reason = e.reason();
            tracing::warn!(payment_id = %payment.id, error = %e, "Gateway authorization failed");
            payment.failure_reason = Some(reason.clone());
            payment.set_state(PaymentStateMachine::transition(payment.state, PaymentEvent::Fail)?);
            Some(reason)
        }
    };

    let mut tx = state.repos.begin().await?;
    if !update_payment_tx(&mut tx, &payment, PaymentState::Checkout).await? {
        return Err(payment_changed());
    }
    if let Some(mut order) = get_order_tx(&mut tx, payment.order_id).await? {
        let payments = payments_tx(&mut tx, order.id).await?;
        order.refresh_payment_state(&payments);
        update_order_tx(&mut tx, &order).await?;
    }
    tx.commit().await?;

    match failure {
        Some(reason) => Err(Error::PaymentFailed(reason)),
        None => Ok(()),
    }
}
