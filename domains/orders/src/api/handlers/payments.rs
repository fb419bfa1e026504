//! Payment capture and void handlers
//!
//! Gateway calls never run inside a database transaction: the payment is
//! marked `processing` first, the gateway is called, then the outcome is
//! committed. A failed capture is committed before the 422 is returned.

use axum::{
    extract::{Path, State},
    Json,
};
use foodhub_auth::AuthUser;
use foodhub_common::{Error, Result};
use foodhub_payments::IntentStatus;
use uuid::Uuid;

use super::orders::{load_visible, order_detail, OrderDetailResponse, PaymentResponse};
use crate::api::middleware::OrdersState;
use crate::repository::payments::payment_changed;
use crate::repository::transactions::{
    get_order_tx, payments_tx, update_order_tx, update_payment_tx,
};
use crate::{
    Order, OrderEvent, OrderGuardContext, OrderState, OrderStateMachine, Payment, PaymentEvent,
    PaymentMethod, PaymentState, PaymentStateMachine,
};

async fn load_payment(state: &OrdersState, order: &Order, payment_id: Uuid) -> Result<Payment> {
    state
        .repos
        .payments
        .get(order.id, payment_id)
        .await?
        .ok_or_else(|| Error::NotFound("Payment not found".to_string()))
}

/// Write `payment` (still in state `from`), refresh the order's payment
/// state and complete the order once it is paid in full.
async fn commit_payment(
    state: &OrdersState,
    payment: &Payment,
    from: PaymentState,
) -> Result<()> {
    let mut tx = state.repos.begin().await?;
    if !update_payment_tx(&mut tx, payment, from).await? {
        return Err(payment_changed());
    }

    let mut order = get_order_tx(&mut tx, payment.order_id)
        .await?
        .ok_or_else(|| Error::NotFound("Order not found".to_string()))?;
    let payments = payments_tx(&mut tx, order.id).await?;

    if order.state == OrderState::Payment && order.is_paid(&payments) {
        let guard = OrderGuardContext {
            line_item_count: 0,
            is_paid: true,
        };
        let next = OrderStateMachine::transition(order.state, OrderEvent::Complete, Some(&guard))?;
        order.apply_state(next);
        tracing::info!(order_id = %order.id, number = %order.number, "Order complete");
    }
    order.refresh_payment_state(&payments);
    update_order_tx(&mut tx, &order).await?;

    tx.commit().await?;
    Ok(())
}

/// Ask the gateway to capture `payment`; the error is the failure reason.
async fn capture_with_gateway(state: &OrdersState, payment: &Payment) -> std::result::Result<(), String> {
    let Some(intent_id) = payment.response_code.as_deref() else {
        return Err("Payment has no gateway reference".to_string());
    };

    match state.gateway.capture(intent_id, payment.amount_cents).await {
        Ok(intent) if intent.status == IntentStatus::Succeeded => Ok(()),
        Ok(intent) => {
            tracing::warn!(payment_id = %payment.id, status = %intent.status, "Gateway capture did not succeed");
            Err(format!("Payment was not captured (gateway status: {})", intent.status))
        }
        Err(e) => {
            tracing::warn!(payment_id = %payment.id, error = %e, "Gateway capture failed");
            Err(e.reason())
        }
    }
}

/// **GET /admin/orders/{id}/payments**
pub async fn list_payments(
    AuthUser(ctx): AuthUser,
    State(state): State<OrdersState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<PaymentResponse>>> {
    let order = load_visible(&state, &ctx, id).await?;
    let payments = state.repos.payments.list_for_order(order.id).await?;
    Ok(Json(payments.into_iter().map(Into::into).collect()))
}

/// **POST /admin/orders/{id}/payments/{payment_id}/capture**
///
/// Offline payments complete immediately. Gateway payments complete only
/// when the gateway reports the intent `succeeded`; anything else marks
/// the payment `failed` and answers 422 with the reason. A payment already
/// being captured by another request answers 409.
pub async fn capture_payment(
    AuthUser(ctx): AuthUser,
    State(state): State<OrdersState>,
    Path((id, payment_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<OrderDetailResponse>> {
    let order = load_visible(&state, &ctx, id).await?;
    let mut payment = load_payment(&state, &order, payment_id).await?;

    let authorized = payment.state;
    payment.set_state(PaymentStateMachine::transition(
        payment.state,
        PaymentEvent::Capture,
    )?);
    state.repos.payments.transition(&payment, authorized).await?;

    let outcome = match payment.payment_method {
        PaymentMethod::Check => Ok(()),
        PaymentMethod::Gateway => capture_with_gateway(&state, &payment).await,
    };

    match outcome {
        Ok(()) => {
            payment.set_state(PaymentStateMachine::transition(
                payment.state,
                PaymentEvent::Complete,
            )?);
            commit_payment(&state, &payment, PaymentState::Processing).await?;
            tracing::info!(
                user_id = %ctx.user.id,
                order_id = %order.id,
                payment_id = %payment.id,
                "Payment captured"
            );
            Ok(Json(order_detail(&state, order.id).await?))
        }
        Err(reason) => {
            payment.failure_reason = Some(reason.clone());
            payment.set_state(PaymentStateMachine::transition(
                payment.state,
                PaymentEvent::Fail,
            )?);
            commit_payment(&state, &payment, PaymentState::Processing).await?;
            Err(Error::PaymentFailed(reason))
        }
    }
}

/// **POST /admin/orders/{id}/payments/{payment_id}/void**
///
/// Gateway payments are claimed as void first, then released (authorized)
/// or refunded (captured). A gateway error restores the previous state.
pub async fn void_payment(
    AuthUser(ctx): AuthUser,
    State(state): State<OrdersState>,
    Path((id, payment_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<OrderDetailResponse>> {
    let order = load_visible(&state, &ctx, id).await?;
    let mut payment = load_payment(&state, &order, payment_id).await?;
    let previous = payment.state;
    payment.set_state(PaymentStateMachine::transition(previous, PaymentEvent::Void)?);

    let written_from = match (payment.payment_method, payment.response_code.clone()) {
        (PaymentMethod::Gateway, Some(intent_id)) => {
            state.repos.payments.transition(&payment, previous).await?;

            let result = if previous == PaymentState::Completed {
                state
                    .gateway
                    .refund(&intent_id, payment.amount_cents)
                    .await
                    .map(|_| ())
            } else {
                state.gateway.cancel(&intent_id).await.map(|_| ())
            };

            if let Err(e) = result {
                tracing::warn!(payment_id = %payment.id, error = %e, "Gateway void failed");
                payment.set_state(previous);
                state
                    .repos
                    .payments
                    .transition(&payment, PaymentState::Void)
                    .await?;
                return Err(Error::PaymentFailed(e.reason()));
            }
            PaymentState::Void
        }
        _ => previous,
    };

    commit_payment(&state, &payment, written_from).await?;

    tracing::info!(
        user_id = %ctx.user.id,
        order_id = %order.id,
        payment_id = %payment.id,
        "Payment voided"
    );
    Ok(Json(order_detail(&state, order.id).await?))
}
