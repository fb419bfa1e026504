//! Transaction helpers for Orders domain

use sqlx::{Sqlite, Transaction};
use uuid::Uuid;

use super::orders::{LINE_ITEM_COLUMNS, ORDER_COLUMNS};
use super::payments::PAYMENT_COLUMNS;
use crate::domain::entities::{LineItem, Order, Payment};
use crate::domain::state::PaymentState;

/// Load an order within a transaction
pub async fn get_order_tx(
    tx: &mut Transaction<'_, Sqlite>,
    id: Uuid,
) -> Result<Option<Order>, sqlx::Error> {
    sqlx::query_as::<_, Order>(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?"))
        .bind(id)
        .fetch_optional(&mut **tx)
        .await
}

pub async fn order_number_taken_tx(
    tx: &mut Transaction<'_, Sqlite>,
    number: &str,
) -> Result<bool, sqlx::Error> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE number = ?")
        .bind(number)
        .fetch_one(&mut **tx)
        .await?;
    Ok(count > 0)
}

/// Insert a new order within a transaction
pub async fn create_order_tx(
    tx: &mut Transaction<'_, Sqlite>,
    order: &Order,
) -> Result<(), sqlx::Error> {
    sqlx::query(&format!(
        "INSERT INTO orders ({ORDER_COLUMNS}) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
    ))
    .bind(order.id)
    .bind(&order.number)
    .bind(order.distributor_id)
    .bind(order.created_by)
    .bind(&order.email)
    .bind(order.state)
    .bind(order.shipment_state)
    .bind(order.payment_state)
    .bind(order.item_total_cents)
    .bind(&order.voucher_code)
    .bind(order.voucher_discount_cents)
    .bind(order.total_cents)
    .bind(order.completed_at)
    .bind(order.canceled_at)
    .bind(order.created_at)
    .bind(order.updated_at)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

/// Persist an order's state, shipment, payment state and totals together
pub async fn update_order_tx(
    tx: &mut Transaction<'_, Sqlite>,
    order: &Order,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE orders SET \
            state = ?, shipment_state = ?, payment_state = ?, item_total_cents = ?, \
            voucher_code = ?, voucher_discount_cents = ?, total_cents = ?, \
            completed_at = ?, canceled_at = ?, updated_at = ? \
         WHERE id = ?",
    )
    .bind(order.state)
    .bind(order.shipment_state)
    .bind(order.payment_state)
    .bind(order.item_total_cents)
    .bind(&order.voucher_code)
    .bind(order.voucher_discount_cents)
    .bind(order.total_cents)
    .bind(order.completed_at)
    .bind(order.canceled_at)
    .bind(order.updated_at)
    .bind(order.id)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

pub async fn line_items_tx(
    tx: &mut Transaction<'_, Sqlite>,
    order_id: Uuid,
) -> Result<Vec<LineItem>, sqlx::Error> {
    sqlx::query_as::<_, LineItem>(&format!(
        "SELECT {LINE_ITEM_COLUMNS} FROM line_items WHERE order_id = ? ORDER BY rowid ASC"
    ))
    .bind(order_id)
    .fetch_all(&mut **tx)
    .await
}

pub async fn create_line_item_tx(
    tx: &mut Transaction<'_, Sqlite>,
    item: &LineItem,
) -> Result<(), sqlx::Error> {
    sqlx::query(&format!(
        "INSERT INTO line_items ({LINE_ITEM_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?)"
    ))
    .bind(item.id)
    .bind(item.order_id)
    .bind(&item.name)
    .bind(item.quantity)
    .bind(item.price_cents)
    .bind(item.created_at)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

/// Payments of an order, oldest first
pub async fn payments_tx(
    tx: &mut Transaction<'_, Sqlite>,
    order_id: Uuid,
) -> Result<Vec<Payment>, sqlx::Error> {
    sqlx::query_as::<_, Payment>(&format!(
        "SELECT {PAYMENT_COLUMNS} FROM payments WHERE order_id = ? ORDER BY rowid ASC"
    ))
    .bind(order_id)
    .fetch_all(&mut **tx)
    .await
}

pub async fn create_payment_tx(
    tx: &mut Transaction<'_, Sqlite>,
    payment: &Payment,
) -> Result<(), sqlx::Error> {
    sqlx::query(&format!(
        "INSERT INTO payments ({PAYMENT_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)"
    ))
    .bind(payment.id)
    .bind(payment.order_id)
    .bind(payment.payment_method)
    .bind(payment.state)
    .bind(payment.amount_cents)
    .bind(&payment.response_code)
    .bind(&payment.failure_reason)
    .bind(payment.created_at)
    .bind(payment.updated_at)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

/// Write a payment only if it is still in state `from`.
///
/// Returns false when another request moved the payment first.
pub async fn update_payment_tx(
    tx: &mut Transaction<'_, Sqlite>,
    payment: &Payment,
    from: PaymentState,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE payments SET state = ?, response_code = ?, failure_reason = ?, updated_at = ? \
         WHERE id = ? AND state = ?",
    )
    .bind(payment.state)
    .bind(&payment.response_code)
    .bind(&payment.failure_reason)
    .bind(payment.updated_at)
    .bind(payment.id)
    .bind(from)
    .execute(&mut **tx)
    .await?;
    Ok(result.rows_affected() == 1)
}
