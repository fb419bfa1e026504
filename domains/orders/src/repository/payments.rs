//! Payment repository

use foodhub_common::{DbPool, Error, Result};
use uuid::Uuid;

use super::transactions::update_payment_tx;
use crate::domain::entities::Payment;
use crate::domain::state::PaymentState;

pub(crate) const PAYMENT_COLUMNS: &str = "id, order_id, payment_method, state, amount_cents, \
     response_code, failure_reason, created_at, updated_at";

#[derive(Clone)]
pub struct PaymentRepository {
    pool: DbPool,
}

impl PaymentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Payments of an order, oldest first
    pub async fn list_for_order(&self, order_id: Uuid) -> Result<Vec<Payment>> {
        let payments = sqlx::query_as(&format!(
            "SELECT {} FROM payments WHERE order_id = ? ORDER BY rowid ASC",
            PAYMENT_COLUMNS
        ))
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(payments)
    }

    /// A payment of the given order
    pub async fn get(&self, order_id: Uuid, payment_id: Uuid) -> Result<Option<Payment>> {
        let payment = sqlx::query_as(&format!(
            "SELECT {} FROM payments WHERE id = ? AND order_id = ?",
            PAYMENT_COLUMNS
        ))
        .bind(payment_id)
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(payment)
    }

    /// Most recently created payment of an order
    pub async fn latest_for_order(&self, order_id: Uuid) -> Result<Option<Payment>> {
        let payment = sqlx::query_as(&format!(
            "SELECT {} FROM payments WHERE order_id = ? ORDER BY rowid DESC LIMIT 1",
            PAYMENT_COLUMNS
        ))
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(payment)
    }

    /// Write `payment` if it is still in state `from`; 409 otherwise.
    pub async fn transition(&self, payment: &Payment, from: PaymentState) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        if !update_payment_tx(&mut tx, payment, from).await? {
            return Err(payment_changed());
        }
        tx.commit().await?;
        Ok(())
    }
}

pub(crate) fn payment_changed() -> Error {
    Error::Conflict("Payment was changed by another request".to_string())
}
