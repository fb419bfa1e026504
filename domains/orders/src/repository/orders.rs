//! Order repository

use foodhub_common::{is_foreign_key_violation, DbPool, Error, Result};
use sqlx::{QueryBuilder, Sqlite};
use uuid::Uuid;

use super::transactions::{create_line_item_tx, create_order_tx, order_number_taken_tx};
use crate::domain::entities::{generate_order_number, LineItem, Order};
use crate::domain::state::OrderState;

pub(crate) const ORDER_COLUMNS: &str = "id, number, distributor_id, created_by, email, state, \
     shipment_state, payment_state, item_total_cents, voucher_code, voucher_discount_cents, \
     total_cents, completed_at, canceled_at, created_at, updated_at";

pub(crate) const LINE_ITEM_COLUMNS: &str = "id, order_id, name, quantity, price_cents, created_at";

/// Attempts at finding an unused order number
const ORDER_NUMBER_ATTEMPTS: usize = 10;

#[derive(Clone)]
pub struct OrderRepository {
    pool: DbPool,
}

impl OrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Insert an order with its line items.
    ///
    /// A fresh number is drawn when the generated one is already in use.
    pub async fn create(&self, order: &Order, line_items: &[LineItem]) -> Result<Order> {
        let mut order = order.clone();
        let mut tx = self.pool.begin().await?;

        let mut attempts = 0;
        while order_number_taken_tx(&mut tx, &order.number).await? {
            attempts += 1;
            if attempts >= ORDER_NUMBER_ATTEMPTS {
                return Err(Error::Internal(
                    "Could not allocate an order number".to_string(),
                ));
            }
            order.number = generate_order_number();
        }

        create_order_tx(&mut tx, &order).await.map_err(|e| {
            if is_foreign_key_violation(&e) {
                Error::NotFound("Enterprise not found".to_string())
            } else {
                Error::Database(e)
            }
        })?;
        for item in line_items {
            create_line_item_tx(&mut tx, item).await?;
        }

        tx.commit().await?;
        Ok(order)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Order>> {
        let order = sqlx::query_as(&format!("SELECT {} FROM orders WHERE id = ?", ORDER_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(order)
    }

    /// Orders of the given distributors (all when `None`), newest first
    pub async fn list(
        &self,
        distributor_ids: Option<&[Uuid]>,
        state: Option<OrderState>,
    ) -> Result<Vec<Order>> {
        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {} FROM orders WHERE 1 = 1", ORDER_COLUMNS));

        if let Some(ids) = distributor_ids {
            if ids.is_empty() {
                return Ok(Vec::new());
            }
            builder.push(" AND distributor_id IN (");
            let mut separated = builder.separated(", ");
            for id in ids {
                separated.push_bind(*id);
            }
            separated.push_unseparated(")");
        }
        if let Some(state) = state {
            builder.push(" AND state = ").push_bind(state);
        }
        builder.push(" ORDER BY rowid DESC");

        let orders = builder
            .build_query_as::<Order>()
            .fetch_all(&self.pool)
            .await?;
        Ok(orders)
    }

    pub async fn line_items(&self, order_id: Uuid) -> Result<Vec<LineItem>> {
        let items = sqlx::query_as(&format!(
            "SELECT {} FROM line_items WHERE order_id = ? ORDER BY rowid ASC",
            LINE_ITEM_COLUMNS
        ))
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    /// Name of the distributing enterprise, for customer emails
    pub async fn distributor_name(&self, distributor_id: Uuid) -> Result<Option<String>> {
        let name = sqlx::query_scalar("SELECT name FROM enterprises WHERE id = ?")
            .bind(distributor_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(name)
    }
}
