//! Repository implementations for Orders domain

pub mod orders;
pub mod payments;
pub mod transactions;

use foodhub_common::DbPool;
use sqlx::{Sqlite, Transaction};

pub use orders::OrderRepository;
pub use payments::PaymentRepository;

/// Combined repository access for the Orders domain
#[derive(Clone)]
pub struct OrdersRepositories {
    pub orders: OrderRepository,
    pub payments: PaymentRepository,
    pool: DbPool,
}

impl OrdersRepositories {
    pub fn new(pool: DbPool) -> Self {
        Self {
            orders: OrderRepository::new(pool.clone()),
            payments: PaymentRepository::new(pool.clone()),
            pool,
        }
    }

    /// Begin a database transaction
    pub async fn begin(&self) -> std::result::Result<Transaction<'static, Sqlite>, sqlx::Error> {
        self.pool.begin().await
    }
}
