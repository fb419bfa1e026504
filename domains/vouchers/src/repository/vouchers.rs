//! Voucher repository

use foodhub_common::{is_foreign_key_violation, is_unique_violation, DbPool, Error, Result};
use uuid::Uuid;

use crate::domain::entities::Voucher;

const VOUCHER_COLUMNS: &str = "id, enterprise_id, code, voucher_type, amount_cents, created_at";

#[derive(Clone)]
pub struct VoucherRepository {
    pool: DbPool,
}

impl VoucherRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Insert a voucher. Codes are unique per enterprise.
    pub async fn create(&self, voucher: &Voucher) -> Result<Voucher> {
        sqlx::query(
            r#"
            INSERT INTO vouchers (id, enterprise_id, code, voucher_type, amount_cents, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(voucher.id)
        .bind(voucher.enterprise_id)
        .bind(&voucher.code)
        .bind(voucher.voucher_type)
        .bind(voucher.amount_cents)
        .bind(voucher.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                Error::Validation("Code has already been taken".to_string())
            } else if is_foreign_key_violation(&e) {
                Error::NotFound("Enterprise not found".to_string())
            } else {
                Error::Database(e)
            }
        })?;

        Ok(voucher.clone())
    }

    /// Vouchers of an enterprise, oldest first
    pub async fn list_for_enterprise(&self, enterprise_id: Uuid) -> Result<Vec<Voucher>> {
        let vouchers = sqlx::query_as(&format!(
            "SELECT {} FROM vouchers WHERE enterprise_id = ? ORDER BY rowid ASC",
            VOUCHER_COLUMNS
        ))
        .bind(enterprise_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(vouchers)
    }

    /// Look a voucher up by its owning enterprise and code
    pub async fn find_by_code(&self, enterprise_id: Uuid, code: &str) -> Result<Option<Voucher>> {
        let voucher = sqlx::query_as(&format!(
            "SELECT {} FROM vouchers WHERE enterprise_id = ? AND code = ?",
            VOUCHER_COLUMNS
        ))
        .bind(enterprise_id)
        .bind(code.trim())
        .fetch_optional(&self.pool)
        .await?;
        Ok(voucher)
    }

    pub async fn delete(&self, enterprise_id: Uuid, code: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM vouchers WHERE enterprise_id = ? AND code = ?")
            .bind(enterprise_id)
            .bind(code.trim())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
