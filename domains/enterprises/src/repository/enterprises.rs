//! Enterprise repository

use chrono::Utc;
use foodhub_common::{is_foreign_key_violation, is_unique_violation, DbPool, Error, Result};
use uuid::Uuid;

use crate::domain::entities::{check_enterprise_limit, Enterprise, Manager};

const ENTERPRISE_COLUMNS: &str = "id, name, owner_id, visibility, sells, is_primary_producer, \
                                  address1, city, zipcode, country, created_at, updated_at";

fn map_name_conflict(e: sqlx::Error) -> Error {
    if is_unique_violation(&e) {
        Error::Conflict("Name has already been taken".to_string())
    } else {
        Error::Database(e)
    }
}

#[derive(Clone)]
pub struct EnterpriseRepository {
    pool: DbPool,
}

impl EnterpriseRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Insert an enterprise after checking the owner's enterprise limit.
    ///
    /// Count and insert share one transaction.
    pub async fn create(&self, enterprise: &Enterprise) -> Result<Enterprise> {
        let mut transaction = self.pool.begin().await?;

        let limit: Option<i64> = sqlx::query_scalar("SELECT enterprise_limit FROM users WHERE id = ?")
            .bind(enterprise.owner_id)
            .fetch_optional(&mut *transaction)
            .await?;
        let limit = limit.ok_or_else(|| Error::NotFound("Owner not found".to_string()))?;

        let owned: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM enterprises WHERE owner_id = ?")
            .bind(enterprise.owner_id)
            .fetch_one(&mut *transaction)
            .await?;
        check_enterprise_limit(owned, limit)?;

        sqlx::query(
            r#"
            INSERT INTO enterprises (id, name, owner_id, visibility, sells, is_primary_producer,
                                     address1, city, zipcode, country, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(enterprise.id)
        .bind(&enterprise.name)
        .bind(enterprise.owner_id)
        .bind(enterprise.visibility)
        .bind(enterprise.sells)
        .bind(enterprise.is_primary_producer)
        .bind(&enterprise.address.address1)
        .bind(&enterprise.address.city)
        .bind(&enterprise.address.zipcode)
        .bind(&enterprise.address.country)
        .bind(enterprise.created_at)
        .bind(enterprise.updated_at)
        .execute(&mut *transaction)
        .await
        .map_err(map_name_conflict)?;

        transaction.commit().await?;
        Ok(enterprise.clone())
    }

    /// Find enterprise by ID
    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Enterprise>> {
        let enterprise = sqlx::query_as(&format!(
            "SELECT {} FROM enterprises WHERE id = ?",
            ENTERPRISE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(enterprise)
    }

    /// Every enterprise, by name
    pub async fn list_all(&self) -> Result<Vec<Enterprise>> {
        let enterprises = sqlx::query_as(&format!(
            "SELECT {} FROM enterprises ORDER BY name ASC",
            ENTERPRISE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(enterprises)
    }

    /// Enterprises the user owns or manages, by name
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Enterprise>> {
        let enterprises = sqlx::query_as(&format!(
            r#"
            SELECT {} FROM enterprises
            WHERE owner_id = ?1
               OR id IN (SELECT enterprise_id FROM enterprise_roles WHERE user_id = ?1)
            ORDER BY name ASC
            "#,
            ENTERPRISE_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(enterprises)
    }

    /// Persist editable attributes
    pub async fn update(&self, enterprise: &Enterprise) -> Result<Enterprise> {
        let now = Utc::now();
        sqlx::query(
            r#"
            UPDATE enterprises
            SET name = ?, visibility = ?, sells = ?, is_primary_producer = ?,
                address1 = ?, city = ?, zipcode = ?, country = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&enterprise.name)
        .bind(enterprise.visibility)
        .bind(enterprise.sells)
        .bind(enterprise.is_primary_producer)
        .bind(&enterprise.address.address1)
        .bind(&enterprise.address.city)
        .bind(&enterprise.address.zipcode)
        .bind(&enterprise.address.country)
        .bind(now)
        .bind(enterprise.id)
        .execute(&self.pool)
        .await
        .map_err(map_name_conflict)?;

        self.get_by_id(enterprise.id)
            .await?
            .ok_or_else(|| Error::NotFound("Enterprise not found".to_string()))
    }

    /// Delete an enterprise. Enterprises referenced by orders cannot go.
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM enterprises WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    Error::Conflict("Enterprise has orders and cannot be deleted".to_string())
                } else {
                    Error::Database(e)
                }
            })?;
        Ok(result.rows_affected() > 0)
    }

    /// Managers of an enterprise, by email
    pub async fn list_managers(&self, enterprise_id: Uuid) -> Result<Vec<Manager>> {
        let managers = sqlx::query_as(
            r#"
            SELECT u.id AS user_id, u.email, r.created_at
            FROM enterprise_roles r
            INNER JOIN users u ON u.id = r.user_id
            WHERE r.enterprise_id = ?
            ORDER BY u.email ASC
            "#,
        )
        .bind(enterprise_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(managers)
    }

    /// Grant management rights. Granting twice is a no-op.
    pub async fn add_manager(&self, enterprise_id: Uuid, user_id: Uuid) -> Result<()> {
        sqlx::query(
            r#"
            INSERT OR IGNORE INTO enterprise_roles (user_id, enterprise_id, created_at)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(user_id)
        .bind(enterprise_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn remove_manager(&self, enterprise_id: Uuid, user_id: Uuid) -> Result<bool> {
        let result =
            sqlx::query("DELETE FROM enterprise_roles WHERE enterprise_id = ? AND user_id = ?")
                .bind(enterprise_id)
                .bind(user_id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Cross-domain read: account id for an email
    pub async fn find_user_id_by_email(&self, email: &str) -> Result<Option<Uuid>> {
        let id = sqlx::query_scalar("SELECT id FROM users WHERE email = ?")
            .bind(email.trim().to_lowercase())
            .fetch_optional(&self.pool)
            .await?;
        Ok(id)
    }
}
