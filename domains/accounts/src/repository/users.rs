//! User repository

use chrono::{DateTime, Utc};
use foodhub_common::{is_unique_violation, DbPool, Error, Result};
use uuid::Uuid;

use crate::domain::entities::{NewUser, User, UserRole};

const USER_COLUMNS: &str = "id, email, role, locale, enterprise_limit, \
                            terms_of_service_accepted_at, created_at, updated_at";

#[derive(Clone)]
pub struct UserRepository {
    pool: DbPool,
}

impl UserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Insert a new account. A taken email is a conflict.
    pub async fn create(&self, new_user: &NewUser) -> Result<User> {
        let user = &new_user.user;
        sqlx::query(
            r#"
            INSERT INTO users (id, email, password_hash, role, locale, enterprise_limit,
                               terms_of_service_accepted_at, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&new_user.password_hash)
        .bind(user.role)
        .bind(&user.locale)
        .bind(user.enterprise_limit)
        .bind(user.terms_of_service_accepted_at)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                Error::Conflict("Email has already been taken".to_string())
            } else {
                Error::Database(e)
            }
        })?;

        Ok(user.clone())
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as(&format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// Find user by (normalized) email
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as(&format!("SELECT {} FROM users WHERE email = ?", USER_COLUMNS))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// List users by email
    pub async fn list(&self, offset: i64, limit: i64) -> Result<Vec<User>> {
        let users = sqlx::query_as(&format!(
            "SELECT {} FROM users ORDER BY email ASC LIMIT ? OFFSET ?",
            USER_COLUMNS
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    /// Update the admin-managed attributes of a user
    pub async fn update_access(
        &self,
        id: Uuid,
        role: UserRole,
        enterprise_limit: i64,
    ) -> Result<Option<User>> {
        let result = sqlx::query(
            "UPDATE users SET role = ?, enterprise_limit = ?, updated_at = ? WHERE id = ?",
        )
        .bind(role)
        .bind(enterprise_limit)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_by_id(id).await
    }

    /// Persist the user's preferred locale
    pub async fn set_locale(&self, id: Uuid, locale: &str) -> Result<Option<User>> {
        sqlx::query("UPDATE users SET locale = ?, updated_at = ? WHERE id = ?")
            .bind(locale)
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await?;
        self.get_by_id(id).await
    }

    /// Record acceptance of the terms of service
    pub async fn accept_terms_of_service(
        &self,
        id: Uuid,
        accepted_at: DateTime<Utc>,
    ) -> Result<Option<User>> {
        sqlx::query(
            "UPDATE users SET terms_of_service_accepted_at = ?, updated_at = ? WHERE id = ?",
        )
        .bind(accepted_at)
        .bind(accepted_at)
        .bind(id)
        .execute(&self.pool)
        .await?;
        self.get_by_id(id).await
    }
}
