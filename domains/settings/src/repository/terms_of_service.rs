//! Terms-of-service file repository

use foodhub_common::{DbPool, Result};

use crate::domain::entities::TermsOfServiceFile;

#[derive(Clone)]
pub struct TermsOfServiceRepository {
    pool: DbPool,
}

impl TermsOfServiceRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, file: &TermsOfServiceFile) -> Result<TermsOfServiceFile> {
        sqlx::query(
            r#"
            INSERT INTO terms_of_service_files (id, filename, created_at, updated_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(file.id)
        .bind(&file.filename)
        .bind(file.created_at)
        .bind(file.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(file.clone())
    }

    /// The most recently recorded file is the current one
    pub async fn current(&self) -> Result<Option<TermsOfServiceFile>> {
        let file = sqlx::query_as(
            r#"
            SELECT id, filename, created_at, updated_at
            FROM terms_of_service_files
            ORDER BY rowid DESC
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(file)
    }
}
