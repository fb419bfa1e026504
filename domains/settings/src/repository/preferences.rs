//! Preference repository (system-wide key/value settings)

use chrono::Utc;
use foodhub_common::{DbPool, Result};

use crate::domain::entities::TaxSettings;

#[derive(Clone)]
pub struct PreferenceRepository {
    pool: DbPool,
}

impl PreferenceRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        let value = sqlx::query_scalar("SELECT value FROM preferences WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(value)
    }

    /// Load tax settings, applying defaults for unset keys
    pub async fn tax_settings(&self) -> Result<TaxSettings> {
        let rows: Vec<(String, String)> = sqlx::query_as("SELECT key, value FROM preferences")
            .fetch_all(&self.pool)
            .await?;

        Ok(TaxSettings::from_preferences(
            rows.iter().map(|(k, v)| (k.as_str(), v.as_str())),
        ))
    }

    /// Write every tax preference in one transaction
    pub async fn save_tax_settings(&self, settings: &TaxSettings) -> Result<TaxSettings> {
        let now = Utc::now();
        let mut transaction = self.pool.begin().await?;

        for (key, value) in settings.to_preferences() {
            sqlx::query(
                r#"
                INSERT INTO preferences (key, value, updated_at)
                VALUES (?, ?, ?)
                ON CONFLICT (key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
                "#,
            )
            .bind(key)
            .bind(value)
            .bind(now)
            .execute(&mut *transaction)
            .await?;
        }

        transaction.commit().await?;
        self.tax_settings().await
    }
}
