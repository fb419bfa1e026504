//! Product repository

use foodhub_common::{is_foreign_key_violation, DbPool, Error, Result};
use sqlx::{QueryBuilder, Sqlite};
use uuid::Uuid;

use crate::domain::entities::Product;

const PRODUCT_COLUMNS: &str = "id, supplier_id, name, variant_unit, variant_unit_scale, \
     variant_unit_name, unit_value, price_cents, created_at, updated_at";

#[derive(Clone)]
pub struct ProductRepository {
    pool: DbPool,
}

impl ProductRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, product: &Product) -> Result<Product> {
        sqlx::query(
            r#"
            INSERT INTO products (id, supplier_id, name, variant_unit, variant_unit_scale,
                                  variant_unit_name, unit_value, price_cents, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(product.id)
        .bind(product.supplier_id)
        .bind(&product.name)
        .bind(product.variant_unit)
        .bind(product.variant_unit_scale)
        .bind(&product.variant_unit_name)
        .bind(product.unit_value)
        .bind(product.price_cents)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                Error::NotFound("Enterprise not found".to_string())
            } else {
                Error::Database(e)
            }
        })?;

        Ok(product.clone())
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Product>> {
        let product = sqlx::query_as(&format!(
            "SELECT {} FROM products WHERE id = ?",
            PRODUCT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(product)
    }

    /// Products of the given suppliers, or of every supplier when `None`.
    pub async fn list(&self, supplier_ids: Option<&[Uuid]>) -> Result<Vec<Product>> {
        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {} FROM products", PRODUCT_COLUMNS));

        if let Some(ids) = supplier_ids {
            if ids.is_empty() {
                return Ok(Vec::new());
            }
            builder.push(" WHERE supplier_id IN (");
            let mut separated = builder.separated(", ");
            for id in ids {
                separated.push_bind(*id);
            }
            separated.push_unseparated(")");
        }
        builder.push(" ORDER BY name ASC, rowid ASC");

        let products = builder
            .build_query_as::<Product>()
            .fetch_all(&self.pool)
            .await?;
        Ok(products)
    }
}
