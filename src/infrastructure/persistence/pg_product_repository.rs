//! PostgreSQL implementation of the product repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::{NewProduct, Product, ProductPatch};
use crate::domain::page::{Page, PageRequest};
use crate::domain::repositories::{ProductFilter, ProductRepository};
use crate::error::AppError;

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: Uuid,
    tenant_id: Uuid,
    sku: String,
    name: String,
    description: Option<String>,
    unit: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(r: ProductRow) -> Self {
        Product {
            id: r.id,
            tenant_id: r.tenant_id,
            sku: r.sku,
            name: r.name,
            description: r.description,
            unit: r.unit,
            is_active: r.is_active,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

const COLUMNS: &str =
    "id, tenant_id, sku, name, description, unit, is_active, created_at, updated_at";

const FILTER: &str = r#"
    WHERE tenant_id = $1
      AND ($2::text IS NULL OR name ILIKE '%' || $2 || '%' OR sku ILIKE '%' || $2 || '%')
      AND ($3::boolean IS NULL OR is_active = $3)
"#;

/// PostgreSQL repository for products.
///
/// Stock levels and price-list items reference products without cascading,
/// so deleting a referenced product fails with a foreign key conflict.
pub struct PgProductRepository {
    pool: Arc<PgPool>,
}

impl PgProductRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn create(&self, p: NewProduct) -> Result<Product, AppError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            r#"
            INSERT INTO products (id, tenant_id, sku, name, description, unit)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(p.tenant_id)
        .bind(p.sku)
        .bind(p.name)
        .bind(p.description)
        .bind(p.unit)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, AppError> {
        let row =
            sqlx::query_as::<_, ProductRow>(&format!("SELECT {COLUMNS} FROM products WHERE id = $1"))
                .bind(id)
                .fetch_optional(self.pool.as_ref())
                .await?;

        Ok(row.map(Into::into))
    }

    async fn find_by_sku(&self, tenant_id: Uuid, sku: &str) -> Result<Option<Product>, AppError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {COLUMNS} FROM products WHERE tenant_id = $1 AND sku = $2"
        ))
        .bind(tenant_id)
        .bind(sku)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn list(
        &self,
        filter: ProductFilter,
        page: PageRequest,
    ) -> Result<Page<Product>, AppError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {COLUMNS} FROM products {FILTER} ORDER BY sku LIMIT $4 OFFSET $5"
        ))
        .bind(filter.tenant_id)
        .bind(&filter.search)
        .bind(filter.is_active)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(self.pool.as_ref())
        .await?;

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM products {FILTER}"))
            .bind(filter.tenant_id)
            .bind(&filter.search)
            .bind(filter.is_active)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(Page::new(rows.into_iter().map(Into::into).collect(), total))
    }

    async fn update(&self, id: Uuid, patch: ProductPatch) -> Result<Product, AppError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            r#"
            UPDATE products
            SET sku = COALESCE($2, sku),
                name = COALESCE($3, name),
                description = CASE WHEN $4 THEN $5 ELSE description END,
                unit = COALESCE($6, unit),
                is_active = COALESCE($7, is_active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(patch.sku)
        .bind(patch.name)
        .bind(patch.description.is_some())
        .bind(patch.description.flatten())
        .bind(patch.unit)
        .bind(patch.is_active)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
