//! PostgreSQL implementation of the warehouse repository and stock levels.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::{NewWarehouse, StockAdjustment, StockLevel, Warehouse, WarehousePatch};
use crate::domain::page::{Page, PageRequest};
use crate::domain::repositories::{WarehouseFilter, WarehouseRepository};
use crate::error::AppError;

/// SQLSTATE raised when `quantity` leaves the BIGINT range.
const NUMERIC_VALUE_OUT_OF_RANGE: &str = "22003";

#[derive(sqlx::FromRow)]
struct WarehouseRow {
    id: Uuid,
    tenant_id: Uuid,
    name: String,
    address_id: Option<Uuid>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<WarehouseRow> for Warehouse {
    fn from(r: WarehouseRow) -> Self {
        Warehouse {
            id: r.id,
            tenant_id: r.tenant_id,
            name: r.name,
            address_id: r.address_id,
            is_active: r.is_active,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct StockRow {
    warehouse_id: Uuid,
    product_id: Uuid,
    quantity: i64,
    updated_at: DateTime<Utc>,
}

impl From<StockRow> for StockLevel {
    fn from(r: StockRow) -> Self {
        StockLevel {
            warehouse_id: r.warehouse_id,
            product_id: r.product_id,
            quantity: r.quantity,
            updated_at: r.updated_at,
        }
    }
}

const COLUMNS: &str = "id, tenant_id, name, address_id, is_active, created_at, updated_at";

pub struct PgWarehouseRepository {
    pool: Arc<PgPool>,
}

impl PgWarehouseRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WarehouseRepository for PgWarehouseRepository {
    async fn create(&self, w: NewWarehouse) -> Result<Warehouse, AppError> {
        let row = sqlx::query_as::<_, WarehouseRow>(&format!(
            r#"
            INSERT INTO warehouses (id, tenant_id, name, address_id)
            VALUES ($1, $2, $3, $4)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(w.tenant_id)
        .bind(w.name)
        .bind(w.address_id)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Warehouse>, AppError> {
        let row = sqlx::query_as::<_, WarehouseRow>(&format!(
            "SELECT {COLUMNS} FROM warehouses WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn list(
        &self,
        filter: WarehouseFilter,
        page: PageRequest,
    ) -> Result<Page<Warehouse>, AppError> {
        let rows = sqlx::query_as::<_, WarehouseRow>(&format!(
            r#"
            SELECT {COLUMNS}
            FROM warehouses
            WHERE tenant_id = $1 AND ($2::boolean IS NULL OR is_active = $2)
            ORDER BY name, id
            LIMIT $3 OFFSET $4
            "#
        ))
        .bind(filter.tenant_id)
        .bind(filter.is_active)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(self.pool.as_ref())
        .await?;

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM warehouses WHERE tenant_id = $1 AND ($2::boolean IS NULL OR is_active = $2)",
        )
        .bind(filter.tenant_id)
        .bind(filter.is_active)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(Page::new(rows.into_iter().map(Into::into).collect(), total))
    }

    async fn update(&self, id: Uuid, patch: WarehousePatch) -> Result<Warehouse, AppError> {
        let row = sqlx::query_as::<_, WarehouseRow>(&format!(
            r#"
            UPDATE warehouses
            SET name = COALESCE($2, name),
                address_id = CASE WHEN $3 THEN $4 ELSE address_id END,
                is_active = COALESCE($5, is_active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(patch.name)
        .bind(patch.address_id.is_some())
        .bind(patch.address_id.flatten())
        .bind(patch.is_active)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM warehouses WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_stock(
        &self,
        warehouse_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<StockLevel>, AppError> {
        let rows = sqlx::query_as::<_, StockRow>(
            r#"
            SELECT warehouse_id, product_id, quantity, updated_at
            FROM stock_levels
            WHERE warehouse_id = $1
            ORDER BY product_id
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(warehouse_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(self.pool.as_ref())
        .await?;

        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM stock_levels WHERE warehouse_id = $1")
                .bind(warehouse_id)
                .fetch_one(self.pool.as_ref())
                .await?;

        Ok(Page::new(rows.into_iter().map(Into::into).collect(), total))
    }

    async fn adjust_stock(&self, adjustment: StockAdjustment) -> Result<StockLevel, AppError> {
        // Single statement; the CHECK (quantity >= 0) rejects negative results
        // and BIGINT overflow raises numeric_value_out_of_range.
        let row = sqlx::query_as::<_, StockRow>(
            r#"
            INSERT INTO stock_levels (warehouse_id, product_id, quantity)
            VALUES ($1, $2, $3)
            ON CONFLICT (warehouse_id, product_id)
            DO UPDATE SET quantity = stock_levels.quantity + EXCLUDED.quantity,
                          updated_at = NOW()
            RETURNING warehouse_id, product_id, quantity, updated_at
            "#,
        )
        .bind(adjustment.warehouse_id)
        .bind(adjustment.product_id)
        .bind(adjustment.delta)
        .fetch_one(self.pool.as_ref())
        .await
        .map_err(|e| {
            let Some(db) = e.as_database_error() else {
                return AppError::from(e);
            };
            if db.is_check_violation() {
                AppError::conflict(
                    "Stock level cannot become negative",
                    json!({"delta": adjustment.delta}),
                )
            } else if db.code().as_deref() == Some(NUMERIC_VALUE_OUT_OF_RANGE) {
                AppError::conflict(
                    "Stock level out of range",
                    json!({"delta": adjustment.delta}),
                )
            } else {
                AppError::from(e)
            }
        })?;

        Ok(row.into())
    }
}
