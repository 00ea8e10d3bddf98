//! PostgreSQL implementation of the price list repository.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::{NewPriceList, PriceList, PriceListItem, PriceListPatch};
use crate::domain::page::{Page, PageRequest};
use crate::domain::repositories::{PriceListFilter, PriceListRepository};
use crate::error::AppError;

#[derive(sqlx::FromRow)]
struct PriceListRow {
    id: Uuid,
    tenant_id: Uuid,
    name: String,
    currency: String,
    valid_from: DateTime<Utc>,
    valid_to: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PriceListRow {
    fn into_price_list(self, items: Vec<PriceListItem>) -> PriceList {
        PriceList {
            id: self.id,
            tenant_id: self.tenant_id,
            name: self.name,
            currency: self.currency,
            valid_from: self.valid_from,
            valid_to: self.valid_to,
            items,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ItemRow {
    price_list_id: Uuid,
    product_id: Uuid,
    unit_price: Decimal,
}

const COLUMNS: &str =
    "id, tenant_id, name, currency, valid_from, valid_to, created_at, updated_at";

/// PostgreSQL repository for price lists.
///
/// Items live in `price_list_items` and are loaded alongside their lists.
pub struct PgPriceListRepository {
    pool: Arc<PgPool>,
}

impl PgPriceListRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    async fn load_items(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, Vec<PriceListItem>>, AppError> {
        let rows = sqlx::query_as::<_, ItemRow>(
            r#"
            SELECT price_list_id, product_id, unit_price
            FROM price_list_items
            WHERE price_list_id = ANY($1)
            ORDER BY product_id
            "#,
        )
        .bind(ids)
        .fetch_all(self.pool.as_ref())
        .await?;

        let mut items: HashMap<Uuid, Vec<PriceListItem>> = HashMap::new();
        for row in rows {
            items.entry(row.price_list_id).or_default().push(PriceListItem {
                product_id: row.product_id,
                unit_price: row.unit_price,
            });
        }
        Ok(items)
    }

    async fn with_items(&self, row: PriceListRow) -> Result<PriceList, AppError> {
        let mut items = self.load_items(&[row.id]).await?;
        let own = items.remove(&row.id).unwrap_or_default();
        Ok(row.into_price_list(own))
    }
}

#[async_trait]
impl PriceListRepository for PgPriceListRepository {
    async fn create(&self, l: NewPriceList) -> Result<PriceList, AppError> {
        let row = sqlx::query_as::<_, PriceListRow>(&format!(
            r#"
            INSERT INTO price_lists (id, tenant_id, name, currency, valid_from, valid_to)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(l.tenant_id)
        .bind(l.name)
        .bind(l.currency)
        .bind(l.valid_from)
        .bind(l.valid_to)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into_price_list(Vec::new()))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<PriceList>, AppError> {
        let row = sqlx::query_as::<_, PriceListRow>(&format!(
            "SELECT {COLUMNS} FROM price_lists WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        match row {
            Some(row) => Ok(Some(self.with_items(row).await?)),
            None => Ok(None),
        }
    }

    async fn list(
        &self,
        filter: PriceListFilter,
        page: PageRequest,
    ) -> Result<Page<PriceList>, AppError> {
        let rows = sqlx::query_as::<_, PriceListRow>(&format!(
            r#"
            SELECT {COLUMNS}
            FROM price_lists
            WHERE tenant_id = $1 AND ($2::text IS NULL OR currency = UPPER($2))
            ORDER BY name, id
            LIMIT $3 OFFSET $4
            "#
        ))
        .bind(filter.tenant_id)
        .bind(&filter.currency)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(self.pool.as_ref())
        .await?;

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM price_lists WHERE tenant_id = $1 AND ($2::text IS NULL OR currency = UPPER($2))",
        )
        .bind(filter.tenant_id)
        .bind(&filter.currency)
        .fetch_one(self.pool.as_ref())
        .await?;

        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        let mut items = self.load_items(&ids).await?;
        let lists = rows
            .into_iter()
            .map(|row| {
                let own = items.remove(&row.id).unwrap_or_default();
                row.into_price_list(own)
            })
            .collect();

        Ok(Page::new(lists, total))
    }

    async fn update(&self, id: Uuid, patch: PriceListPatch) -> Result<PriceList, AppError> {
        let row = sqlx::query_as::<_, PriceListRow>(&format!(
            r#"
            UPDATE price_lists
            SET name = COALESCE($2, name),
                currency = COALESCE($3, currency),
                valid_from = COALESCE($4, valid_from),
                valid_to = CASE WHEN $5 THEN $6 ELSE valid_to END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(patch.name)
        .bind(patch.currency)
        .bind(patch.valid_from)
        .bind(patch.valid_to.is_some())
        .bind(patch.valid_to.flatten())
        .fetch_one(self.pool.as_ref())
        .await?;

        self.with_items(row).await
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM price_lists WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn upsert_item(
        &self,
        price_list_id: Uuid,
        item: PriceListItem,
    ) -> Result<PriceListItem, AppError> {
        let row = sqlx::query_as::<_, ItemRow>(
            r#"
            INSERT INTO price_list_items (price_list_id, product_id, unit_price)
            VALUES ($1, $2, $3)
            ON CONFLICT (price_list_id, product_id)
            DO UPDATE SET unit_price = EXCLUDED.unit_price
            RETURNING price_list_id, product_id, unit_price
            "#,
        )
        .bind(price_list_id)
        .bind(item.product_id)
        .bind(item.unit_price)
        .fetch_one(self.pool.as_ref())
        .await?;

        sqlx::query("UPDATE price_lists SET updated_at = NOW() WHERE id = $1")
            .bind(price_list_id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(PriceListItem {
            product_id: row.product_id,
            unit_price: row.unit_price,
        })
    }

    async fn remove_item(&self, price_list_id: Uuid, product_id: Uuid) -> Result<bool, AppError> {
        let result =
            sqlx::query("DELETE FROM price_list_items WHERE price_list_id = $1 AND product_id = $2")
                .bind(price_list_id)
                .bind(product_id)
                .execute(self.pool.as_ref())
                .await?;

        Ok(result.rows_affected() > 0)
    }
}
