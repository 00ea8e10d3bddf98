//! PostgreSQL implementation of the address repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::{Address, AddressPatch, NewAddress};
use crate::domain::page::{Page, PageRequest};
use crate::domain::repositories::{AddressFilter, AddressRepository};
use crate::error::AppError;

#[derive(sqlx::FromRow)]
struct AddressRow {
    id: Uuid,
    tenant_id: Uuid,
    label: String,
    line1: String,
    line2: Option<String>,
    city: String,
    postal_code: String,
    country: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<AddressRow> for Address {
    fn from(r: AddressRow) -> Self {
        Address {
            id: r.id,
            tenant_id: r.tenant_id,
            label: r.label,
            line1: r.line1,
            line2: r.line2,
            city: r.city,
            postal_code: r.postal_code,
            country: r.country,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

const COLUMNS: &str =
    "id, tenant_id, label, line1, line2, city, postal_code, country, created_at, updated_at";

const FILTER: &str = r#"
    WHERE tenant_id = $1
      AND ($2::text IS NULL OR label ILIKE '%' || $2 || '%' OR city ILIKE '%' || $2 || '%')
"#;

/// PostgreSQL repository for addresses.
///
/// Deleting an address clears event venues and warehouse locations through
/// `ON DELETE SET NULL`.
pub struct PgAddressRepository {
    pool: Arc<PgPool>,
}

impl PgAddressRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AddressRepository for PgAddressRepository {
    async fn create(&self, a: NewAddress) -> Result<Address, AppError> {
        let row = sqlx::query_as::<_, AddressRow>(&format!(
            r#"
            INSERT INTO addresses (id, tenant_id, label, line1, line2, city, postal_code, country)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(a.tenant_id)
        .bind(a.label)
        .bind(a.line1)
        .bind(a.line2)
        .bind(a.city)
        .bind(a.postal_code)
        .bind(a.country)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Address>, AppError> {
        let row = sqlx::query_as::<_, AddressRow>(&format!(
            "SELECT {COLUMNS} FROM addresses WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn list(
        &self,
        filter: AddressFilter,
        page: PageRequest,
    ) -> Result<Page<Address>, AppError> {
        let rows = sqlx::query_as::<_, AddressRow>(&format!(
            "SELECT {COLUMNS} FROM addresses {FILTER} ORDER BY label, id LIMIT $3 OFFSET $4"
        ))
        .bind(filter.tenant_id)
        .bind(&filter.search)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(self.pool.as_ref())
        .await?;

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM addresses {FILTER}"))
            .bind(filter.tenant_id)
            .bind(&filter.search)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(Page::new(rows.into_iter().map(Into::into).collect(), total))
    }

    async fn update(&self, id: Uuid, patch: AddressPatch) -> Result<Address, AppError> {
        let row = sqlx::query_as::<_, AddressRow>(&format!(
            r#"
            UPDATE addresses
            SET label = COALESCE($2, label),
                line1 = COALESCE($3, line1),
                line2 = CASE WHEN $4 THEN $5 ELSE line2 END,
                city = COALESCE($6, city),
                postal_code = COALESCE($7, postal_code),
                country = COALESCE($8, country),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(patch.label)
        .bind(patch.line1)
        .bind(patch.line2.is_some())
        .bind(patch.line2.flatten())
        .bind(patch.city)
        .bind(patch.postal_code)
        .bind(patch.country)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM addresses WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
