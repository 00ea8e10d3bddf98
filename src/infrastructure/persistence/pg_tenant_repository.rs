//! PostgreSQL implementation of the tenant repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::{NewTenant, Tenant, TenantPatch};
use crate::domain::page::{Page, PageRequest};
use crate::domain::repositories::TenantRepository;
use crate::error::AppError;

#[derive(sqlx::FromRow)]
struct TenantRow {
    id: Uuid,
    name: String,
    slug: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl From<TenantRow> for Tenant {
    fn from(r: TenantRow) -> Self {
        Tenant {
            id: r.id,
            name: r.name,
            slug: r.slug,
            is_active: r.is_active,
            created_at: r.created_at,
            updated_at: r.updated_at,
            deleted_at: r.deleted_at,
        }
    }
}

/// PostgreSQL repository for tenants. Deletion only sets `deleted_at`.
pub struct PgTenantRepository {
    pool: Arc<PgPool>,
}

impl PgTenantRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TenantRepository for PgTenantRepository {
    async fn create(&self, new_tenant: NewTenant) -> Result<Tenant, AppError> {
        let row = sqlx::query_as::<_, TenantRow>(
            r#"
            INSERT INTO tenants (id, name, slug)
            VALUES ($1, $2, $3)
            RETURNING id, name, slug, is_active, created_at, updated_at, deleted_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new_tenant.name)
        .bind(&new_tenant.slug)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Tenant>, AppError> {
        let row = sqlx::query_as::<_, TenantRow>(
            r#"
            SELECT id, name, slug, is_active, created_at, updated_at, deleted_at
            FROM tenants
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tenant>, AppError> {
        let row = sqlx::query_as::<_, TenantRow>(
            r#"
            SELECT id, name, slug, is_active, created_at, updated_at, deleted_at
            FROM tenants
            WHERE slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn list(
        &self,
        search: Option<String>,
        page: PageRequest,
    ) -> Result<Page<Tenant>, AppError> {
        let rows = sqlx::query_as::<_, TenantRow>(
            r#"
            SELECT id, name, slug, is_active, created_at, updated_at, deleted_at
            FROM tenants
            WHERE deleted_at IS NULL
              AND ($1::text IS NULL OR name ILIKE '%' || $1 || '%' OR slug ILIKE '%' || $1 || '%')
            ORDER BY name, id
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(&search)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(self.pool.as_ref())
        .await?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM tenants
            WHERE deleted_at IS NULL
              AND ($1::text IS NULL OR name ILIKE '%' || $1 || '%' OR slug ILIKE '%' || $1 || '%')
            "#,
        )
        .bind(&search)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(Page::new(rows.into_iter().map(Into::into).collect(), total))
    }

    async fn update(&self, id: Uuid, patch: TenantPatch) -> Result<Tenant, AppError> {
        let row = sqlx::query_as::<_, TenantRow>(
            r#"
            UPDATE tenants
            SET name = COALESCE($2, name),
                is_active = COALESCE($3, is_active),
                updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING id, name, slug, is_active, created_at, updated_at, deleted_at
            "#,
        )
        .bind(id)
        .bind(patch.name)
        .bind(patch.is_active)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn soft_delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE tenants
            SET deleted_at = NOW(), updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(self.pool.as_ref()).await?;
        Ok(())
    }
}
