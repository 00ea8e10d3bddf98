//! PostgreSQL implementation of the branding repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::{Branding, BrandingUpdate};
use crate::domain::repositories::BrandingRepository;
use crate::error::AppError;

#[derive(sqlx::FromRow)]
struct BrandingRow {
    tenant_id: Uuid,
    app_name: String,
    primary_color: String,
    secondary_color: String,
    logo_url: Option<String>,
    favicon_url: Option<String>,
    updated_at: DateTime<Utc>,
}

impl From<BrandingRow> for Branding {
    fn from(r: BrandingRow) -> Self {
        Branding {
            tenant_id: r.tenant_id,
            app_name: r.app_name,
            primary_color: r.primary_color,
            secondary_color: r.secondary_color,
            logo_url: r.logo_url,
            favicon_url: r.favicon_url,
            updated_at: r.updated_at,
        }
    }
}

pub struct PgBrandingRepository {
    pool: Arc<PgPool>,
}

impl PgBrandingRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BrandingRepository for PgBrandingRepository {
    async fn find(&self, tenant_id: Uuid) -> Result<Option<Branding>, AppError> {
        let row = sqlx::query_as::<_, BrandingRow>(
            r#"
            SELECT tenant_id, app_name, primary_color, secondary_color, logo_url, favicon_url, updated_at
            FROM branding
            WHERE tenant_id = $1
            "#,
        )
        .bind(tenant_id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn upsert(&self, tenant_id: Uuid, update: BrandingUpdate) -> Result<Branding, AppError> {
        let row = sqlx::query_as::<_, BrandingRow>(
            r#"
            INSERT INTO branding (tenant_id, app_name, primary_color, secondary_color, logo_url, favicon_url)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (tenant_id) DO UPDATE
            SET app_name = EXCLUDED.app_name,
                primary_color = EXCLUDED.primary_color,
                secondary_color = EXCLUDED.secondary_color,
                logo_url = EXCLUDED.logo_url,
                favicon_url = EXCLUDED.favicon_url,
                updated_at = NOW()
            RETURNING tenant_id, app_name, primary_color, secondary_color, logo_url, favicon_url, updated_at
            "#,
        )
        .bind(tenant_id)
        .bind(update.app_name)
        .bind(update.primary_color)
        .bind(update.secondary_color)
        .bind(update.logo_url)
        .bind(update.favicon_url)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }
}
