//! PostgreSQL implementation of the event repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::{Event, EventPatch, NewEvent};
use crate::domain::page::{Page, PageRequest};
use crate::domain::repositories::{EventFilter, EventRepository};
use crate::error::AppError;

#[derive(sqlx::FromRow)]
struct EventRow {
    id: Uuid,
    tenant_id: Uuid,
    name: String,
    description: Option<String>,
    venue_address_id: Option<Uuid>,
    starts_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<EventRow> for Event {
    type Error = AppError;

    fn try_from(r: EventRow) -> Result<Self, Self::Error> {
        Ok(Event {
            id: r.id,
            tenant_id: r.tenant_id,
            name: r.name,
            description: r.description,
            venue_address_id: r.venue_address_id,
            starts_at: r.starts_at,
            ends_at: r.ends_at,
            status: r.status.parse()?,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

const COLUMNS: &str = "id, tenant_id, name, description, venue_address_id, starts_at, ends_at, \
                       status, created_at, updated_at";

// Window filters select events overlapping [from, to].
const FILTER: &str = r#"
    WHERE tenant_id = $1
      AND ($2::text IS NULL OR status = $2)
      AND ($3::timestamptz IS NULL OR ends_at >= $3)
      AND ($4::timestamptz IS NULL OR starts_at <= $4)
      AND ($5::text IS NULL OR name ILIKE '%' || $5 || '%')
"#;

pub struct PgEventRepository {
    pool: Arc<PgPool>,
}

impl PgEventRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventRepository for PgEventRepository {
    async fn create(&self, e: NewEvent) -> Result<Event, AppError> {
        let row = sqlx::query_as::<_, EventRow>(&format!(
            r#"
            INSERT INTO events (id, tenant_id, name, description, venue_address_id, starts_at, ends_at, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(e.tenant_id)
        .bind(e.name)
        .bind(e.description)
        .bind(e.venue_address_id)
        .bind(e.starts_at)
        .bind(e.ends_at)
        .bind(e.status.as_str())
        .fetch_one(self.pool.as_ref())
        .await?;

        row.try_into()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Event>, AppError> {
        sqlx::query_as::<_, EventRow>(&format!("SELECT {COLUMNS} FROM events WHERE id = $1"))
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?
            .map(TryInto::try_into)
            .transpose()
    }

    async fn list(&self, filter: EventFilter, page: PageRequest) -> Result<Page<Event>, AppError> {
        let status = filter.status.map(|s| s.as_str());

        let rows = sqlx::query_as::<_, EventRow>(&format!(
            "SELECT {COLUMNS} FROM events {FILTER} ORDER BY starts_at, id LIMIT $6 OFFSET $7"
        ))
        .bind(filter.tenant_id)
        .bind(status)
        .bind(filter.from)
        .bind(filter.to)
        .bind(&filter.search)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(self.pool.as_ref())
        .await?;

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM events {FILTER}"))
            .bind(filter.tenant_id)
            .bind(status)
            .bind(filter.from)
            .bind(filter.to)
            .bind(&filter.search)
            .fetch_one(self.pool.as_ref())
            .await?;

        let events = rows
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Event>, AppError>>()?;
        Ok(Page::new(events, total))
    }

    async fn update(&self, id: Uuid, patch: EventPatch) -> Result<Event, AppError> {
        let row = sqlx::query_as::<_, EventRow>(&format!(
            r#"
            UPDATE events
            SET name = COALESCE($2, name),
                description = CASE WHEN $3 THEN $4 ELSE description END,
                venue_address_id = CASE WHEN $5 THEN $6 ELSE venue_address_id END,
                starts_at = COALESCE($7, starts_at),
                ends_at = COALESCE($8, ends_at),
                status = COALESCE($9, status),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(patch.name)
        .bind(patch.description.is_some())
        .bind(patch.description.flatten())
        .bind(patch.venue_address_id.is_some())
        .bind(patch.venue_address_id.flatten())
        .bind(patch.starts_at)
        .bind(patch.ends_at)
        .bind(patch.status.map(|s| s.as_str()))
        .fetch_one(self.pool.as_ref())
        .await?;

        row.try_into()
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
