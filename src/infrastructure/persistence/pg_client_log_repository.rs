//! PostgreSQL implementation of the client log repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::{PgPool, QueryBuilder};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::{ClientLogEntry, LogLevel, NewClientLogEntry};
use crate::domain::page::{Page, PageRequest};
use crate::domain::repositories::{ClientLogFilter, ClientLogRepository};
use crate::error::AppError;

const ALL_LEVELS: [LogLevel; 6] = [
    LogLevel::Trace,
    LogLevel::Debug,
    LogLevel::Information,
    LogLevel::Warning,
    LogLevel::Error,
    LogLevel::Critical,
];

#[derive(sqlx::FromRow)]
struct ClientLogRow {
    id: Uuid,
    tenant_id: Option<Uuid>,
    user_id: Option<Uuid>,
    level: String,
    message: String,
    source: Option<String>,
    properties: Value,
    occurred_at: DateTime<Utc>,
    received_at: DateTime<Utc>,
}

impl TryFrom<ClientLogRow> for ClientLogEntry {
    type Error = AppError;

    fn try_from(r: ClientLogRow) -> Result<Self, Self::Error> {
        Ok(ClientLogEntry {
            id: r.id,
            tenant_id: r.tenant_id,
            user_id: r.user_id,
            level: r.level.parse()?,
            message: r.message,
            source: r.source,
            properties: r.properties,
            occurred_at: r.occurred_at,
            received_at: r.received_at,
        })
    }
}

const FILTER: &str = r#"
    WHERE tenant_id = $1
      AND level = ANY($2)
      AND ($3::timestamptz IS NULL OR occurred_at >= $3)
      AND ($4::timestamptz IS NULL OR occurred_at <= $4)
"#;

/// PostgreSQL repository for client logs, written in batches by the log worker.
pub struct PgClientLogRepository {
    pool: Arc<PgPool>,
}

impl PgClientLogRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClientLogRepository for PgClientLogRepository {
    async fn insert_batch(&self, entries: Vec<NewClientLogEntry>) -> Result<u64, AppError> {
        if entries.is_empty() {
            return Ok(0);
        }

        let mut builder = QueryBuilder::new(
            "INSERT INTO client_logs \
             (id, tenant_id, user_id, level, message, source, properties, occurred_at, received_at) ",
        );
        builder.push_values(entries, |mut b, e| {
            b.push_bind(Uuid::new_v4())
                .push_bind(e.tenant_id)
                .push_bind(e.user_id)
                .push_bind(e.level.as_str())
                .push_bind(e.message)
                .push_bind(e.source)
                .push_bind(e.properties)
                .push_bind(e.occurred_at)
                .push_bind(e.received_at);
        });

        let result = builder.build().execute(self.pool.as_ref()).await?;
        Ok(result.rows_affected())
    }

    async fn list(
        &self,
        filter: ClientLogFilter,
        page: PageRequest,
    ) -> Result<Page<ClientLogEntry>, AppError> {
        let levels: Vec<&str> = ALL_LEVELS
            .iter()
            .filter(|l| filter.min_level.is_none_or(|min| **l >= min))
            .map(|l| l.as_str())
            .collect();

        let rows = sqlx::query_as::<_, ClientLogRow>(&format!(
            r#"
            SELECT id, tenant_id, user_id, level, message, source, properties, occurred_at, received_at
            FROM client_logs
            {FILTER}
            ORDER BY occurred_at DESC, id
            LIMIT $5 OFFSET $6
            "#
        ))
        .bind(filter.tenant_id)
        .bind(&levels)
        .bind(filter.from)
        .bind(filter.to)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(self.pool.as_ref())
        .await?;

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM client_logs {FILTER}"))
            .bind(filter.tenant_id)
            .bind(&levels)
            .bind(filter.from)
            .bind(filter.to)
            .fetch_one(self.pool.as_ref())
            .await?;

        let entries = rows
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<ClientLogEntry>, AppError>>()?;
        Ok(Page::new(entries, total))
    }
}
