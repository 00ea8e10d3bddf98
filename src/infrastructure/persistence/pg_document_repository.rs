//! PostgreSQL implementation of the document repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::{Document, DocumentPatch, NewDocument};
use crate::domain::page::{Page, PageRequest};
use crate::domain::repositories::{DocumentFilter, DocumentRepository};
use crate::error::AppError;

#[derive(sqlx::FromRow)]
struct DocumentRow {
    id: Uuid,
    tenant_id: Uuid,
    kind: String,
    number: String,
    title: String,
    event_id: Option<Uuid>,
    content_url: Option<String>,
    issued_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<DocumentRow> for Document {
    type Error = AppError;

    fn try_from(r: DocumentRow) -> Result<Self, Self::Error> {
        Ok(Document {
            id: r.id,
            tenant_id: r.tenant_id,
            kind: r.kind.parse()?,
            number: r.number,
            title: r.title,
            event_id: r.event_id,
            content_url: r.content_url,
            issued_at: r.issued_at,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

const COLUMNS: &str = "id, tenant_id, kind, number, title, event_id, content_url, issued_at, \
                       created_at, updated_at";

const FILTER: &str = r#"
    WHERE tenant_id = $1
      AND ($2::text IS NULL OR kind = $2)
      AND ($3::uuid IS NULL OR event_id = $3)
"#;

pub struct PgDocumentRepository {
    pool: Arc<PgPool>,
}

impl PgDocumentRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentRepository for PgDocumentRepository {
    async fn create(&self, d: NewDocument) -> Result<Document, AppError> {
        let row = sqlx::query_as::<_, DocumentRow>(&format!(
            r#"
            INSERT INTO documents (id, tenant_id, kind, number, title, event_id, content_url, issued_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(d.tenant_id)
        .bind(d.kind.as_str())
        .bind(d.number)
        .bind(d.title)
        .bind(d.event_id)
        .bind(d.content_url)
        .bind(d.issued_at)
        .fetch_one(self.pool.as_ref())
        .await?;

        row.try_into()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Document>, AppError> {
        sqlx::query_as::<_, DocumentRow>(&format!("SELECT {COLUMNS} FROM documents WHERE id = $1"))
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?
            .map(TryInto::try_into)
            .transpose()
    }

    async fn find_by_number(
        &self,
        tenant_id: Uuid,
        number: &str,
    ) -> Result<Option<Document>, AppError> {
        sqlx::query_as::<_, DocumentRow>(&format!(
            "SELECT {COLUMNS} FROM documents WHERE tenant_id = $1 AND number = $2"
        ))
        .bind(tenant_id)
        .bind(number)
        .fetch_optional(self.pool.as_ref())
        .await?
        .map(TryInto::try_into)
        .transpose()
    }

    async fn list(
        &self,
        filter: DocumentFilter,
        page: PageRequest,
    ) -> Result<Page<Document>, AppError> {
        let kind = filter.kind.map(|k| k.as_str());

        let rows = sqlx::query_as::<_, DocumentRow>(&format!(
            "SELECT {COLUMNS} FROM documents {FILTER} ORDER BY issued_at DESC, id LIMIT $4 OFFSET $5"
        ))
        .bind(filter.tenant_id)
        .bind(kind)
        .bind(filter.event_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(self.pool.as_ref())
        .await?;

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM documents {FILTER}"))
            .bind(filter.tenant_id)
            .bind(kind)
            .bind(filter.event_id)
            .fetch_one(self.pool.as_ref())
            .await?;

        let documents = rows
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Document>, AppError>>()?;
        Ok(Page::new(documents, total))
    }

    async fn update(&self, id: Uuid, patch: DocumentPatch) -> Result<Document, AppError> {
        let row = sqlx::query_as::<_, DocumentRow>(&format!(
            r#"
            UPDATE documents
            SET kind = COALESCE($2, kind),
                number = COALESCE($3, number),
                title = COALESCE($4, title),
                event_id = CASE WHEN $5 THEN $6 ELSE event_id END,
                content_url = CASE WHEN $7 THEN $8 ELSE content_url END,
                issued_at = COALESCE($9, issued_at),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(patch.kind.map(|k| k.as_str()))
        .bind(patch.number)
        .bind(patch.title)
        .bind(patch.event_id.is_some())
        .bind(patch.event_id.flatten())
        .bind(patch.content_url.is_some())
        .bind(patch.content_url.flatten())
        .bind(patch.issued_at)
        .fetch_one(self.pool.as_ref())
        .await?;

        row.try_into()
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM documents WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
