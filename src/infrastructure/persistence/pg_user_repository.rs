//! PostgreSQL implementation of the user repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::{NewUser, User, UserPatch};
use crate::domain::page::{Page, PageRequest};
use crate::domain::repositories::{UserFilter, UserRepository};
use crate::error::AppError;

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    tenant_id: Option<Uuid>,
    email: String,
    display_name: String,
    role: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = AppError;

    fn try_from(r: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: r.id,
            tenant_id: r.tenant_id,
            email: r.email,
            display_name: r.display_name,
            role: r.role.parse()?,
            is_active: r.is_active,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

const USER_FILTER: &str = r#"
    WHERE tenant_id = $1
      AND ($2::text IS NULL OR email ILIKE '%' || $2 || '%' OR display_name ILIKE '%' || $2 || '%')
      AND ($3::text IS NULL OR role = $3)
"#;

/// PostgreSQL repository for users. Emails are stored lower-case.
pub struct PgUserRepository {
    pool: Arc<PgPool>,
}

impl PgUserRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, new_user: NewUser) -> Result<User, AppError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (id, tenant_id, email, display_name, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, tenant_id, email, display_name, role, is_active, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new_user.tenant_id)
        .bind(new_user.email.to_lowercase())
        .bind(&new_user.display_name)
        .bind(new_user.role.as_str())
        .fetch_one(self.pool.as_ref())
        .await?;

        row.try_into()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, tenant_id, email, display_name, role, is_active, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?
        .map(TryInto::try_into)
        .transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, tenant_id, email, display_name, role, is_active, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email.to_lowercase())
        .fetch_optional(self.pool.as_ref())
        .await?
        .map(TryInto::try_into)
        .transpose()
    }

    async fn list(&self, filter: UserFilter, page: PageRequest) -> Result<Page<User>, AppError> {
        let role = filter.role.map(|r| r.as_str());

        let rows = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            SELECT id, tenant_id, email, display_name, role, is_active, created_at, updated_at
            FROM users
            {USER_FILTER}
            ORDER BY email
            LIMIT $4 OFFSET $5
            "#
        ))
        .bind(filter.tenant_id)
        .bind(&filter.search)
        .bind(role)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(self.pool.as_ref())
        .await?;

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM users {USER_FILTER}"))
            .bind(filter.tenant_id)
            .bind(&filter.search)
            .bind(role)
            .fetch_one(self.pool.as_ref())
            .await?;

        let users = rows
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<User>, AppError>>()?;
        Ok(Page::new(users, total))
    }

    async fn update(&self, id: Uuid, patch: UserPatch) -> Result<User, AppError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
            SET display_name = COALESCE($2, display_name),
                role = COALESCE($3, role),
                is_active = COALESCE($4, is_active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, tenant_id, email, display_name, role, is_active, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(patch.display_name)
        .bind(patch.role.map(|r| r.as_str()))
        .bind(patch.is_active)
        .fetch_one(self.pool.as_ref())
        .await?;

        row.try_into()
    }
}
