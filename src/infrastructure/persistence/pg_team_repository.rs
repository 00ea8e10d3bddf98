//! PostgreSQL implementation of the team repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::{NewTeam, Team, TeamPatch};
use crate::domain::page::{Page, PageRequest};
use crate::domain::repositories::{TeamFilter, TeamRepository};
use crate::error::AppError;

#[derive(sqlx::FromRow)]
struct TeamRow {
    id: Uuid,
    tenant_id: Uuid,
    event_id: Option<Uuid>,
    name: String,
    member_ids: Vec<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<TeamRow> for Team {
    fn from(r: TeamRow) -> Self {
        Team {
            id: r.id,
            tenant_id: r.tenant_id,
            event_id: r.event_id,
            name: r.name,
            member_ids: r.member_ids,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// Team columns plus the aggregated member ids, in join order.
const SELECT_TEAM: &str = r#"
    SELECT t.id, t.tenant_id, t.event_id, t.name, t.created_at, t.updated_at,
           COALESCE(
               ARRAY_AGG(m.user_id ORDER BY m.added_at, m.user_id) FILTER (WHERE m.user_id IS NOT NULL),
               '{}'
           ) AS member_ids
    FROM teams t
    LEFT JOIN team_members m ON m.team_id = t.id
"#;

pub struct PgTeamRepository {
    pool: Arc<PgPool>,
}

impl PgTeamRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    async fn load(&self, id: Uuid) -> Result<Option<Team>, AppError> {
        let row = sqlx::query_as::<_, TeamRow>(&format!(
            "{SELECT_TEAM} WHERE t.id = $1 GROUP BY t.id"
        ))
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn require(&self, id: Uuid) -> Result<Team, AppError> {
        self.load(id).await?.ok_or_else(|| {
            AppError::not_found("Team not found", serde_json::json!({ "id": id }))
        })
    }
}

#[async_trait]
impl TeamRepository for PgTeamRepository {
    async fn create(&self, new_team: NewTeam) -> Result<Team, AppError> {
        let id = Uuid::new_v4();
        sqlx::query("INSERT INTO teams (id, tenant_id, event_id, name) VALUES ($1, $2, $3, $4)")
            .bind(id)
            .bind(new_team.tenant_id)
            .bind(new_team.event_id)
            .bind(new_team.name)
            .execute(self.pool.as_ref())
            .await?;

        self.require(id).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Team>, AppError> {
        self.load(id).await
    }

    async fn list(&self, filter: TeamFilter, page: PageRequest) -> Result<Page<Team>, AppError> {
        let rows = sqlx::query_as::<_, TeamRow>(&format!(
            r#"
            {SELECT_TEAM}
            WHERE t.tenant_id = $1 AND ($2::uuid IS NULL OR t.event_id = $2)
            GROUP BY t.id
            ORDER BY t.name, t.id
            LIMIT $3 OFFSET $4
            "#
        ))
        .bind(filter.tenant_id)
        .bind(filter.event_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(self.pool.as_ref())
        .await?;

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM teams WHERE tenant_id = $1 AND ($2::uuid IS NULL OR event_id = $2)",
        )
        .bind(filter.tenant_id)
        .bind(filter.event_id)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(Page::new(rows.into_iter().map(Into::into).collect(), total))
    }

    async fn update(&self, id: Uuid, patch: TeamPatch) -> Result<Team, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE teams
            SET name = COALESCE($2, name),
                event_id = CASE WHEN $3 THEN $4 ELSE event_id END,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(patch.name)
        .bind(patch.event_id.is_some())
        .bind(patch.event_id.flatten())
        .execute(self.pool.as_ref())
        .await?;

        if result.rows_affected() == 0 {
            return Err(sqlx::Error::RowNotFound.into());
        }
        self.require(id).await
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM teams WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn add_member(&self, team_id: Uuid, user_id: Uuid) -> Result<Team, AppError> {
        sqlx::query(
            r#"
            INSERT INTO team_members (team_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT (team_id, user_id) DO NOTHING
            "#,
        )
        .bind(team_id)
        .bind(user_id)
        .execute(self.pool.as_ref())
        .await?;

        self.require(team_id).await
    }

    async fn remove_member(&self, team_id: Uuid, user_id: Uuid) -> Result<Team, AppError> {
        sqlx::query("DELETE FROM team_members WHERE team_id = $1 AND user_id = $2")
            .bind(team_id)
            .bind(user_id)
            .execute(self.pool.as_ref())
            .await?;

        self.require(team_id).await
    }
}
