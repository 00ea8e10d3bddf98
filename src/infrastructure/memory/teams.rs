use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::store::{MemoryStore, missing, paginate};
use crate::domain::entities::{NewTeam, Team, TeamPatch};
use crate::domain::page::{Page, PageRequest};
use crate::domain::repositories::{TeamFilter, TeamRepository};
use crate::error::AppError;

#[async_trait]
impl TeamRepository for MemoryStore {
    async fn create(&self, new_team: NewTeam) -> Result<Team, AppError> {
        let now = Utc::now();
        let team = Team {
            id: Uuid::new_v4(),
            tenant_id: new_team.tenant_id,
            event_id: new_team.event_id,
            name: new_team.name,
            member_ids: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        self.tables.write().await.teams.push(team.clone());
        Ok(team)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Team>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.teams.iter().find(|t| t.id == id).cloned())
    }

    async fn list(&self, filter: TeamFilter, page: PageRequest) -> Result<Page<Team>, AppError> {
        let tables = self.tables.read().await;
        Ok(paginate(
            &tables.teams,
            |t| filter.matches(t),
            |a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)),
            page,
        ))
    }

    async fn update(&self, id: Uuid, patch: TeamPatch) -> Result<Team, AppError> {
        let mut tables = self.tables.write().await;
        let team = tables
            .teams
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| missing("Team", id))?;
        team.apply(patch, Utc::now());
        Ok(team.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        let before = tables.teams.len();
        tables.teams.retain(|t| t.id != id);
        Ok(tables.teams.len() != before)
    }

    async fn add_member(&self, team_id: Uuid, user_id: Uuid) -> Result<Team, AppError> {
        let mut tables = self.tables.write().await;
        let team = tables
            .teams
            .iter_mut()
            .find(|t| t.id == team_id)
            .ok_or_else(|| missing("Team", team_id))?;
        if !team.has_member(user_id) {
            team.member_ids.push(user_id);
            team.updated_at = Utc::now();
        }
        Ok(team.clone())
    }

    async fn remove_member(&self, team_id: Uuid, user_id: Uuid) -> Result<Team, AppError> {
        let mut tables = self.tables.write().await;
        let team = tables
            .teams
            .iter_mut()
            .find(|t| t.id == team_id)
            .ok_or_else(|| missing("Team", team_id))?;
        if team.has_member(user_id) {
            team.member_ids.retain(|m| *m != user_id);
            team.updated_at = Utc::now();
        }
        Ok(team.clone())
    }
}
