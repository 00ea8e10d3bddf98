//! Team and team membership service.

use crate::application::services::event_service::EventService;
use crate::domain::entities::{NewTeam, Role, Team, TeamPatch};
use crate::domain::page::{Page, PageRequest};
use crate::domain::repositories::{TeamFilter, TeamRepository, UserRepository};
use crate::domain::tenant_context::TenantContext;
use crate::error::AppError;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct CreateTeam {
    pub name: String,
    pub event_id: Option<Uuid>,
}

/// Service for teams. Members must be active users of the team's tenant.
pub struct TeamService {
    repository: Arc<dyn TeamRepository>,
    users: Arc<dyn UserRepository>,
    events: Arc<EventService>,
}

impl TeamService {
    pub fn new(
        repository: Arc<dyn TeamRepository>,
        users: Arc<dyn UserRepository>,
        events: Arc<EventService>,
    ) -> Self {
        Self {
            repository,
            users,
            events,
        }
    }

    pub async fn list_teams(
        &self,
        ctx: &TenantContext,
        event_id: Option<Uuid>,
        page: PageRequest,
    ) -> Result<Page<Team>, AppError> {
        let tenant_id = ctx.require_tenant()?;
        self.repository
            .list(
                TeamFilter {
                    tenant_id,
                    event_id,
                },
                page,
            )
            .await
    }

    pub async fn create_team(
        &self,
        ctx: &TenantContext,
        input: CreateTeam,
    ) -> Result<Team, AppError> {
        let tenant_id = ctx.require_tenant()?;
        ctx.require_role(Role::Manager)?;
        if let Some(event_id) = input.event_id {
            self.events.ensure_reference(tenant_id, event_id).await?;
        }

        self.repository
            .create(NewTeam {
                tenant_id,
                event_id: input.event_id,
                name: input.name,
            })
            .await
    }

    pub async fn get_team(&self, ctx: &TenantContext, id: Uuid) -> Result<Team, AppError> {
        let team = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))?;
        ctx.ensure_access(team.tenant_id)?;
        Ok(team)
    }

    pub async fn update_team(
        &self,
        ctx: &TenantContext,
        id: Uuid,
        patch: TeamPatch,
    ) -> Result<Team, AppError> {
        ctx.require_role(Role::Manager)?;
        let current = self.get_team(ctx, id).await?;
        if let Some(Some(event_id)) = patch.event_id {
            self.events
                .ensure_reference(current.tenant_id, event_id)
                .await?;
        }
        self.repository.update(id, patch).await
    }

    pub async fn delete_team(&self, ctx: &TenantContext, id: Uuid) -> Result<(), AppError> {
        ctx.require_role(Role::Manager)?;
        self.get_team(ctx, id).await?;

        if !self.repository.delete(id).await? {
            return Err(not_found(id));
        }
        Ok(())
    }

    /// Adds a user to a team. Adding an existing member is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::BadRequest`] if the user is not an active user of
    /// the team's tenant.
    pub async fn add_member(
        &self,
        ctx: &TenantContext,
        team_id: Uuid,
        user_id: Uuid,
    ) -> Result<Team, AppError> {
        ctx.require_role(Role::Manager)?;
        let team = self.get_team(ctx, team_id).await?;

        let eligible = self
            .users
            .find_by_id(user_id)
            .await?
            .is_some_and(|u| u.tenant_id == Some(team.tenant_id) && u.is_active);
        if !eligible {
            return Err(AppError::bad_request(
                "User is not an active member of this tenant",
                json!({"user_id": user_id}),
            ));
        }
        if team.has_member(user_id) {
            return Ok(team);
        }

        self.repository.add_member(team_id, user_id).await
    }

    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the user is not a member.
    pub async fn remove_member(
        &self,
        ctx: &TenantContext,
        team_id: Uuid,
        user_id: Uuid,
    ) -> Result<Team, AppError> {
        ctx.require_role(Role::Manager)?;
        let team = self.get_team(ctx, team_id).await?;
        if !team.has_member(user_id) {
            return Err(AppError::not_found(
                "User is not a member of this team",
                json!({"team_id": team_id, "user_id": user_id}),
            ));
        }

        self.repository.remove_member(team_id, user_id).await
    }
}

fn not_found(id: Uuid) -> AppError {
    AppError::not_found("Team not found", json!({"id": id}))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::address_service::AddressService;
    use crate::domain::entities::User;
    use crate::domain::repositories::{
        MockAddressRepository, MockEventRepository, MockTeamRepository, MockUserRepository,
    };
    use chrono::Utc;

    fn ctx(role: Role, tenant_id: Uuid) -> TenantContext {
        TenantContext {
            user_id: Uuid::new_v4(),
            role,
            home_tenant_id: Some(tenant_id),
            tenant_id: Some(tenant_id),
            impersonating: false,
        }
    }

    fn team(id: Uuid, tenant_id: Uuid, member_ids: Vec<Uuid>) -> Team {
        Team {
            id,
            tenant_id,
            event_id: None,
            name: "Crew".to_string(),
            member_ids,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn user(id: Uuid, tenant_id: Uuid) -> User {
        User {
            id,
            tenant_id: Some(tenant_id),
            email: "crew@example.com".to_string(),
            display_name: "Crew".to_string(),
            role: Role::Staff,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn service(teams: MockTeamRepository, users: MockUserRepository) -> TeamService {
        let events = EventService::new(
            Arc::new(MockEventRepository::new()),
            Arc::new(AddressService::new(Arc::new(MockAddressRepository::new()))),
        );
        TeamService::new(Arc::new(teams), Arc::new(users), Arc::new(events))
    }

    #[tokio::test]
    async fn test_add_member_from_other_tenant() {
        let tenant = Uuid::new_v4();
        let mut teams = MockTeamRepository::new();
        teams
            .expect_find_by_id()
            .returning(move |id| Ok(Some(team(id, tenant, vec![]))));
        teams.expect_add_member().never();
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(|id| Ok(Some(user(id, Uuid::new_v4()))));

        let result = service(teams, users)
            .add_member(&ctx(Role::Manager, tenant), Uuid::new_v4(), Uuid::new_v4())
            .await;

        assert!(matches!(result.unwrap_err(), AppError::BadRequest { .. }));
    }

    #[tokio::test]
    async fn test_add_existing_member_is_noop() {
        let tenant = Uuid::new_v4();
        let member = Uuid::new_v4();
        let mut teams = MockTeamRepository::new();
        teams
            .expect_find_by_id()
            .returning(move |id| Ok(Some(team(id, tenant, vec![member]))));
        teams.expect_add_member().never();
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(move |id| Ok(Some(user(id, tenant))));

        let result = service(teams, users)
            .add_member(&ctx(Role::Manager, tenant), Uuid::new_v4(), member)
            .await
            .unwrap();

        assert_eq!(result.member_ids, vec![member]);
    }

    #[tokio::test]
    async fn test_remove_non_member() {
        let tenant = Uuid::new_v4();
        let mut teams = MockTeamRepository::new();
        teams
            .expect_find_by_id()
            .returning(move |id| Ok(Some(team(id, tenant, vec![]))));

        let result = service(teams, MockUserRepository::new())
            .remove_member(&ctx(Role::Manager, tenant), Uuid::new_v4(), Uuid::new_v4())
            .await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }
}
